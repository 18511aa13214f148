use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_live_config::Config;
use markdown_live_engine::{
    DecorationKind, Decorator, DecoratorOptions, EditorHost, LineIndex, Position, SelectionSpan,
    extract,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    collections::BTreeMap,
    env,
    io::{Stdout, stdout},
    ops::Range,
    path::PathBuf,
    process,
};

/// How one byte of the document is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Plain,
    Hidden,
    Styled(DecorationKind),
}

/// A markdown file viewed in the terminal. The cursor line is the only
/// selection, so it always shows raw markdown.
struct App {
    path: PathBuf,
    text: String,
    lines: LineIndex,
    cursor_line: usize,
    scroll: usize,
    applied: BTreeMap<DecorationKind, Vec<Range<usize>>>,
}

impl App {
    fn new(path: PathBuf, text: String) -> Self {
        let lines = LineIndex::new(&text);
        Self {
            path,
            text,
            lines,
            cursor_line: 0,
            scroll: 0,
            applied: BTreeMap::new(),
        }
    }

    fn next_line(&mut self) {
        if self.cursor_line + 1 < self.lines.line_count() {
            self.cursor_line += 1;
        }
    }

    fn previous_line(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(1);
    }

    /// Keeps the cursor line inside a viewport of `height` lines.
    fn follow_cursor(&mut self, height: usize) {
        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        } else if height > 0 && self.cursor_line >= self.scroll + height {
            self.scroll = self.cursor_line + 1 - height;
        }
    }

    fn marks(&self) -> Vec<Mark> {
        let mut marks = vec![Mark::Plain; self.text.len()];
        let mut paint = |ranges: &[Range<usize>], mark: Mark| {
            for range in ranges {
                if let Some(slots) = marks.get_mut(range.clone()) {
                    slots.fill(mark);
                }
            }
        };
        for (kind, ranges) in &self.applied {
            if kind.is_styled() {
                paint(ranges, Mark::Styled(*kind));
            }
        }
        if let Some(hidden) = self.applied.get(&DecorationKind::Hide) {
            paint(hidden, Mark::Hidden);
        }
        marks
    }

    /// Document lines as terminal spans, hidden bytes left out.
    fn render_lines(&self) -> Vec<Line<'_>> {
        let marks = self.marks();
        (0..self.lines.line_count())
            .map(|line| {
                let Some(range) = self.lines.line_range(line) else {
                    return Line::default();
                };
                let gutter = if line == self.cursor_line { "▶ " } else { "  " };
                let mut spans = vec![Span::styled(gutter, Style::default().fg(Color::DarkGray))];
                spans.extend(line_spans(&self.text, range, &marks));
                Line::from(spans)
            })
            .collect()
    }
}

impl EditorHost for App {
    fn language_id(&self) -> &str {
        "markdown"
    }

    fn document_text(&self) -> &str {
        &self.text
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        self.lines.position(offset)
    }

    fn active_selections(&self) -> Vec<SelectionSpan> {
        vec![SelectionSpan::line(self.cursor_line)]
    }

    fn apply_style(&mut self, kind: DecorationKind, ranges: &[Range<usize>]) {
        if ranges.is_empty() {
            self.applied.remove(&kind);
        } else {
            self.applied.insert(kind, ranges.to_vec());
        }
    }
}

/// Splits one line into runs of equally marked bytes.
fn line_spans<'t>(text: &'t str, range: Range<usize>, marks: &[Mark]) -> Vec<Span<'t>> {
    let mut spans = Vec::new();
    let mut run: Option<(usize, Mark)> = None;
    let mut flush = |start: usize, end: usize, mark: Mark| match mark {
        Mark::Hidden => {}
        Mark::Plain => spans.push(Span::raw(&text[start..end])),
        Mark::Styled(kind) => spans.push(Span::styled(&text[start..end], style_for(kind))),
    };

    for (i, _) in text[range.clone()].char_indices() {
        let at = range.start + i;
        let mark = marks.get(at).copied().unwrap_or(Mark::Plain);
        match run {
            Some((_, current)) if current == mark => {}
            Some((start, current)) => {
                flush(start, at, current);
                run = Some((at, mark));
            }
            None => run = Some((at, mark)),
        }
    }
    if let Some((start, mark)) = run {
        flush(start, range.end, mark);
    }
    spans
}

fn style_for(kind: DecorationKind) -> Style {
    let style = Style::default();
    match kind {
        DecorationKind::Hide => style,
        DecorationKind::Bold => style.add_modifier(Modifier::BOLD),
        DecorationKind::Italic => style.add_modifier(Modifier::ITALIC),
        DecorationKind::BoldItalic => style.add_modifier(Modifier::BOLD | Modifier::ITALIC),
        DecorationKind::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
        DecorationKind::Code => style.fg(Color::Yellow),
        DecorationKind::Heading1 => style
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        DecorationKind::Heading2 => style.fg(Color::Cyan).add_modifier(Modifier::BOLD),
        DecorationKind::Heading3 => style.fg(Color::Blue).add_modifier(Modifier::BOLD),
        DecorationKind::Heading => style.add_modifier(Modifier::BOLD),
        DecorationKind::Link => style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        DecorationKind::Image => style.fg(Color::Magenta).add_modifier(Modifier::ITALIC),
    }
}

/// One line per range: `kind start..end "snippet"`.
fn dump(text: &str, options: &DecoratorOptions) -> String {
    extract(text)
        .into_iter()
        .filter(|r| !options.disabled_kinds.contains(&r.kind))
        .map(|r| {
            format!(
                "{} {}..{} {:?}\n",
                r.kind,
                r.start,
                r.end,
                r.slice(text).unwrap_or_default()
            )
        })
        .collect()
}

struct Args {
    /// Only `None` when `write_config` is set.
    path: Option<PathBuf>,
    dump: bool,
    write_config: bool,
    disabled: Vec<DecorationKind>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut path = None;
    let mut dump = false;
    let mut write_config = false;
    let mut disabled = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dump" => dump = true,
            "--write-config" => write_config = true,
            "--disable" => {
                let name = iter.next().context("--disable needs a decoration kind")?;
                disabled.push(name.parse()?);
            }
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => {
                if path.replace(Config::expand_path(other.as_ref())).is_some() {
                    bail!("only one file can be opened");
                }
            }
        }
    }

    if path.is_none() && !write_config {
        bail!("no markdown file given");
    }
    Ok(Args {
        path,
        dump,
        write_config,
        disabled,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Usage: {} [--dump] [--write-config] [--disable <kind>]... <file.md>",
                args[0]
            );
            process::exit(1);
        }
    };

    let mut config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config file location: {}", Config::config_path().display());
            process::exit(1);
        }
    };
    for kind in parsed.disabled {
        if !config.disabled_kinds.contains(&kind) {
            config.disabled_kinds.push(kind);
        }
    }

    if parsed.write_config {
        config.save()?;
        println!("Wrote config to {}", Config::config_path().display());
    }
    let Some(path) = parsed.path else {
        return Ok(());
    };

    let options = config.decorator_options();
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    log::info!(
        "Opened {} ({} bytes), disabled kinds: {:?}",
        path.display(),
        text.len(),
        options.disabled_kinds
    );

    if parsed.dump {
        print!("{}", dump(&text, &options));
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(path, text);
    let decorator = Decorator::new(options);

    // Main loop
    let res = run_app(&mut terminal, &mut app, &decorator);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    decorator: &Decorator,
) -> Result<()> {
    loop {
        decorator.update(app);
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_line(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_line(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    // Borders take two rows of the content panel
    app.follow_cursor(usize::from(chunks[0].height.saturating_sub(2)));

    let title = format!(" {} ", app.path.display());
    let content = Paragraph::new(app.render_lines())
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((u16::try_from(app.scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(content, chunks[0]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous line | "),
        Span::raw("↓/j: Next line"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]), chunks[1]);
}
