/// The backtick that delimits code spans.
pub const TICK: u8 = b'`';

/// Finds the first run of exactly `len` backticks at or after `from`.
///
/// Longer or shorter runs never match, so `` `a``b` `` closes on the last
/// backtick rather than inside the double run.
pub fn find_run(s: &str, from: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let bytes = s.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] != TICK {
            i += 1;
            continue;
        }
        let run = bytes[i..].iter().take_while(|&&b| b == TICK).count();
        if run == len {
            return Some(i);
        }
        i += run;
    }
    None
}
