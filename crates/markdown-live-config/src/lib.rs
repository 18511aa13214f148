use markdown_live_engine::{DecorationKind, DecoratorOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// User settings for live decoration. Every field may be omitted from the
/// file and falls back to the decorator's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language ids that get decorated.
    pub languages: Vec<String>,
    /// Show raw markdown on lines touched by the cursor or a selection.
    pub reveal_selected_lines: bool,
    /// Decoration kinds never applied, by name (`"boldItalic"`, `"heading1"`).
    pub disabled_kinds: Vec<DecorationKind>,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = DecoratorOptions::default();
        Self {
            languages: defaults.languages,
            reveal_selected_lines: defaults.reveal_selected_lines,
            disabled_kinds: defaults.disabled_kinds,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-live");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Resolves a user-supplied path, expanding `~` and environment
    /// variables. Falls back to the path as given if expansion fails.
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => path.to_path_buf(),
        }
    }

    pub fn decorator_options(&self) -> DecoratorOptions {
        DecoratorOptions {
            languages: self.languages.clone(),
            reveal_selected_lines: self.reveal_selected_lines,
            disabled_kinds: self.disabled_kinds.clone(),
        }
    }
}
