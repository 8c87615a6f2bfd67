//! Configuration management for hnfeed.
//!
//! Configuration is read from `~/.config/hnfeed/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "HN_API_BASE_URL";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub cache: CacheConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

/// Upstream API location and HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: format!("hnfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Apply `HN_API_BASE_URL` when it is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
    }
}

/// Pagination and viewer tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Story ids resolved per page.
    pub page_size: usize,
    /// Extra pages fetched while looking for stories on the selected date.
    pub max_lookahead_pages: usize,
    /// Rows before the end of the list at which the next page is requested.
    pub sentinel_margin_rows: usize,
    /// Top-level comments shown per story.
    pub comment_limit: usize,
    /// Stories in the best picks strip.
    pub best_picks: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_lookahead_pages: 30,
            sentinel_margin_rows: 5,
            comment_limit: 20,
            best_picks: 5,
        }
    }
}

/// Staleness windows, in seconds, per query family, and the idle eviction window.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub story_ids_secs: u64,
    pub item_secs: u64,
    pub comments_secs: u64,
    pub best_picks_secs: u64,
    /// Seconds an unread entry stays in memory.
    pub gc_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            story_ids_secs: 30,
            item_secs: 30,
            comments_secs: 30,
            best_picks_secs: 60,
            gc_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing default file is created with comments. An explicitly given
    /// path must exist. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Self::default().validated();
                }
                default_path
            }
        };

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validated()
    }

    /// Get the default config file path: `~/.config/hnfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("hnfeed").join("config.toml"))
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::Invalid("feed.page_size must be at least 1".into()));
        }
        if self.feed.comment_limit == 0 {
            return Err(ConfigError::Invalid(
                "feed.comment_limit must be at least 1".into(),
            ));
        }
        Ok(self)
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Created default config at {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# hnfeed configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "1"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
# Overridden by the HN_API_BASE_URL environment variable
base_url = "https://hacker-news.firebaseio.com/v0"
timeout_secs = 10

[feed]
# Story ids resolved per page
page_size = 20
# Extra pages fetched when no loaded top story is on the selected date
max_lookahead_pages = 30
# Load the next page when the cursor is this many rows from the end
sentinel_margin_rows = 5
comment_limit = 20
best_picks = 5

[cache]
# Seconds before a cached response is refetched
story_ids_secs = 30
item_secs = 30
comments_secs = 30
best_picks_secs = 60
# Seconds before an unread entry is dropped from memory
gc_secs = 300

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg = "Cyan"
selection_fg = "Black"
tab_active = "LightYellow"
title = "White"
metadata = "DarkGray"
host = "Blue"
score = "Yellow"
error = "LightRed"
notice = "LightMagenta"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
next_feed = ["Tab"]
prev_feed = ["BackTab", "Shift+Tab"]
open_comments = ["c", "Enter"]
close_dialog = ["Esc"]
open_in_browser = ["o"]
search = ["/"]
prev_day = ["h", "Left"]
next_day = ["l", "Right"]
today = ["t"]
cycle_range = ["g"]
toggle_sort = ["S"]
refresh = ["R"]
# Show HN posting rules (Show tab only)
show_rules = ["?"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.colors.active_border, ratatui::style::Color::Cyan);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.feed.max_lookahead_pages, 30);
        assert_eq!(config.cache.best_picks_secs, 60);
        assert_eq!(config.cache.gc_secs, 300);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[feed]
page_size = 30

[colors]
active_border = "#FF0000"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.feed.page_size, 30);
        assert_eq!(config.feed.comment_limit, 20);
        assert_eq!(
            config.colors.active_border,
            ratatui::style::Color::Rgb(255, 0, 0)
        );
        assert_eq!(config.cache.story_ids_secs, 30);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feed]\nmax_lookahead_pages = 3\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.feed.max_lookahead_pages, 3);
    }

    #[test]
    fn test_load_missing_explicit_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feed\npage_size = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feed]\npage_size = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
