//! Configuration structures for linedit settings.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Tab stop distance in cells
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Wrap width in cells (0 disables wrapping)
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// East-Asian wide glyphs take two cells
    #[serde(default = "default_wide_glyphs")]
    pub wide_glyphs: bool,

    /// Copy leading whitespace on line break
    #[serde(default = "default_auto_indent")]
    pub auto_indent: bool,

    /// Maximum number of undo entries
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Accelerated cursor repeat
    #[serde(default)]
    pub repeat: RepeatSettings,
}

/// Accelerated repeat settings for cursor movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatSettings {
    /// Maximum gap between calls that keeps a streak going
    #[serde(default = "default_repeat_interval_ms")]
    pub interval_ms: u64,

    /// Streak length after which movement accelerates
    #[serde(default = "default_repeat_threshold")]
    pub threshold: usize,

    /// Steps per call once accelerated
    #[serde(default = "default_repeat_step")]
    pub step: usize,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,

    /// Number of entries kept in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

// Default value functions for serde
fn default_tab_width() -> usize {
    defaults::TAB_WIDTH
}

fn default_wrap_width() -> usize {
    defaults::WRAP_WIDTH
}

fn default_wide_glyphs() -> bool {
    defaults::WIDE_GLYPHS
}

fn default_auto_indent() -> bool {
    defaults::AUTO_INDENT
}

fn default_history_limit() -> usize {
    defaults::HISTORY_LIMIT
}

fn default_repeat_interval_ms() -> u64 {
    defaults::REPEAT_INTERVAL_MS
}

fn default_repeat_threshold() -> usize {
    defaults::REPEAT_THRESHOLD
}

fn default_repeat_step() -> usize {
    defaults::REPEAT_STEP
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

fn default_max_entries() -> usize {
    defaults::MAX_LOG_ENTRIES
}

// Default implementations
impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            wrap_width: default_wrap_width(),
            wide_glyphs: default_wide_glyphs(),
            auto_indent: default_auto_indent(),
            history_limit: default_history_limit(),
            repeat: RepeatSettings::default(),
        }
    }
}

impl Default for RepeatSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_repeat_interval_ms(),
            threshold: default_repeat_threshold(),
            step: default_repeat_step(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
            max_entries: default_max_entries(),
        }
    }
}
