//! Configuration management for linedit.
//!
//! This crate provides typed settings with serde defaults, TOML parsing,
//! validation and saving. Where the file lives is up to the caller.

mod settings;

pub use settings::{Config, EditorSettings, LoggingSettings, RepeatSettings};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Default values as constants
pub mod defaults {
    pub const TAB_WIDTH: usize = 4;
    pub const WRAP_WIDTH: usize = 80;
    pub const WIDE_GLYPHS: bool = true;
    pub const AUTO_INDENT: bool = true;
    pub const HISTORY_LIMIT: usize = 1000;
    pub const REPEAT_INTERVAL_MS: u64 = 120;
    pub const REPEAT_THRESHOLD: usize = 8;
    pub const REPEAT_STEP: usize = 4;
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 500;
}

impl Config {
    /// Load configuration from file.
    ///
    /// A missing file yields the defaults; missing keys are filled in
    /// with their default values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::validate_content(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Parse TOML without semantic checks.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Check values the editor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.editor.tab_width == 0 {
            bail!("editor.tab_width must be greater than zero");
        }
        if self.editor.repeat.step == 0 {
            bail!("editor.repeat.step must be greater than zero");
        }
        Ok(())
    }

    /// Validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        let config = Self::from_toml_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
