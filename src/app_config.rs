/*!
 * Application configuration for playmark.
 *
 * Configuration is read from a JSON file; a default file is written on
 * first run. Every field carries a default so partial files stay valid.
 */

use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::document::PageLayout;

/// Log level for application output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal operational messages
    #[default]
    Info,
    /// Detailed debugging information
    Debug,
    /// Very verbose tracing information
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Markup delimiters recognized by the conversion passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTags {
    /// Prefix marking a block stage direction paragraph
    #[serde(default = "default_stage_direction_tag")]
    pub stage_direction_tag: String,

    /// Prefix marking a centered block paragraph
    #[serde(default = "default_centered_tag")]
    pub centered_tag: String,

    /// Opening delimiter of an overline stage direction
    #[serde(default = "default_overline_open")]
    pub overline_open: String,

    /// Closing delimiter of an overline stage direction
    #[serde(default = "default_overline_close")]
    pub overline_close: String,

    /// Bold delimiter (used on both sides)
    #[serde(default = "default_bold_tag")]
    pub bold_tag: String,

    /// Underline delimiter (used on both sides)
    #[serde(default = "default_underline_tag")]
    pub underline_tag: String,

    /// Italic delimiter (used on both sides)
    #[serde(default = "default_italic_tag")]
    pub italic_tag: String,

    /// Strikethrough delimiter (used on both sides)
    #[serde(default = "default_strikethrough_tag")]
    pub strikethrough_tag: String,
}

fn default_stage_direction_tag() -> String {
    "## ".to_string()
}

fn default_centered_tag() -> String {
    "@@ ".to_string()
}

fn default_overline_open() -> String {
    "[[".to_string()
}

fn default_overline_close() -> String {
    "]]".to_string()
}

fn default_bold_tag() -> String {
    "*".to_string()
}

fn default_underline_tag() -> String {
    "_".to_string()
}

fn default_italic_tag() -> String {
    "\\".to_string()
}

fn default_strikethrough_tag() -> String {
    "-".to_string()
}

impl Default for MarkupTags {
    fn default() -> Self {
        MarkupTags {
            stage_direction_tag: default_stage_direction_tag(),
            centered_tag: default_centered_tag(),
            overline_open: default_overline_open(),
            overline_close: default_overline_close(),
            bold_tag: default_bold_tag(),
            underline_tag: default_underline_tag(),
            italic_tag: default_italic_tag(),
            strikethrough_tag: default_strikethrough_tag(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the tag registry file
    #[serde(default = "default_registry_file")]
    pub registry_file: String,

    /// Visual lines per page for the speech splitter
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,

    /// Characters per visual line before wrapping
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// Markup delimiters
    #[serde(default)]
    pub markup: MarkupTags,

    /// Log level for application output
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_registry_file() -> String {
    "tags.txt".to_string()
}

fn default_lines_per_page() -> usize {
    46
}

fn default_wrap_width() -> usize {
    60
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry_file: default_registry_file(),
            lines_per_page: default_lines_per_page(),
            wrap_width: default_wrap_width(),
            markup: MarkupTags::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a file, writing a default file first if
    /// none exists.
    pub fn from_file_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            info!("Created default configuration at {:?}", path);
            return Ok(config);
        }
        Self::from_file(path)
    }

    /// Write the configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Page geometry derived from the configuration
    pub fn page_layout(&self) -> PageLayout {
        PageLayout {
            wrap_width: self.wrap_width,
            lines_per_page: self.lines_per_page,
        }
    }
}
