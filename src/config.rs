//! Configuration file support for the viewer.
//!
//! Settings that the embedding shell may persist and hand back: log
//! verbosity and the styling used when measurements are flattened into an
//! export.

use serde::{Deserialize, Serialize};

use crate::constants::overlay;
use crate::error::ViewerError;

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Stroke width for exported measurement overlays, natural pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,

    /// Label font size for exported measurement overlays, points
    #[serde(default = "default_label_size")]
    pub label_size: f32,
}

fn default_stroke_width() -> f32 {
    overlay::STROKE_WIDTH
}

fn default_label_size() -> f32 {
    overlay::LABEL_SIZE
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            stroke_width: default_stroke_width(),
            label_size: default_label_size(),
        }
    }
}

impl ViewerConfig {
    /// Export to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ViewerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import from JSON, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        if config.version != CONFIG_VERSION {
            return Err(ViewerError::ConfigVersion {
                expected: CONFIG_VERSION,
                found: config.version,
            });
        }
        Ok(config)
    }
}
