//! Configuration management for Readmore.
//!
//! Provides configuration loading from TOML files with support for
//! multiple file locations, environment variable overrides, and sensible defaults.
//! [`WidgetConfig`] is the value-typed description of one collapsible text
//! widget; [`Config`] wraps it together with host settings such as logging.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::assembler::LinePolicy;
use crate::layout::{TextAlign, TextDirection};
use crate::style::TextStyle;
use crate::toggle::AnimationSpec;
use crate::truncation::{DEFAULT_ELLIPSIS, TruncationStrategy};


/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "READMORE_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        /// Path to the configuration file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML parse error.
        source: toml::de::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Log file rotation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Rolling file logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory the log files are written to.
    pub directory: String,
    pub rotation: Rotation,
    /// Number of rotated files to keep.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            rotation: Rotation::default(),
            max_files: 7,
        }
    }
}

/// Immutable description of one collapsible text widget.
///
/// Compared by value: a widget recomputes its layout whenever a new config
/// differs from the previous one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// The full text to display.
    pub text: String,
    /// Line budget of the collapsed view.
    pub max_lines: usize,
    /// Style of plain text; the host's ambient style when unset.
    pub text_style: Option<TextStyle>,
    /// Style of tokens and the affordance; the text style tinted with the
    /// accent color when unset.
    pub link_style: Option<TextStyle>,
    pub see_more_label: String,
    pub see_less_label: String,
    /// Inserted between the truncated text and the "see more" label.
    pub ellipsis: String,
    pub text_align: TextAlign,
    pub direction: TextDirection,
    /// Whether tapping plain text also toggles an overflowing widget.
    pub enable_text_tap_toggle: bool,
    pub enable_selection: bool,
    pub animation: AnimationSpec,
    pub strategy: TruncationStrategy,
    pub line_policy: LinePolicy,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            max_lines: 3,
            text_style: None,
            link_style: None,
            see_more_label: "See more".to_string(),
            see_less_label: "See less".to_string(),
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            text_align: TextAlign::default(),
            direction: TextDirection::default(),
            enable_text_tap_toggle: true,
            enable_selection: true,
            animation: AnimationSpec::default(),
            strategy: TruncationStrategy::default(),
            line_policy: LinePolicy::default(),
        }
    }
}

impl WidgetConfig {
    /// A default configuration displaying `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Check value ranges that the type system does not enforce.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero line budget or an empty
    /// toggle label.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lines == 0 {
            return Err(ConfigError::Invalid {
                field: "widget.max_lines",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.see_more_label.is_empty() {
            return Err(ConfigError::Invalid {
                field: "widget.see_more_label",
                reason: "must not be empty".to_string(),
            });
        }
        if self.see_less_label.is_empty() {
            return Err(ConfigError::Invalid {
                field: "widget.see_less_label",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Widget defaults (labels, limits, styles, strategy).
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Rolling file logging; stderr-only logging when absent.
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Load configuration from file system.
    ///
    /// Priority order:
    /// 1. `explicit` path (e.g. a `--config` flag)
    /// 2. READMORE_CONFIG environment variable
    /// 3. ./readmore.toml (local directory)
    /// 4. ~/.config/readmore/config.toml (user config)
    ///
    /// Returns default config if no config file found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if a found file (or the explicit
    /// path) cannot be read.
    /// Returns [`ConfigError::ParseError`] if a found file is not valid TOML.
    /// Returns [`ConfigError::Invalid`] if a value is out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Explicit path (highest priority)
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        // 2. Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Self::load_from(p);
            }
        }

        // 3. Local directory
        let local = PathBuf::from("readmore.toml");
        if local.exists() {
            return Self::load_from(local);
        }

        // 4. User config directory (~/.config/readmore/)
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config/readmore/config.toml");
            if user_config.exists() {
                return Self::load_from(user_config);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    ///
    /// Reads the file at the given path, parses it as TOML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read.
    /// Returns [`ConfigError::ParseError`] if the file is not valid TOML.
    /// Returns [`ConfigError::Invalid`] if a value is out of range.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.widget.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
