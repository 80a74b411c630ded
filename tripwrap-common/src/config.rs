//! Configuration loading and config file resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TRIPWRAP_CONFIG` environment variable
//! 3. `<config dir>/tripwrap/config.toml`
//! 4. Built-in defaults (fallback)
//!
//! A missing file is not an error: a warning is logged and the built-in
//! defaults are used. A file that exists but does not parse is an error.

use crate::time::millis_to_duration;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TRIPWRAP_CONFIG";

/// Top-level TOML configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TomlConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub story: StoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Slide timing
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Dwell time for intro, quarter-intro and summary slides
    #[serde(default = "default_base_slide_ms")]
    pub base_slide_ms: u64,

    /// Extra dwell per additional photo on a destination slide
    #[serde(default = "default_per_image_ms")]
    pub per_image_ms: u64,

    /// Upper bound for a destination slide
    #[serde(default = "default_max_destination_ms")]
    pub max_destination_ms: u64,

    /// Settle window after a slide change during which taps are ignored
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Autoplay timer period
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_slide_ms: default_base_slide_ms(),
            per_image_ms: default_per_image_ms(),
            max_destination_ms: default_max_destination_ms(),
            settle_ms: default_settle_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    pub fn settle(&self) -> Duration {
        millis_to_duration(self.settle_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic
        millis_to_duration(self.tick_interval_ms.max(1))
    }
}

/// Story presentation settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoryConfig {
    /// Display name handed to the export side
    #[serde(default = "default_profile_name")]
    pub profile_name: String,

    /// Offset used to decide which calendar month a photo was taken in
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            profile_name: default_profile_name(),
            utc_offset_minutes: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_slide_ms() -> u64 {
    5000
}

fn default_per_image_ms() -> u64 {
    1500
}

fn default_max_destination_ms() -> u64 {
    20_000
}

fn default_settle_ms() -> u64 {
    300
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_profile_name() -> String {
    "Traveller".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file that must exist
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve and load configuration, degrading to defaults when no file exists
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        let (config, source) = Self::load_with_source(cli_arg)?;
        source.log();
        Ok(config)
    }

    /// Like [`TomlConfig::load`], but without logging
    ///
    /// Callers that install their subscriber after reading the config use
    /// this and call [`ConfigSource::log`] once logging is up.
    pub fn load_with_source(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match resolve_config_path(cli_arg) {
            Some(path) if path.exists() => {
                let config = Self::load_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path))),
            None => Ok((Self::default(), ConfigSource::NoLocation)),
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Resolved location had no file; built-in defaults
    Missing(PathBuf),
    /// No location could be resolved; built-in defaults
    NoLocation,
}

impl ConfigSource {
    pub fn is_default(&self) -> bool {
        !matches!(self, ConfigSource::File(_))
    }

    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                info!("Loaded configuration from {}", path.display())
            }
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::NoLocation => {
                warn!("No config file location available, using built-in defaults")
            }
        }
    }
}

/// Pick the config file location by priority
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path()
}

/// `<config dir>/tripwrap/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tripwrap").join("config.toml"))
}
