use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::subtitle_processor::SubtitleEncoding;
use crate::sync::{MatchHeuristicConfig, MAX_SHIFT_MS};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Encoding used to read subtitle files when none is given
    #[serde(default)]
    pub encoding: SubtitleEncoding,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Time shift settings
    #[serde(default)]
    pub shift: ShiftConfig,

    /// Reference match suggestion settings
    #[serde(default)]
    pub matching: MatchHeuristicConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output file configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Inserted before the extension of generated files (movie.<suffix>.srt)
    #[serde(default = "default_output_suffix")]
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
        }
    }
}

/// Time shift configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShiftConfig {
    /// Largest accepted offset in either direction, in milliseconds
    #[serde(default = "default_max_shift_ms")]
    pub max_shift_ms: i64,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            max_shift_ms: default_max_shift_ms(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_output_suffix() -> String {
    "synced".to_string()
}

fn default_max_shift_ms() -> i64 {
    MAX_SHIFT_MS
}

impl Config {
    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let suffix = self.output.suffix.trim();
        if suffix.is_empty() || suffix.contains(['/', '\\']) {
            return Err(anyhow!("Output suffix must be a non-empty file name fragment: '{}'", self.output.suffix));
        }

        if self.shift.max_shift_ms <= 0 {
            return Err(anyhow!("Maximum shift must be positive, got {}", self.shift.max_shift_ms));
        }

        let matching = &self.matching;
        if !(matching.coverage > 0.0 && matching.coverage <= 1.0) {
            return Err(anyhow!("Match coverage must be within (0, 1], got {}", matching.coverage));
        }
        if matching.min_candidates == 0 {
            return Err(anyhow!("Match suggestions need at least one candidate"));
        }
        if matching.min_scale_ms <= 0.0 || matching.single_candidate_std_dev_ms <= 0.0 {
            return Err(anyhow!("Match scale and fallback spread must be positive"));
        }
        if matching.min_threshold_window_ms < 0.0 {
            return Err(anyhow!("Match threshold window cannot be negative"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            encoding: SubtitleEncoding::default(),
            output: OutputConfig::default(),
            shift: ShiftConfig::default(),
            matching: MatchHeuristicConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
