//! Serializable collection configuration (TOML).
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working setup that reads `pen_america_banned_books.csv` and writes
//! `data/raw/google_trends_complete.csv`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use bantrends_core::data::GoogleTrendsConfig;
use bantrends_core::CollectorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for a collection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub provider: ProviderConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

/// Where subjects come from and which columns hold what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub title_column: String,
    pub date_column: String,
    /// Optional pass-through column; absent from the file is fine.
    pub state_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("pen_america_banned_books.csv"),
            title_column: "Book Title".into(),
            date_column: "Ban Date".into(),
            state_column: "State".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Write a partial snapshot after this many processed subjects.
    pub checkpoint_every: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/raw/google_trends_complete.csv"),
            checkpoint_every: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub geo: String,
    pub language: String,
    /// Timezone offset in minutes.
    pub tz_offset: i32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geo: "US".into(),
            language: "en-US".into(),
            tz_offset: 360,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub inter_window_delay_secs: u64,
    pub retry_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            inter_window_delay_secs: 12,
            retry_delay_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("data_collection.log"),
        }
    }
}

impl CollectionConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.checkpoint_every == 0 {
            return Err(ConfigError::Invalid("output.checkpoint_every must be at least 1".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        if self.provider.geo.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.geo must not be empty".into()));
        }
        if self.input.title_column.is_empty() || self.input.date_column.is_empty() {
            return Err(ConfigError::Invalid(
                "input.title_column and input.date_column must be set".into(),
            ));
        }
        Ok(())
    }

    /// Retry and pacing policy for the collector.
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            geo: self.provider.geo.clone(),
            max_attempts: self.retry.max_attempts,
            inter_window_delay: Duration::from_secs(self.retry.inter_window_delay_secs),
            retry_delay: Duration::from_secs(self.retry.retry_delay_secs),
        }
    }

    /// Connection settings for the live Google Trends client.
    pub fn trends_config(&self) -> GoogleTrendsConfig {
        GoogleTrendsConfig {
            language: self.provider.language.clone(),
            tz_offset: self.provider.tz_offset,
            timeout: Duration::from_secs(self.provider.timeout_secs),
            ..GoogleTrendsConfig::default()
        }
    }
}
