//! Configuration management for synothumb.
//!
//! Configuration is loaded from the platform config dir (e.g.
//! `~/.config/synothumb/config.toml`) with sensible defaults when the file
//! is absent. The rendition table itself is not configurable (see
//! [`crate::specs`]); configuration covers worker sizing, the recognized
//! extension sets, and logging.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker pool and extension settings
    pub processing: ProcessingConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Worker pool and extension settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of pool workers; 0 means `available_parallelism + 1`
    pub workers: usize,

    /// Capacity of the submission queue (senders block when full)
    pub queue_depth: usize,

    /// Extensions handled by the image render strategy (lower-case, no dot)
    pub image_extensions: Vec<String>,

    /// Extensions handled by the video render strategy (lower-case, no dot)
    pub video_extensions: Vec<String>,

    /// Filesystem-metadata file names excluded during discovery
    pub exclude_names: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            queue_depth: 256,
            image_extensions: vec![
                "jpg".to_string(),
                "png".to_string(),
                "jpeg".to_string(),
                "tif".to_string(),
                "bmp".to_string(),
                "cr2".to_string(),
            ],
            video_extensions: vec![
                "mov".to_string(),
                "m4v".to_string(),
                "mp4".to_string(),
            ],
            exclude_names: vec![
                ".DS_Store".to_string(),
                ".apdisk".to_string(),
                "Thumbs.db".to_string(),
            ],
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// `~/.synothumb/config.toml` if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "synothumb", "synothumb")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".synothumb").join("config.toml")
            })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.queue_depth == 0 {
            return Err(ConfigError::ValidationError(
                "processing.queue_depth must be at least 1".to_string(),
            ));
        }
        if self.processing.image_extensions.is_empty()
            && self.processing.video_extensions.is_empty()
        {
            return Err(ConfigError::ValidationError(
                "no image or video extensions configured".to_string(),
            ));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown logging.level {other:?}"
                )))
            }
        }
        Ok(())
    }

    /// Resolve the worker pool size.
    ///
    /// `workers = 0` selects one worker per CPU plus one, so the pool stays
    /// busy while some workers block on external processes.
    pub fn worker_count(&self) -> usize {
        if self.processing.workers > 0 {
            self.processing.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                + 1
        }
    }
}
