//! Error types for the synothumb conversion pipeline.
//!
//! Per-task failures (`RenderError`) are contained at the worker boundary
//! and never abort the run; only startup-time failures (`StartupError`,
//! `ConfigError`) may terminate the process.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for synothumb operations.
#[derive(Error, Debug)]
pub enum SynothumbError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Startup tool-availability errors
    #[error("Startup error: {0}")]
    Startup(#[from] StartupError),

    /// Render errors for a single task
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fatal errors detected before any task is scheduled.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Neither ffmpeg nor avconv is on PATH. Video support is mandatory,
    /// so the whole run aborts.
    #[error("no video transcoder found on PATH (tried ffmpeg, avconv)")]
    NoTranscoder,
}

/// Failures while rendering a single task.
///
/// These abort the task, not the pool: the owning worker logs the error
/// and moves on to the next queued path.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Source (or extracted frame) could not be decoded as a still image
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Thumbnail could not be encoded or written
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// External tool failed to spawn or exited non-zero
    #[error("Tool error ({program}): {message}")]
    Tool { program: String, message: String },

    /// Scratch file for an extracted frame could not be created
    #[error("Scratch file error: {message}")]
    Scratch { message: String },

    /// Render task aborted abnormally (e.g. panicked inside a worker)
    #[error("Render aborted for {path}: {message}")]
    Aborted { path: PathBuf, message: String },
}

/// Convenience type alias for synothumb results.
pub type Result<T> = std::result::Result<T, SynothumbError>;

/// Convenience type alias for per-task render results.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
