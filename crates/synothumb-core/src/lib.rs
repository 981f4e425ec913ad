//! synothumb core - media library thumbnail pipeline.
//!
//! Walks a media library and produces the standardized `@eaDir` rendition
//! set per file: multi-size JPEG thumbnails with orientation correction and
//! a letterboxed preview for still images, plus a streaming FLV proxy and a
//! reduced thumbnail set for videos.
//!
//! # Architecture
//!
//! ```text
//! Discovery → queue → worker pool → {ImageStrategy | VideoStrategy} → @eaDir/
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use synothumb_core::{
//!     Config, ConvertPool, FileDiscovery, MediaRenderer, SystemRunner, Toolchain,
//! };
//!
//! #[tokio::main]
//! async fn main() -> synothumb_core::Result<()> {
//!     let config = Config::load()?;
//!     let toolchain = Toolchain::probe()?;
//!     let renderer = Arc::new(MediaRenderer::new(&config, toolchain, Arc::new(SystemRunner)));
//!
//!     let (pool, _outcomes) = ConvertPool::spawn(renderer, config.worker_count(), 256);
//!     for path in FileDiscovery::new(&config.processing).discover("/volume1/photo".as_ref()) {
//!         pool.submit(path).await;
//!     }
//!     let stats = pool.wait_for_completion().await;
//!     println!("completed {}", stats.completed);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod adapter;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod specs;

// Re-exports for convenient access
pub use adapter::{SystemRunner, Toolchain, ToolRunner, Transcoder};
pub use config::Config;
pub use error::{ConfigError, RenderError, RenderResult, Result, StartupError, SynothumbError};
pub use pipeline::{
    ConvertPool, FileDiscovery, MediaKind, MediaRenderer, MediaTask, PoolStats, TaskOutcome,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
