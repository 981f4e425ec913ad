//! The conversion pipeline.
//!
//! - **decode**: still-image decoding (file or captured byte stream)
//! - **orientation**: EXIF stored-rotation correction
//! - **thumbnail**: scaled rendition cascade and letterboxed preview
//! - **image** / **video**: the two render strategies
//! - **processor**: extension-based strategy routing
//! - **pool**: the worker pool, idempotency, and failure isolation
//! - **discovery**: media traversal feeding the queue

pub mod decode;
pub mod discovery;
pub mod image;
pub mod orientation;
pub mod pool;
pub mod processor;
pub mod thumbnail;
pub mod video;

// Re-exports for convenient access
pub use discovery::FileDiscovery;
pub use image::ImageStrategy;
pub use pool::{ConvertPool, MediaKind, MediaTask, PoolStats, Render, SkipReason, TaskOutcome};
pub use processor::MediaRenderer;
pub use video::VideoStrategy;
