//! Strategy routing: classifies tasks by extension and hands them to the
//! image or video render strategy.

use std::path::Path;
use std::sync::Arc;

use crate::adapter::{Toolchain, ToolRunner};
use crate::config::Config;
use crate::error::RenderResult;

use super::image::ImageStrategy;
use super::pool::{MediaKind, MediaTask, Render};
use super::video::VideoStrategy;

/// The production [`Render`] implementation: one strategy per media kind,
/// selected by the configured extension sets.
pub struct MediaRenderer {
    image_extensions: Vec<String>,
    video_extensions: Vec<String>,
    image: ImageStrategy,
    video: VideoStrategy,
}

impl MediaRenderer {
    /// Wire both strategies against the probed toolchain.
    pub fn new(config: &Config, toolchain: Toolchain, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            image_extensions: config.processing.image_extensions.clone(),
            video_extensions: config.processing.video_extensions.clone(),
            image: ImageStrategy::new(toolchain, Arc::clone(&runner)),
            video: VideoStrategy::new(toolchain, runner),
        }
    }
}

impl Render for MediaRenderer {
    fn classify(&self, ext: &str) -> Option<MediaKind> {
        if self.image_extensions.iter().any(|e| e == ext) {
            Some(MediaKind::Image)
        } else if self.video_extensions.iter().any(|e| e == ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    fn render(&self, kind: MediaKind, task: &MediaTask, thumb_dir: &Path) -> RenderResult<()> {
        match kind {
            MediaKind::Image => self.image.render(task, thumb_dir),
            MediaKind::Video => self.video.render(task, thumb_dir),
        }
    }
}
