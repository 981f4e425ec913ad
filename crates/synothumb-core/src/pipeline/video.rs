//! Video render strategy: streaming proxy plus a reduced thumbnail set
//! from one representative frame.

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use crate::adapter::{Toolchain, ToolRunner};
use crate::error::{RenderError, RenderResult};
use crate::specs;

use super::pool::MediaTask;
use super::{decode, thumbnail};

/// Offset of the representative frame. Videos shorter than this fail the
/// task (the extractor produces no readable frame).
const FRAME_SEEK: &str = "00:00:03";

/// Produces the FLV proxy and the XL/M thumbnails for a video source.
///
/// Only the extremes of the rendition table are kept for video frames;
/// the mid sizes and the letterboxed preview are image-only.
pub struct VideoStrategy {
    toolchain: Toolchain,
    runner: Arc<dyn ToolRunner>,
}

impl VideoStrategy {
    pub fn new(toolchain: Toolchain, runner: Arc<dyn ToolRunner>) -> Self {
        Self { toolchain, runner }
    }

    /// Render the proxy and thumbnails into `thumb_dir`.
    pub fn render(&self, task: &MediaTask, thumb_dir: &Path) -> RenderResult<()> {
        let program = self.toolchain.transcoder.program();

        // 320x180 / 12fps / 44.1kHz stereo FLV proxy, written in place
        let proxy = thumb_dir.join(specs::FILM_NAME);
        self.runner
            .run_discard(program, &proxy_args(&task.path, &proxy))?;

        // Representative frame into a scratch file, cleaned up on drop
        let scratch = tempfile::Builder::new()
            .prefix("synothumb-frame-")
            .suffix(".jpg")
            .tempfile()
            .map_err(|e| RenderError::Scratch {
                message: e.to_string(),
            })?;
        self.runner
            .run_discard(program, &frame_args(&task.path, scratch.path()))?;

        let frame = decode::open_image(scratch.path()).map_err(|e| match e {
            // An unreadable frame usually means the video is shorter than
            // the seek offset; keep the source path in the report
            RenderError::Decode { message, .. } => RenderError::Decode {
                path: task.path.clone(),
                message: format!("extracted frame unreadable: {message}"),
            },
            other => other,
        })?;

        thumbnail::write_scaled_set(frame, &specs::VIDEO_SCALED, thumb_dir)?;
        Ok(())
    }
}

fn proxy_args(source: &Path, proxy: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-loglevel", "panic", "-i"]
        .iter()
        .map(|s| OsString::from(*s))
        .collect();
    args.push(source.as_os_str().to_os_string());
    args.extend(
        [
            "-y", "-ar", "44100", "-r", "12", "-ac", "2", "-f", "flv", "-qscale", "5", "-s",
            "320x180", "-aspect", "320:180",
        ]
        .iter()
        .map(|s| OsString::from(*s)),
    );
    args.push(proxy.as_os_str().to_os_string());
    args
}

fn frame_args(source: &Path, scratch: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-loglevel", "panic", "-i"]
        .iter()
        .map(|s| OsString::from(*s))
        .collect();
    args.push(source.as_os_str().to_os_string());
    args.extend(
        ["-y", "-an", "-ss", FRAME_SEEK, "-r", "1", "-vframes", "1"]
            .iter()
            .map(|s| OsString::from(*s)),
    );
    args.push(scratch.as_os_str().to_os_string());
    args
}
