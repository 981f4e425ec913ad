//! Image render strategy: the full six-rendition set for a still image.

use image::DynamicImage;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use crate::adapter::{Toolchain, ToolRunner};
use crate::error::{RenderError, RenderResult};
use crate::specs;

use super::pool::MediaTask;
use super::{decode, orientation, thumbnail};

/// Raw formats routed through the external raw decoder.
const RAW_EXTENSION: &str = "cr2";

/// dcraw: 8-bit, fastest interpolation, camera white balance, highlight
/// blending, output on stdout.
const RAW_DECODE_ARGS: [&str; 8] = ["-c", "-b", "8", "-q", "0", "-w", "-H", "5"];

/// Produces the five scaled thumbnails plus the letterboxed preview from a
/// decoded, orientation-corrected still image.
pub struct ImageStrategy {
    toolchain: Toolchain,
    runner: Arc<dyn ToolRunner>,
}

impl ImageStrategy {
    pub fn new(toolchain: Toolchain, runner: Arc<dyn ToolRunner>) -> Self {
        Self { toolchain, runner }
    }

    /// Render every image rendition into `thumb_dir`.
    ///
    /// No cleanup on mid-sequence failure: the idempotency marker (XL) is
    /// written first, so a directory holding a partial set is retried on
    /// the next run only if that first write never landed.
    pub fn render(&self, task: &MediaTask, thumb_dir: &Path) -> RenderResult<()> {
        let image = self.decode_source(task)?;
        let image = orientation::correct(&task.path, image);

        let working = thumbnail::write_scaled_set(image, &specs::IMAGE_SCALED, thumb_dir)?;
        thumbnail::write_preview(working, thumb_dir)
    }

    /// Decode the source, going through the raw decoder for CR2.
    fn decode_source(&self, task: &MediaTask) -> RenderResult<DynamicImage> {
        if task.ext != RAW_EXTENSION {
            return decode::open_image(&task.path);
        }

        let Some(raw_tool) = self.toolchain.raw_decoder else {
            return Err(RenderError::Decode {
                path: task.path.clone(),
                message: "no raw decoder available (dcraw not found)".to_string(),
            });
        };

        let mut args: Vec<OsString> = RAW_DECODE_ARGS.iter().map(|s| OsString::from(*s)).collect();
        args.push(task.path.clone().into_os_string());

        let bytes = self.runner.run_capture(raw_tool, &args)?;
        decode::decode_bytes(bytes, &task.path)
    }
}
