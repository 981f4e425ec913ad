//! Shared thumbnail production: aspect-preserving scaling, the shrink
//! cascade, and the letterboxed preview.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{RenderError, RenderResult};
use crate::specs::{ThumbSpec, JPEG_QUALITY, PREVIEW};

/// Shrink an image to fit within a bounding box, preserving aspect ratio.
///
/// Sources already inside the box are passed through untouched; thumbnails
/// are never upscaled.
pub fn fit_within(image: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() <= width && image.height() <= height {
        image
    } else {
        // Lanczos3 for antialiased downscaling
        image.resize(width, height, FilterType::Lanczos3)
    }
}

/// Encode an image as JPEG at the fixed rendition quality.
pub fn save_jpeg(image: &DynamicImage, path: &Path) -> RenderResult<()> {
    let file = File::create(path).map_err(|e| RenderError::Encode {
        path: path.to_path_buf(),
        message: format!("cannot create file: {e}"),
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| RenderError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Produce one scaled rendition per spec, writing each into `dir`.
///
/// The working image shrinks through the cascade (specs must descend in
/// size), so each rendition is produced from the previous one. Returns the
/// final working image for callers that keep shrinking (the preview).
pub fn write_scaled_set(
    image: DynamicImage,
    specs: &[ThumbSpec],
    dir: &Path,
) -> RenderResult<DynamicImage> {
    let mut working = image;
    for spec in specs {
        working = fit_within(working, spec.width, spec.height);
        save_jpeg(&working, &dir.join(spec.file_name()))?;
    }
    Ok(working)
}

/// Produce the fixed-size preview: shrink to fit 120x160, then center on a
/// black canvas of exactly those dimensions (letterbox or pillarbox
/// depending on the source aspect ratio).
pub fn write_preview(image: DynamicImage, dir: &Path) -> RenderResult<()> {
    let shrunk = fit_within(image, PREVIEW.width, PREVIEW.height).to_rgb8();

    let mut canvas = RgbImage::from_pixel(PREVIEW.width, PREVIEW.height, Rgb([0, 0, 0]));
    let off_x = (PREVIEW.width - shrunk.width()) / 2;
    let off_y = (PREVIEW.height - shrunk.height()) / 2;
    image::imageops::overlay(&mut canvas, &shrunk, i64::from(off_x), i64::from(off_y));

    save_jpeg(
        &DynamicImage::ImageRgb8(canvas),
        &dir.join(PREVIEW.file_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs;

    fn white(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let out = fit_within(white(2000, 1000), 1280, 1280);
        assert_eq!((out.width(), out.height()), (1280, 640));

        let out = fit_within(white(1000, 2000), 1280, 1280);
        assert_eq!((out.width(), out.height()), (640, 1280));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        let out = fit_within(white(300, 200), 1280, 1280);
        assert_eq!((out.width(), out.height()), (300, 200));
    }

    #[test]
    fn test_scaled_set_writes_every_spec() {
        let dir = tempfile::tempdir().unwrap();
        let last = write_scaled_set(white(2000, 1000), &specs::IMAGE_SCALED, dir.path()).unwrap();

        for spec in &specs::IMAGE_SCALED {
            let path = dir.path().join(spec.file_name());
            let (w, h) = image::image_dimensions(&path).unwrap();
            assert_eq!((w, h), (spec.width, spec.width / 2), "{}", spec.key);
        }
        // Working image ends at the smallest rendition
        assert_eq!((last.width(), last.height()), (160, 80));
    }

    #[test]
    fn test_preview_is_exactly_canvas_sized_and_padded_black() {
        let dir = tempfile::tempdir().unwrap();
        // Wide source: letterboxed top and bottom
        write_preview(white(1200, 600), dir.path()).unwrap();

        let path = dir.path().join(specs::PREVIEW.file_name());
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!((img.width(), img.height()), (120, 160));

        // Corners are padding (allow JPEG ringing), center is source
        let corner = img.get_pixel(0, 0);
        assert!(corner[0] < 32 && corner[1] < 32 && corner[2] < 32);
        let center = img.get_pixel(60, 80);
        assert!(center[0] > 200 && center[1] > 200 && center[2] > 200);
    }

    #[test]
    fn test_preview_tall_source_is_pillarboxed() {
        let dir = tempfile::tempdir().unwrap();
        write_preview(white(300, 1200), dir.path()).unwrap();

        let path = dir.path().join(specs::PREVIEW.file_name());
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!((img.width(), img.height()), (120, 160));

        // Tall source fills the height; left edge midpoint is padding
        let edge = img.get_pixel(0, 80);
        assert!(edge[0] < 32 && edge[1] < 32 && edge[2] < 32);
    }
}
