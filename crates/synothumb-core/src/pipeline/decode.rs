//! Still-image decoding with content-based format detection.

use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;

use crate::error::{RenderError, RenderResult};

/// Decode a still image from a file.
pub fn open_image(path: &Path) -> RenderResult<DynamicImage> {
    let reader = image::ImageReader::open(path).map_err(|e| RenderError::Decode {
        path: path.to_path_buf(),
        message: format!("cannot open file: {e}"),
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|e| RenderError::Decode {
            path: path.to_path_buf(),
            message: format!("cannot detect image format: {e}"),
        })?;
    reader.decode().map_err(|e| RenderError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Decode a still image from an in-memory byte stream.
///
/// Used for raw-decoder output (dcraw emits PNM on stdout); the format is
/// detected from the bytes, not the source path.
pub fn decode_bytes(bytes: Vec<u8>, path: &Path) -> RenderResult<DynamicImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RenderError::Decode {
            path: path.to_path_buf(),
            message: format!("cannot detect image format: {e}"),
        })?;
    reader.decode().map_err(|e| RenderError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
