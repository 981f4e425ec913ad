//! EXIF orientation correction.
//!
//! Only the stored-rotation values (3, 6, 8) are handled; mirrored
//! orientations and anything else pass the image through unchanged, as
//! does a missing tag.

use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read the orientation tag (EXIF 274) from a source file.
///
/// Returns `None` if the file has no EXIF container or no orientation
/// field; absence is not an error.
pub fn orientation_tag(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Short(v) => v.first().map(|&x| x as u32),
            Value::Long(v) => v.first().copied(),
            _ => None,
        })
}

/// Rotate a decoded image according to its orientation tag value.
///
/// Tag 3 is upside down; tags 6 and 8 are the two portrait cases, rotated
/// with the canvas expanded to the swapped bounds. Unmapped values leave
/// the image untouched.
pub fn apply(image: DynamicImage, tag: Option<u32>) -> DynamicImage {
    match tag {
        Some(3) => image.rotate180(),
        // Tag 6 displays correctly after a 90° clockwise turn (270° CCW)
        Some(6) => image.rotate90(),
        Some(8) => image.rotate270(),
        _ => image,
    }
}

/// Orientation-correct a decoded image using its source file's metadata.
pub fn correct(path: &Path, image: DynamicImage) -> DynamicImage {
    apply(image, orientation_tag(path))
}
