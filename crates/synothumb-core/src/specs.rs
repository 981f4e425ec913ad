//! The fixed table of thumbnail renditions and the `@eaDir` output layout.
//!
//! These are protocol constants consumed by Synology's photo frontend,
//! not user configuration: file names, target boxes, and the per-source
//! output directory are all derived deterministically here.

use std::path::{Path, PathBuf};

/// Directory segment holding all generated renditions, one subdirectory
/// per source file.
pub const EA_DIR: &str = "@eaDir";

/// Reserved name for the streaming proxy written next to video thumbnails.
///
/// Distinct from every `SYNOPHOTO_THUMB_*` name so the two output families
/// can never collide.
pub const FILM_NAME: &str = "SYNOPHOTO_FILM.flv";

/// JPEG quality used for every rendition.
pub const JPEG_QUALITY: u8 = 90;

/// One entry in the fixed rendition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbSpec {
    /// Key embedded in the output file name (e.g. "XL")
    pub key: &'static str,
    /// Bounding box width in pixels
    pub width: u32,
    /// Bounding box height in pixels
    pub height: u32,
}

impl ThumbSpec {
    /// Deterministic output file name for this rendition.
    pub fn file_name(&self) -> String {
        format!("SYNOPHOTO_THUMB_{}.jpg", self.key)
    }
}

/// Largest rendition; its presence in a thumbnail directory marks the
/// source file as already processed.
pub const XL: ThumbSpec = ThumbSpec {
    key: "XL",
    width: 1280,
    height: 1280,
};

pub const L: ThumbSpec = ThumbSpec {
    key: "L",
    width: 800,
    height: 800,
};

pub const B: ThumbSpec = ThumbSpec {
    key: "B",
    width: 640,
    height: 640,
};

pub const M: ThumbSpec = ThumbSpec {
    key: "M",
    width: 320,
    height: 320,
};

pub const S: ThumbSpec = ThumbSpec {
    key: "S",
    width: 160,
    height: 160,
};

/// Aspect-preserving preview composed onto a black 120x160 canvas.
pub const PREVIEW: ThumbSpec = ThumbSpec {
    key: "PREVIEW",
    width: 120,
    height: 160,
};

/// Aspect-preserving renditions for still images, largest first.
///
/// The order matters: the working image is shrunk through this cascade,
/// each size produced from the previous one.
pub const IMAGE_SCALED: [ThumbSpec; 5] = [XL, L, B, M, S];

/// Reduced rendition set for frames extracted from videos.
pub const VIDEO_SCALED: [ThumbSpec; 2] = [XL, M];

/// Derive the thumbnail directory for a source file.
///
/// For input `D/F.ext` this is `D/@eaDir/F.ext/`, unique per source file
/// and the sole location the pipeline writes for it. Returns `None` for
/// paths without a final file-name component.
pub fn thumb_dir(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    Some(parent.join(EA_DIR).join(name))
}

/// File name of the idempotency marker (the XL rendition).
pub fn marker_name() -> String {
    XL.file_name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_are_deterministic() {
        assert_eq!(XL.file_name(), "SYNOPHOTO_THUMB_XL.jpg");
        assert_eq!(PREVIEW.file_name(), "SYNOPHOTO_THUMB_PREVIEW.jpg");
        assert_eq!(marker_name(), "SYNOPHOTO_THUMB_XL.jpg");
    }

    #[test]
    fn test_no_output_name_collisions() {
        let mut names: HashSet<String> =
            IMAGE_SCALED.iter().map(|s| s.file_name()).collect();
        names.insert(PREVIEW.file_name());
        names.insert(FILM_NAME.to_string());
        // 5 scaled + preview + proxy
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_cascade_sizes_descend() {
        for pair in IMAGE_SCALED.windows(2) {
            assert!(pair[0].width > pair[1].width);
            assert!(pair[0].height > pair[1].height);
        }
    }

    #[test]
    fn test_thumb_dir_derivation() {
        let dir = thumb_dir(Path::new("/photos/2019/IMG_0001.JPG")).unwrap();
        assert_eq!(dir, Path::new("/photos/2019/@eaDir/IMG_0001.JPG"));
    }

    #[test]
    fn test_thumb_dir_requires_file_name() {
        assert!(thumb_dir(Path::new("/")).is_none());
    }
}
