//! Media discovery: recursive traversal feeding the conversion queue.
//!
//! Anything under an `@eaDir` segment is pipeline output and is pruned;
//! a small set of filesystem-metadata names is excluded by name.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::specs;

/// Discovers media files in a library directory.
pub struct FileDiscovery {
    extensions: Vec<String>,
    exclude_names: Vec<String>,
}

impl FileDiscovery {
    /// Build a discoverer recognizing the configured image and video
    /// extension sets.
    pub fn new(config: &ProcessingConfig) -> Self {
        let mut extensions = config.image_extensions.clone();
        extensions.extend(config.video_extensions.iter().cloned());
        Self {
            extensions,
            exclude_names: config.exclude_names.clone(),
        }
    }

    /// Recursively find all supported media files under `root`.
    ///
    /// Results are sorted by path for deterministic runs.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.file_name() != specs::EA_DIR)
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| !self.is_excluded(e.path()))
            .filter(|e| self.is_supported(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        files
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// Check if a file name is on the metadata exclusion list.
    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.exclude_names.iter().any(|e| e == name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.jpg"));
        touch(&root.join("a.MP4"));
        touch(&root.join("nested/deep/c.cr2"));
        touch(&root.join("notes.txt"));
        touch(&root.join("Thumbs.db"));
        touch(&root.join(".DS_Store"));
        // Existing pipeline output must never be rediscovered
        touch(&root.join("@eaDir/b.jpg/SYNOPHOTO_THUMB_XL.jpg"));
        touch(&root.join("nested/@eaDir/x.jpg/SYNOPHOTO_THUMB_XL.jpg"));

        let discovery = FileDiscovery::new(&Config::default().processing);
        let found = discovery.discover(root);

        assert_eq!(
            found,
            vec![
                root.join("a.MP4"),
                root.join("b.jpg"),
                root.join("nested/deep/c.cr2"),
            ]
        );
    }

    #[test]
    fn test_is_supported_is_case_insensitive() {
        let discovery = FileDiscovery::new(&Config::default().processing);
        assert!(discovery.is_supported(Path::new("x.JPG")));
        assert!(discovery.is_supported(Path::new("x.Mov")));
        assert!(!discovery.is_supported(Path::new("x.gif")));
        assert!(!discovery.is_supported(Path::new("noext")));
    }
}
