use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::source::IMAGE_EXTENSIONS;
use crate::errors::SamplerError;

/// Filesystem transport that lists class directories and image files under a root.
pub struct FileStream {
    root: PathBuf,
    follow_links: bool,
}

impl FileStream {
    /// Create a stream rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Root this stream walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Immediate subdirectories of the root, sorted by name.
    pub fn class_dirs(&self) -> Result<Vec<PathBuf>, SamplerError> {
        if !self.root.is_dir() {
            return Err(SamplerError::Dataset(format!(
                "dataset root {} is not a directory",
                self.root.display()
            )));
        }
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let is_dir = if self.follow_links {
                path.is_dir()
            } else {
                entry.file_type()?.is_dir()
            };
            if is_dir {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Image files anywhere below `dir`, sorted by path.
    pub fn image_files(&self, dir: &Path) -> Result<Vec<PathBuf>, SamplerError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(self.follow_links) {
            let entry = entry.map_err(|err| SamplerError::Dataset(err.to_string()))?;
            if entry.file_type().is_file() && is_image_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// True if the path has a known image extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_image_extensions() {
        assert!(is_image_file(Path::new("a/b.PNG")));
        assert!(is_image_file(Path::new("a/b.jpeg")));
        assert!(!is_image_file(Path::new("a/b.txt")));
        assert!(!is_image_file(Path::new("a/b")));
    }

    #[test]
    fn lists_sorted_class_dirs_and_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dog/nested")).unwrap();
        fs::create_dir_all(dir.path().join("cat")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("dog/b.png"), "x").unwrap();
        fs::write(dir.path().join("dog/nested/a.png"), "x").unwrap();
        fs::write(dir.path().join("dog/readme.md"), "x").unwrap();

        let stream = FileStream::new(dir.path());
        let classes = stream.class_dirs().unwrap();
        assert_eq!(
            classes,
            vec![dir.path().join("cat"), dir.path().join("dog")]
        );
        let images = stream.image_files(&classes[1]).unwrap();
        assert_eq!(
            images,
            vec![
                dir.path().join("dog/b.png"),
                dir.path().join("dog/nested/a.png")
            ]
        );
    }

    #[test]
    fn missing_root_is_a_dataset_error() {
        let stream = FileStream::new("/definitely/not/here");
        assert!(matches!(stream.class_dirs(), Err(SamplerError::Dataset(_))));
    }
}
