use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::data::SampleRecord;
use crate::errors::SamplerError;
use crate::source::SampleSource;
use crate::transport::fs::FileStream;
use crate::types::{CategoryIndex, CategoryName};

/// Dataset laid out as `root/<class>/**/<image>`.
///
/// Classes are the sorted subdirectory names of `root`; samples are ordered
/// by class, then by path. A sample's id is its file name, which is what
/// label manifests refer to. File names shared across class directories
/// are logged with `warn!`, since one manifest line relabels all of them.
#[derive(Clone, Debug)]
pub struct ImageFolder {
    root: PathBuf,
    classes: Vec<CategoryName>,
    samples: Vec<SampleRecord>,
}

impl ImageFolder {
    /// Walk `root` and collect every image below its class directories.
    pub fn discover(root: impl Into<PathBuf>) -> Result<Self, SamplerError> {
        Self::discover_with(FileStream::new(root))
    }

    /// Like [`ImageFolder::discover`], with an explicitly configured stream.
    pub fn discover_with(stream: FileStream) -> Result<Self, SamplerError> {
        let class_dirs = stream.class_dirs()?;
        if class_dirs.is_empty() {
            return Err(SamplerError::Dataset(format!(
                "no class directories under {}",
                stream.root().display()
            )));
        }
        let mut classes = Vec::with_capacity(class_dirs.len());
        let mut samples = Vec::new();
        for (idx, dir) in class_dirs.iter().enumerate() {
            let name = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    SamplerError::Dataset(format!("unnamed class directory {}", dir.display()))
                })?;
            for path in stream.image_files(dir)? {
                let Some(id) = path.file_name().map(|id| id.to_string_lossy().into_owned())
                else {
                    continue;
                };
                samples.push(SampleRecord::new(id, path, idx as CategoryIndex));
            }
            classes.push(name);
        }
        let duplicates = duplicate_ids(&samples);
        if !duplicates.is_empty() {
            warn!(
                root = %stream.root().display(),
                count = duplicates.len(),
                first = duplicates[0],
                "sample ids are not unique; manifest entries will label every match"
            );
        }
        debug!(
            root = %stream.root().display(),
            classes = classes.len(),
            samples = samples.len(),
            "discovered image folder"
        );
        Ok(Self {
            root: stream.root().to_path_buf(),
            classes,
            samples,
        })
    }

    /// Directory this dataset was discovered from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hand over the sample list, e.g. for partitioning.
    pub fn into_samples(self) -> Vec<SampleRecord> {
        self.samples
    }
}

/// Ids that occur more than once, in first-repeat order.
fn duplicate_ids(samples: &[SampleRecord]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(samples.len());
    let mut reported = HashSet::new();
    samples
        .iter()
        .map(|sample| sample.id.as_str())
        .filter(|id| !seen.insert(*id) && reported.insert(*id))
        .collect()
}

impl SampleSource for ImageFolder {
    fn samples(&self) -> &[SampleRecord] {
        &self.samples
    }

    fn classes(&self) -> &[CategoryName] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_classes_and_samples_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for (class, file) in [("dog", "d1.png"), ("cat", "c2.jpg"), ("cat", "c1.png")] {
            fs::create_dir_all(dir.path().join(class)).unwrap();
            fs::write(dir.path().join(class).join(file), b"img").unwrap();
        }
        let folder = ImageFolder::discover(dir.path()).unwrap();
        assert_eq!(folder.classes(), ["cat".to_string(), "dog".to_string()]);
        let ids: Vec<&str> = folder.samples().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c1.png", "c2.jpg", "d1.png"]);
        let categories: Vec<CategoryIndex> =
            folder.samples().iter().map(|s| s.category).collect();
        assert_eq!(categories, vec![0, 0, 1]);
        assert_eq!(folder.category_map().get("dog"), Some(&1));
    }

    #[test]
    fn shared_file_names_across_classes_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        for (class, file) in [("cat", "0001.png"), ("dog", "0001.png"), ("dog", "0002.png")] {
            fs::create_dir_all(dir.path().join(class)).unwrap();
            fs::write(dir.path().join(class).join(file), b"img").unwrap();
        }
        let folder = ImageFolder::discover(dir.path()).unwrap();
        assert_eq!(folder.len(), 3);
        assert_eq!(duplicate_ids(folder.samples()), vec!["0001.png"]);
    }

    #[test]
    fn unique_file_names_have_no_duplicates() {
        let samples = vec![
            SampleRecord::new("a.png", "cat/a.png", 0),
            SampleRecord::new("b.png", "dog/b.png", 1),
        ];
        assert!(duplicate_ids(&samples).is_empty());
    }

    #[test]
    fn empty_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageFolder::discover(dir.path()),
            Err(SamplerError::Dataset(_))
        ));
    }

    #[test]
    fn empty_class_still_gets_an_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a_empty")).unwrap();
        fs::create_dir_all(dir.path().join("b_full")).unwrap();
        fs::write(dir.path().join("b_full/x.png"), b"img").unwrap();
        let folder = ImageFolder::discover(dir.path()).unwrap();
        assert_eq!(folder.classes().len(), 2);
        assert_eq!(folder.samples()[0].category, 1);
    }
}
