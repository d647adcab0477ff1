//! Sample sources.
//!
//! A source yields the ordered sample list plus the category table that
//! label names are translated through. Positions into `samples()` are the
//! currency of every batch sampler, so a source must keep them stable.

use std::collections::HashMap;

use crate::data::SampleRecord;
use crate::types::{CategoryIndex, CategoryName};

/// Image folder discovery.
pub mod image_folder;

pub use image_folder::ImageFolder;

/// Ordered, randomly indexable collection of samples.
pub trait SampleSource {
    /// Samples in stable positional order.
    ///
    /// Ids should be unique: a label manifest entry applies to every sample
    /// carrying its id.
    fn samples(&self) -> &[SampleRecord];
    /// Category names in index order.
    fn classes(&self) -> &[CategoryName];

    /// Name to index lookup derived from `classes()`.
    fn category_map(&self) -> HashMap<CategoryName, CategoryIndex> {
        self.classes()
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx as CategoryIndex))
            .collect()
    }

    /// Number of samples.
    fn len(&self) -> usize {
        self.samples().len()
    }

    /// True when the source holds no samples.
    fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }
}

/// Source backed by an in-memory sample list.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    samples: Vec<SampleRecord>,
    classes: Vec<CategoryName>,
}

impl InMemorySource {
    /// Create a source from samples and their class names (index order).
    pub fn new<I, S>(samples: Vec<SampleRecord>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategoryName>,
    {
        Self {
            samples,
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl SampleSource for InMemorySource {
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

    #[test]
    fn category_map_follows_class_order() {
        let source = InMemorySource::new(Vec::new(), ["cat", "dog"]);
        let map = source.category_map();
        assert_eq!(map.get("cat"), Some(&0));
        assert_eq!(map.get("dog"), Some(&1));
        assert!(source.is_empty());
    }
}
