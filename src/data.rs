use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::labels::NO_LABEL;

pub use crate::types::{CategoryIndex, CategoryName, Position, SampleId};

/// One entry of the ordered sample list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Identifier matched against the label manifest.
    pub id: SampleId,
    /// Location of the underlying image.
    pub path: PathBuf,
    /// Class index, or `NO_LABEL` for unlabeled samples.
    pub category: CategoryIndex,
}

impl SampleRecord {
    /// Build a record with an explicit category.
    pub fn new(id: impl Into<SampleId>, path: impl Into<PathBuf>, category: CategoryIndex) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            category,
        }
    }

    /// True unless the category is the `NO_LABEL` sentinel.
    pub fn is_labeled(&self) -> bool {
        self.category != NO_LABEL
    }
}

/// Samples split into labeled and unlabeled position streams.
#[derive(Clone, Debug)]
pub struct Partition {
    /// Records with categories rewritten from the manifest.
    pub samples: Vec<SampleRecord>,
    /// Ascending positions whose samples carry a label.
    pub labeled_positions: Vec<Position>,
    /// Ascending positions whose samples are `NO_LABEL`.
    pub unlabeled_positions: Vec<Position>,
}

impl Partition {
    /// Treat every sample as labeled with its current category.
    pub fn fully_labeled(samples: Vec<SampleRecord>) -> Self {
        let labeled_positions = (0..samples.len()).collect();
        Self {
            samples,
            labeled_positions,
            unlabeled_positions: Vec::new(),
        }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
