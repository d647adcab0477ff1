use std::io;

use thiserror::Error;

use crate::types::{CategoryName, SampleId};

/// Error type for sampler configuration, manifest, dataset, and IO failures.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("label manifest line {line}: expected `<identifier> <category>`, got {content:?}")]
    ManifestFormat { line: usize, content: String },
    #[error("sample '{id}' is labeled with unknown category '{category}'")]
    UnknownCategory { id: SampleId, category: CategoryName },
    #[error("dataset error: {0}")]
    Dataset(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
