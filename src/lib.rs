#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Loader configuration and dataset profiles.
pub mod config;
/// Centralized constants used across samplers, partitioning, and sources.
pub mod constants;
/// Sample record and partition types.
pub mod data;
/// Reusable example runners shared by demos and downstream crates.
pub mod example_apps;
mod grouper;
mod hash;
/// Training, evaluation, and test batch plans.
pub mod loader;
/// Label manifest parsing.
pub mod manifest;
/// Batch composition helpers.
pub mod metrics;
/// Labeled/unlabeled partitioning.
pub mod partition;
mod rng;
/// Batch sampler implementations and the shared sampling trait.
pub mod sampler;
/// Sample source traits and built-in sources.
pub mod source;
/// Input transports used by sources.
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{DatasetProfile, LoaderConfig, dataset_profile};
pub use constants::labels::NO_LABEL;
pub use data::{Partition, SampleRecord};
pub use errors::SamplerError;
pub use loader::{LoaderPlan, TestPlan, TrainSampler};
pub use manifest::LabelManifest;
pub use partition::partition;
pub use sampler::{
    BatchIter, BatchSampler, LabeledBatchSampler, SequentialBatchSampler, TwoStreamBatchSampler,
    TwoStreamBatches,
};
pub use source::{ImageFolder, InMemorySource, SampleSource};
pub use types::{CategoryIndex, CategoryName, Position, PositionBatch, SampleId};
