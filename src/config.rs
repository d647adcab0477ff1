use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::datasets::{CIFAR10, CIFAR10_MEAN, CIFAR10_NUM_CLASSES, CIFAR10_STD};
use crate::errors::SamplerError;

/// Loader configuration for training and evaluation batches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Dataset profile name (see [`dataset_profile`]).
    pub dataset: String,
    /// Total positions per training batch.
    pub batch_size: usize,
    /// Labeled positions per training batch (the rest are unlabeled).
    pub labeled_batch_size: usize,
    /// Train on labeled samples only, ignoring the unlabeled stream.
    pub exclude_unlabeled: bool,
    /// Optional two-column label manifest; without it every sample is labeled.
    pub labels: Option<PathBuf>,
    /// Loader worker count for training; evaluation uses twice as many.
    pub workers: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            dataset: CIFAR10.to_string(),
            batch_size: 256,
            labeled_batch_size: 62,
            exclude_unlabeled: false,
            labels: None,
            workers: 4,
        }
    }
}

impl LoaderConfig {
    /// Check field ranges and cross-field constraints.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.batch_size == 0 {
            return Err(SamplerError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if self.labeled_batch_size > self.batch_size {
            return Err(SamplerError::Configuration(format!(
                "labeled_batch_size ({}) exceeds batch_size ({})",
                self.labeled_batch_size, self.batch_size
            )));
        }
        dataset_profile(&self.dataset)?;
        Ok(())
    }
}

/// Static facts about a supported dataset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DatasetProfile {
    /// Profile name used in [`LoaderConfig::dataset`].
    pub name: &'static str,
    /// Expected number of classes.
    pub num_classes: usize,
    /// Per-channel normalization mean.
    pub mean: [f32; 3],
    /// Per-channel normalization standard deviation.
    pub std: [f32; 3],
}

const PROFILES: &[DatasetProfile] = &[DatasetProfile {
    name: CIFAR10,
    num_classes: CIFAR10_NUM_CLASSES,
    mean: CIFAR10_MEAN,
    std: CIFAR10_STD,
}];

/// Look up a dataset profile by name.
pub fn dataset_profile(name: &str) -> Result<&'static DatasetProfile, SamplerError> {
    PROFILES
        .iter()
        .find(|profile| profile.name == name)
        .ok_or_else(|| {
            let known: Vec<&str> = PROFILES.iter().map(|profile| profile.name).collect();
            SamplerError::Configuration(format!(
                "unknown dataset '{name}' (known: {})",
                known.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        LoaderConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_batch_sizes() {
        let zero = LoaderConfig {
            batch_size: 0,
            labeled_batch_size: 0,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(SamplerError::Configuration(_))
        ));
        let oversized = LoaderConfig {
            batch_size: 32,
            labeled_batch_size: 40,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            oversized.validate(),
            Err(SamplerError::Configuration(_))
        ));
    }

    #[test]
    fn round_trips_through_json() {
        let config = LoaderConfig {
            exclude_unlabeled: true,
            labels: Some(PathBuf::from("labels/00.txt")),
            ..LoaderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LoaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        let config = LoaderConfig {
            dataset: "imagenet".to_string(),
            ..LoaderConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("imagenet"));
        assert_eq!(dataset_profile(CIFAR10).unwrap().num_classes, 10);
    }
}
