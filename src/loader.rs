//! Training, evaluation, and test batch plans.
//!
//! A plan resolves a [`LoaderConfig`] against a dataset directory
//! (`<data_dir>/train`, `<data_dir>/val`, or a named test set) and returns
//! the sample lists together with the sampler that batches them. Turning
//! positions into tensors is left to the caller's loader.

use std::path::Path;

use tracing::{info, warn};

use crate::config::{DatasetProfile, LoaderConfig, dataset_profile};
use crate::constants::loader::{EVAL_BATCH_SIZE, EVAL_DIR, EVAL_WORKER_MULTIPLIER, TRAIN_DIR};
use crate::data::{Partition, SampleRecord};
use crate::errors::SamplerError;
use crate::manifest::LabelManifest;
use crate::partition::partition;
use crate::sampler::{
    BatchIter, BatchSampler, LabeledBatchSampler, SequentialBatchSampler, TwoStreamBatchSampler,
};
use crate::source::{ImageFolder, SampleSource};

/// Training sampler chosen by [`LoaderConfig::exclude_unlabeled`].
#[derive(Clone, Debug)]
pub enum TrainSampler {
    /// Mixed labeled/unlabeled batches.
    TwoStream(TwoStreamBatchSampler),
    /// Labeled-only batches.
    LabeledOnly(LabeledBatchSampler),
}

impl BatchSampler for TrainSampler {
    fn len(&self) -> usize {
        match self {
            Self::TwoStream(sampler) => sampler.len(),
            Self::LabeledOnly(sampler) => sampler.len(),
        }
    }

    fn batch_size(&self) -> usize {
        match self {
            Self::TwoStream(sampler) => sampler.batch_size(),
            Self::LabeledOnly(sampler) => sampler.batch_size(),
        }
    }

    fn batches(&mut self) -> BatchIter<'_> {
        match self {
            Self::TwoStream(sampler) => sampler.batches(),
            Self::LabeledOnly(sampler) => sampler.batches(),
        }
    }
}

/// Everything needed to drive one training run.
#[derive(Debug)]
pub struct LoaderPlan {
    /// Validated configuration the plan was built from.
    pub config: LoaderConfig,
    /// Dataset profile selected by `config.dataset`.
    pub profile: &'static DatasetProfile,
    /// Relabeled training samples and their position streams.
    pub train: Partition,
    /// Sampler over `train` positions.
    pub train_sampler: TrainSampler,
    /// Evaluation samples, in folder order.
    pub eval_samples: Vec<SampleRecord>,
    /// Sequential sampler over `eval_samples`.
    pub eval_sampler: SequentialBatchSampler,
    /// Worker count for the training loader.
    pub train_workers: usize,
    /// Worker count for the evaluation loader.
    pub eval_workers: usize,
}

impl LoaderPlan {
    /// Discover `<data_dir>/train` and `<data_dir>/val`, load the labels
    /// file if configured, and build the samplers.
    pub fn build(
        config: LoaderConfig,
        data_dir: impl AsRef<Path>,
        seed: u64,
    ) -> Result<Self, SamplerError> {
        config.validate()?;
        let data_dir = data_dir.as_ref();
        let train = ImageFolder::discover(data_dir.join(TRAIN_DIR))?;
        let eval = ImageFolder::discover(data_dir.join(EVAL_DIR))?;
        let manifest = config
            .labels
            .as_ref()
            .map(LabelManifest::load)
            .transpose()?;
        Self::from_sources(config, &train, &eval, manifest.as_ref(), seed)
    }

    /// Build a plan from already discovered sources.
    ///
    /// Without a manifest every training sample keeps its source category
    /// and counts as labeled.
    pub fn from_sources(
        config: LoaderConfig,
        train: &dyn SampleSource,
        eval: &dyn SampleSource,
        manifest: Option<&LabelManifest>,
        seed: u64,
    ) -> Result<Self, SamplerError> {
        config.validate()?;
        let profile = dataset_profile(&config.dataset)?;
        if train.classes().len() != profile.num_classes {
            warn!(
                dataset = profile.name,
                expected = profile.num_classes,
                found = train.classes().len(),
                "training class count differs from dataset profile"
            );
        }

        let train_partition = match manifest {
            Some(manifest) => {
                partition(train.samples().to_vec(), manifest, &train.category_map())?
            }
            None => Partition::fully_labeled(train.samples().to_vec()),
        };

        let train_sampler = if config.exclude_unlabeled {
            TrainSampler::LabeledOnly(
                LabeledBatchSampler::new(&train_partition.labeled_positions, config.batch_size)?
                    .with_seed(seed),
            )
        } else {
            TrainSampler::TwoStream(
                TwoStreamBatchSampler::new(
                    &train_partition.unlabeled_positions,
                    &train_partition.labeled_positions,
                    config.batch_size,
                    config.labeled_batch_size,
                )?
                .with_seed(seed),
            )
        };
        let eval_sampler = SequentialBatchSampler::new(eval.len(), EVAL_BATCH_SIZE)?;

        let plan = Self {
            profile,
            train: train_partition,
            train_sampler,
            eval_samples: eval.samples().to_vec(),
            eval_sampler,
            train_workers: config.workers,
            eval_workers: eval_workers(config.workers),
            config,
        };
        info!(
            dataset = plan.profile.name,
            train_samples = plan.train.len(),
            labeled = plan.train.labeled_positions.len(),
            unlabeled = plan.train.unlabeled_positions.len(),
            train_batches = plan.train_sampler.len(),
            eval_samples = plan.eval_samples.len(),
            eval_batches = plan.eval_sampler.len(),
            "built loader plan"
        );
        Ok(plan)
    }
}

fn eval_workers(train_workers: usize) -> usize {
    train_workers.saturating_mul(EVAL_WORKER_MULTIPLIER)
}

/// Sequential batches over a held-out test set.
#[derive(Debug)]
pub struct TestPlan {
    /// Test samples, in folder order.
    pub samples: Vec<SampleRecord>,
    /// Sequential sampler using the training batch size.
    pub sampler: SequentialBatchSampler,
    /// Worker count for the test loader.
    pub workers: usize,
}

impl TestPlan {
    /// Discover `<data_dir>/<test_set>` and batch it in folder order.
    pub fn build(
        config: &LoaderConfig,
        data_dir: impl AsRef<Path>,
        test_set: &str,
    ) -> Result<Self, SamplerError> {
        let folder = ImageFolder::discover(data_dir.as_ref().join(test_set))?;
        Self::from_source(config, &folder)
    }

    /// Build a test plan from an already discovered source.
    pub fn from_source(
        config: &LoaderConfig,
        source: &dyn SampleSource,
    ) -> Result<Self, SamplerError> {
        config.validate()?;
        let sampler = SequentialBatchSampler::new(source.len(), config.batch_size)?;
        Ok(Self {
            samples: source.samples().to_vec(),
            sampler,
            workers: eval_workers(config.workers),
        })
    }
}
