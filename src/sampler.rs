use rand::seq::SliceRandom;
use tracing::debug;

use crate::constants::sampler::{
    DEFAULT_SEED, LABELED_ONLY_STREAM, LABELED_STREAM, UNLABELED_STREAM,
};
use crate::errors::SamplerError;
use crate::grouper::Grouper;
use crate::hash::stream_seed;
use crate::rng::DeterministicRng;
use crate::types::{Position, PositionBatch};

/// Boxed batch iterator returned by [`BatchSampler::batches`].
pub type BatchIter<'a> = Box<dyn Iterator<Item = PositionBatch> + 'a>;

/// Public batching interface shared by the training and evaluation samplers.
pub trait BatchSampler {
    /// Number of batches produced by one pass.
    fn len(&self) -> usize;
    /// True when a pass produces no batches.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Nominal number of positions per batch.
    fn batch_size(&self) -> usize;
    /// Start a fresh pass. Every call reshuffles.
    fn batches(&mut self) -> BatchIter<'_>;
}

/// Mixes a fixed share of labeled positions into every batch of unlabeled ones.
///
/// One pass yields `unlabeled.len() / unlabeled_batch_size` batches. The
/// labeled stream is recycled (and reshuffled) as often as needed to keep up.
/// Each batch lists its `labeled_batch_size` labeled positions first, then
/// the unlabeled ones.
#[derive(Clone, Debug)]
pub struct TwoStreamBatchSampler {
    unlabeled: Vec<Position>,
    labeled: Vec<Position>,
    batch_size: usize,
    labeled_batch_size: usize,
    seed: u64,
    pass: u64,
}

impl TwoStreamBatchSampler {
    /// Create a sampler over copies of the two position streams.
    pub fn new(
        unlabeled: &[Position],
        labeled: &[Position],
        batch_size: usize,
        labeled_batch_size: usize,
    ) -> Result<Self, SamplerError> {
        if batch_size == 0 {
            return Err(SamplerError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if labeled_batch_size > batch_size {
            return Err(SamplerError::Configuration(format!(
                "labeled_batch_size ({labeled_batch_size}) exceeds batch_size ({batch_size})"
            )));
        }
        let unlabeled_batch_size = batch_size - labeled_batch_size;
        if unlabeled_batch_size == 0 {
            return Err(SamplerError::Configuration(
                "labeled_batch_size equals batch_size; no room for unlabeled samples \
                 (sample labeled data alone instead)"
                    .to_string(),
            ));
        }
        if unlabeled.is_empty() {
            return Err(SamplerError::Configuration(
                "unlabeled stream is empty".to_string(),
            ));
        }
        if labeled_batch_size > 0 && labeled.is_empty() {
            return Err(SamplerError::Configuration(format!(
                "labeled stream is empty but labeled_batch_size is {labeled_batch_size}"
            )));
        }
        if labeled_batch_size > labeled.len() {
            return Err(SamplerError::Configuration(format!(
                "labeled_batch_size ({labeled_batch_size}) exceeds the {} labeled samples",
                labeled.len()
            )));
        }
        Ok(Self {
            unlabeled: unlabeled.to_vec(),
            labeled: labeled.to_vec(),
            batch_size,
            labeled_batch_size,
            seed: DEFAULT_SEED,
            pass: 0,
        })
    }

    /// Override the RNG seed. Resets the pass counter.
    ///
    /// A fixed seed replays the same passes on a given toolchain. Pass seeds
    /// go through std's `DefaultHasher`, whose output may change between
    /// Rust releases.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.pass = 0;
        self
    }

    /// Labeled positions per batch.
    pub fn labeled_batch_size(&self) -> usize {
        self.labeled_batch_size
    }

    /// Unlabeled positions per batch.
    pub fn unlabeled_batch_size(&self) -> usize {
        self.batch_size - self.labeled_batch_size
    }

    /// Number of passes started so far.
    pub fn passes(&self) -> u64 {
        self.pass
    }

    /// Start a fresh pass with newly shuffled streams.
    pub fn iter(&mut self) -> TwoStreamBatches<'_> {
        let pass = self.pass;
        self.pass += 1;
        let remaining = self.len();
        debug!(
            pass,
            batches = remaining,
            labeled = self.labeled.len(),
            unlabeled = self.unlabeled.len(),
            "starting two-stream pass"
        );
        TwoStreamBatches {
            labeled: Grouper::new(
                LABELED_STREAM,
                &self.labeled,
                self.labeled_batch_size,
                stream_seed(self.seed, pass, LABELED_STREAM),
            ),
            unlabeled: Grouper::new(
                UNLABELED_STREAM,
                &self.unlabeled,
                self.unlabeled_batch_size(),
                stream_seed(self.seed, pass, UNLABELED_STREAM),
            ),
            remaining,
        }
    }
}

impl BatchSampler for TwoStreamBatchSampler {
    fn len(&self) -> usize {
        self.unlabeled.len() / self.unlabeled_batch_size()
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn batches(&mut self) -> BatchIter<'_> {
        Box::new(self.iter())
    }
}

/// One pass over a [`TwoStreamBatchSampler`].
pub struct TwoStreamBatches<'a> {
    labeled: Grouper<'a>,
    unlabeled: Grouper<'a>,
    remaining: usize,
}

impl TwoStreamBatches<'_> {
    /// Permutations redrawn so far as `(labeled, unlabeled)`.
    pub fn reshuffles(&self) -> (u64, u64) {
        (self.labeled.reshuffles(), self.unlabeled.reshuffles())
    }
}

impl Iterator for TwoStreamBatches<'_> {
    type Item = PositionBatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let mut batch = self.labeled.next_group()?;
        batch.extend(self.unlabeled.next_group()?);
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TwoStreamBatches<'_> {}

/// Shuffled batches drawn from labeled positions only, dropping the last
/// partial batch.
#[derive(Clone, Debug)]
pub struct LabeledBatchSampler {
    labeled: Vec<Position>,
    batch_size: usize,
    seed: u64,
    pass: u64,
}

impl LabeledBatchSampler {
    /// Create a sampler over a copy of the labeled positions.
    pub fn new(labeled: &[Position], batch_size: usize) -> Result<Self, SamplerError> {
        if batch_size == 0 {
            return Err(SamplerError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if labeled.is_empty() {
            return Err(SamplerError::Configuration(
                "labeled stream is empty".to_string(),
            ));
        }
        Ok(Self {
            labeled: labeled.to_vec(),
            batch_size,
            seed: DEFAULT_SEED,
            pass: 0,
        })
    }

    /// Override the RNG seed. Resets the pass counter.
    ///
    /// A fixed seed replays the same passes on a given toolchain. Pass seeds
    /// go through std's `DefaultHasher`, whose output may change between
    /// Rust releases.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.pass = 0;
        self
    }
}

impl BatchSampler for LabeledBatchSampler {
    fn len(&self) -> usize {
        self.labeled.len() / self.batch_size
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn batches(&mut self) -> BatchIter<'_> {
        let pass = self.pass;
        self.pass += 1;
        let mut rng = DeterministicRng::new(stream_seed(self.seed, pass, LABELED_ONLY_STREAM));
        let mut order = self.labeled.clone();
        order.shuffle(&mut rng);
        debug!(pass, batches = self.len(), "starting labeled-only pass");
        let full = self.len() * self.batch_size;
        order.truncate(full);
        let batch_size = self.batch_size;
        Box::new(
            (0..full)
                .step_by(batch_size)
                .map(move |start| order[start..start + batch_size].to_vec()),
        )
    }
}

/// Unshuffled batches over `0..len`, keeping the trailing partial batch.
#[derive(Clone, Debug)]
pub struct SequentialBatchSampler {
    total: usize,
    batch_size: usize,
}

impl SequentialBatchSampler {
    /// Create a sampler over `total` positions.
    pub fn new(total: usize, batch_size: usize) -> Result<Self, SamplerError> {
        if batch_size == 0 {
            return Err(SamplerError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { total, batch_size })
    }
}

impl BatchSampler for SequentialBatchSampler {
    fn len(&self) -> usize {
        self.total.div_ceil(self.batch_size)
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn batches(&mut self) -> BatchIter<'_> {
        let total = self.total;
        let batch_size = self.batch_size;
        Box::new(
            (0..total)
                .step_by(batch_size)
                .map(move |start| (start..(start + batch_size).min(total)).collect()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn scenario() -> TwoStreamBatchSampler {
        let unlabeled: Vec<Position> = (0..100).collect();
        let labeled: Vec<Position> = (100..110).collect();
        TwoStreamBatchSampler::new(&unlabeled, &labeled, 32, 2)
            .unwrap()
            .with_seed(7)
    }

    #[test]
    fn scenario_batches_split_labeled_first() {
        let mut sampler = scenario();
        assert_eq!(sampler.unlabeled_batch_size(), 30);
        assert_eq!(sampler.len(), 3);
        let batches: Vec<PositionBatch> = sampler.iter().collect();
        assert_eq!(batches.len(), 3);
        let mut seen_unlabeled = HashSet::new();
        for batch in &batches {
            assert_eq!(batch.len(), 32);
            assert!(batch[..2].iter().all(|pos| (100..110).contains(pos)));
            assert!(batch[2..].iter().all(|pos| *pos < 100));
            for pos in &batch[2..] {
                assert!(seen_unlabeled.insert(*pos), "unlabeled repeat within a pass");
            }
        }
        // 6 labeled draws fit in one 10-element permutation.
        let labeled: Vec<Position> = batches.iter().flat_map(|b| b[..2].to_vec()).collect();
        let distinct: HashSet<&Position> = labeled.iter().collect();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn labeled_stream_is_recycled_within_a_pass() {
        let unlabeled: Vec<Position> = (0..40).collect();
        let labeled: Vec<Position> = (40..45).collect();
        let mut sampler = TwoStreamBatchSampler::new(&unlabeled, &labeled, 6, 2).unwrap();
        assert_eq!(sampler.len(), 10);
        let mut pass = sampler.iter();
        let mut count = 0;
        for batch in pass.by_ref() {
            assert_eq!(batch.len(), 6);
            count += 1;
        }
        assert_eq!(count, 10);
        // 5 labeled positions serve 2 groups per permutation: 10 groups need 5 draws.
        assert_eq!(pass.reshuffles(), (4, 0));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let unlabeled: Vec<Position> = (0..10).collect();
        let labeled: Vec<Position> = (10..12).collect();
        let cases = [
            TwoStreamBatchSampler::new(&unlabeled, &labeled, 0, 0),
            TwoStreamBatchSampler::new(&unlabeled, &labeled, 4, 5),
            TwoStreamBatchSampler::new(&unlabeled, &labeled, 4, 4),
            TwoStreamBatchSampler::new(&[], &labeled, 4, 1),
            TwoStreamBatchSampler::new(&unlabeled, &[], 4, 1),
            TwoStreamBatchSampler::new(&unlabeled, &labeled, 6, 3),
        ];
        for case in cases {
            assert!(matches!(case, Err(SamplerError::Configuration(_))));
        }
    }

    #[test]
    fn zero_labeled_share_accepts_empty_labeled_stream() {
        let unlabeled: Vec<Position> = (0..9).collect();
        let mut sampler = TwoStreamBatchSampler::new(&unlabeled, &[], 4, 0).unwrap();
        let batches: Vec<PositionBatch> = sampler.iter().collect();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|batch| batch.len() == 4));
    }

    #[test]
    fn passes_reuse_the_sampler_with_fresh_shuffles() {
        let mut sampler = scenario();
        let first: Vec<PositionBatch> = sampler.iter().collect();
        let second: Vec<PositionBatch> = sampler.iter().collect();
        assert_eq!(sampler.passes(), 2);
        assert_eq!(second.len(), first.len());
        assert_ne!(first, second);
    }

    #[test]
    fn iterator_reports_exact_length() {
        let mut sampler = scenario();
        let mut pass = sampler.iter();
        assert_eq!(pass.len(), 3);
        pass.next();
        assert_eq!(pass.len(), 2);
    }

    #[test]
    fn labeled_only_sampler_drops_last_partial_batch() {
        let labeled: Vec<Position> = (0..10).collect();
        let mut sampler = LabeledBatchSampler::new(&labeled, 4).unwrap().with_seed(1);
        assert_eq!(sampler.len(), 2);
        let batches: Vec<PositionBatch> = sampler.batches().collect();
        assert_eq!(batches.len(), 2);
        let mut seen = HashSet::new();
        for batch in batches {
            assert_eq!(batch.len(), 4);
            for pos in batch {
                assert!(seen.insert(pos));
            }
        }
    }

    #[test]
    fn labeled_only_sampler_rejects_empty_stream() {
        assert!(matches!(
            LabeledBatchSampler::new(&[], 4),
            Err(SamplerError::Configuration(_))
        ));
    }

    #[test]
    fn sequential_sampler_keeps_tail() {
        let mut sampler = SequentialBatchSampler::new(7, 3).unwrap();
        assert_eq!(sampler.len(), 3);
        let batches: Vec<PositionBatch> = sampler.batches().collect();
        assert_eq!(batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    }

    #[test]
    fn sequential_sampler_handles_empty_input() {
        let mut sampler = SequentialBatchSampler::new(0, 3).unwrap();
        assert!(sampler.is_empty());
        assert_eq!(sampler.batches().count(), 0);
    }
}
