use crate::data::SampleRecord;
use crate::types::Position;

/// Labeled/unlabeled makeup of one batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchComposition {
    /// Positions whose sample carries a real category.
    pub labeled: usize,
    /// Positions whose sample carries `NO_LABEL` (or fall outside `samples`).
    pub unlabeled: usize,
}

/// Count labeled and unlabeled samples among `batch`.
pub fn batch_composition(samples: &[SampleRecord], batch: &[Position]) -> BatchComposition {
    let labeled = batch
        .iter()
        .filter(|&&pos| samples.get(pos).is_some_and(SampleRecord::is_labeled))
        .count();
    BatchComposition {
        labeled,
        unlabeled: batch.len() - labeled,
    }
}
