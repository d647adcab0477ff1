use crate::types::{CategoryIndex, StreamName};

/// Constants used by label partitioning.
pub mod labels {
    use super::CategoryIndex;

    /// Category assigned to samples that have no ground-truth label.
    ///
    /// Distinct from every valid category index so downstream losses can
    /// mask these samples out.
    pub const NO_LABEL: CategoryIndex = -1;
}

/// Constants used by batch samplers.
pub mod sampler {
    use super::StreamName;

    /// Default RNG seed when callers do not provide one.
    pub const DEFAULT_SEED: u64 = 42;
    /// Offset mixed into pass seed derivation so consecutive passes diverge.
    pub const PASS_SEED_OFFSET: u64 = 0xB4C3_5EED;
    /// Stream tag for the labeled grouper.
    pub const LABELED_STREAM: StreamName = "labeled";
    /// Stream tag for the unlabeled grouper.
    pub const UNLABELED_STREAM: StreamName = "unlabeled";
    /// Stream tag for the labeled-only sampler.
    pub const LABELED_ONLY_STREAM: StreamName = "labeled_only";
}

/// Constants used when building loader plans.
pub mod loader {
    /// Subdirectory holding training images.
    pub const TRAIN_DIR: &str = "train";
    /// Subdirectory holding validation images.
    pub const EVAL_DIR: &str = "val";
    /// Fixed batch size for evaluation passes.
    pub const EVAL_BATCH_SIZE: usize = 32;
    /// Evaluation loaders need images twice as fast as training loaders.
    pub const EVAL_WORKER_MULTIPLIER: usize = 2;
}

/// Constants used by image folder discovery.
pub mod source {
    /// File extensions (lowercase) recognised as images.
    pub const IMAGE_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "png", "ppm", "bmp", "pgm", "tif", "tiff", "webp",
    ];
}

/// Constants describing known dataset profiles.
pub mod datasets {
    /// Name of the CIFAR-10 profile.
    pub const CIFAR10: &str = "cifar10";
    /// CIFAR-10 class count.
    pub const CIFAR10_NUM_CLASSES: usize = 10;
    /// CIFAR-10 per-channel mean.
    pub const CIFAR10_MEAN: [f32; 3] = [0.4914, 0.4822, 0.4465];
    /// CIFAR-10 per-channel standard deviation.
    pub const CIFAR10_STD: [f32; 3] = [0.2470, 0.2435, 0.2616];
}
