use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::constants::sampler::PASS_SEED_OFFSET;
use crate::types::StreamName;

pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// Seed for one stream during one pass over a sampler.
///
/// Stable within one build; `DefaultHasher` is not guaranteed stable across
/// Rust releases.
pub fn stream_seed(seed: u64, pass: u64, stream: StreamName) -> u64 {
    stable_hash_with(|hasher| {
        seed.hash(hasher);
        pass.wrapping_add(PASS_SEED_OFFSET).hash(hasher);
        stream.hash(hasher);
    })
}
