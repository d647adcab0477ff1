use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::constants::labels::NO_LABEL;
use crate::data::{Partition, SampleRecord};
use crate::errors::SamplerError;
use crate::manifest::LabelManifest;
use crate::types::{CategoryIndex, CategoryName};

/// Relabel `samples` from `manifest` and split their positions.
///
/// Samples listed in the manifest take the manifest's category (translated
/// through `categories`) and become labeled; all others are set to
/// `NO_LABEL`. Manifest entries for unknown identifiers are ignored. A
/// manifest category missing from `categories` fails immediately.
pub fn partition(
    mut samples: Vec<SampleRecord>,
    manifest: &LabelManifest,
    categories: &HashMap<CategoryName, CategoryIndex>,
) -> Result<Partition, SamplerError> {
    let mut labeled_positions = Vec::with_capacity(manifest.len().min(samples.len()));
    let mut unlabeled_positions = Vec::with_capacity(samples.len());
    let mut matched: HashSet<&str> = HashSet::new();

    for (position, sample) in samples.iter_mut().enumerate() {
        match manifest.get(&sample.id) {
            Some(name) => {
                let Some(category) = categories.get(name) else {
                    return Err(SamplerError::UnknownCategory {
                        id: sample.id.clone(),
                        category: name.clone(),
                    });
                };
                sample.category = *category;
                labeled_positions.push(position);
                matched.insert(name.as_str());
            }
            None => {
                sample.category = NO_LABEL;
                unlabeled_positions.push(position);
            }
        }
    }

    let labeled_ids = labeled_positions
        .iter()
        .map(|&position| samples[position].id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unmatched = manifest.len().saturating_sub(labeled_ids);
    if unmatched > 0 {
        debug!(unmatched, "manifest entries with no matching sample were ignored");
    }
    info!(
        samples = samples.len(),
        labeled = labeled_positions.len(),
        unlabeled = unlabeled_positions.len(),
        categories = matched.len(),
        "partitioned samples"
    );

    Ok(Partition {
        samples,
        labeled_positions,
        unlabeled_positions,
    })
}
