//! Two-column label manifests (`<identifier> <category>` per line).

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::errors::SamplerError;
use crate::types::{CategoryName, SampleId};

/// Immutable mapping from sample identifier to category name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelManifest {
    entries: HashMap<SampleId, CategoryName>,
}

impl LabelManifest {
    /// Read and parse a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SamplerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let manifest = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            entries = manifest.len(),
            "loaded label manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest text. Every line must hold exactly two fields.
    pub fn parse(text: &str) -> Result<Self, SamplerError> {
        let mut entries = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let (Some(id), Some(category), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(SamplerError::ManifestFormat {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            if let Some(previous) = entries.insert(id.to_string(), category.to_string())
                && previous != category
            {
                warn!(
                    id,
                    previous = %previous,
                    category,
                    "duplicate manifest identifier; keeping the later entry"
                );
            }
        }
        Ok(Self { entries })
    }

    /// Category name for `id`, if labeled.
    pub fn get(&self, id: &str) -> Option<&CategoryName> {
        self.entries.get(id)
    }

    /// True when `id` has an entry.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of labeled identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the manifest labels nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(identifier, category)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&SampleId, &CategoryName)> {
        self.entries.iter()
    }
}

impl FromStr for LabelManifest {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<K, V> FromIterator<(K, V)> for LabelManifest
where
    K: Into<SampleId>,
    V: Into<CategoryName>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, category)| (id.into(), category.into()))
                .collect(),
        }
    }
}
