//! Bag-of-words feature extraction
//!
//! Each labeled token sequence becomes a word-count mapping with the same
//! label. Token order is discarded at this point.

use rustc_hash::FxHashMap;

use crate::types::{FeatureVector, Label, LabeledDocument};

/// Count the occurrences of each distinct token
pub fn count_tokens<S: AsRef<str>>(tokens: &[S]) -> FxHashMap<String, u32> {
    let mut counts: FxHashMap<String, u32> =
        FxHashMap::with_capacity_and_hasher(tokens.len(), Default::default());
    for token in tokens {
        let token = token.as_ref();
        match counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                counts.insert(token.to_string(), 1);
            }
        }
    }
    counts
}

/// Feature vector for a single token sequence
pub fn document_features<S: AsRef<str>>(tokens: &[S], label: Label) -> FeatureVector {
    FeatureVector {
        counts: count_tokens(tokens),
        label,
    }
}

/// Turn labeled documents into labeled word counts, one per input
pub fn extract_features(examples: &[LabeledDocument]) -> Vec<FeatureVector> {
    examples
        .iter()
        .map(|doc| document_features(&doc.tokens, doc.label))
        .collect()
}

/// Append-only store of feature vectors owned by one session
#[derive(Debug, Clone, Default)]
pub struct FeatureAccumulator {
    features: Vec<FeatureVector>,
}

impl FeatureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract features from `examples` and append them
    ///
    /// Returns the number of vectors appended.
    pub fn extend_from(&mut self, examples: &[LabeledDocument]) -> usize {
        let before = self.features.len();
        self.features.extend(extract_features(examples));
        self.features.len() - before
    }

    pub fn push(&mut self, features: FeatureVector) {
        self.features.push(features);
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of accumulated vectors with the given label
    pub fn count_label(&self, label: Label) -> usize {
        self.features.iter().filter(|f| f.label == label).count()
    }

    pub fn into_inner(self) -> Vec<FeatureVector> {
        self.features
    }
}
