//! Core data types and pipeline configuration
//!
//! Documents move through the pipeline as plain `String` tokens: a
//! [`RawDocument`] is tokenized into a `Vec<String>`, filtered and lemmatized
//! in place, labeled as a [`LabeledDocument`], and finally counted into a
//! [`FeatureVector`].

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::filter::frequency::{FrequencyScope, TieBreak, UncommonAmount};

/// Binary class assignment for a training example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Legitimate mail (0)
    Ham,
    /// Unsolicited mail (1)
    Spam,
}

impl Label {
    /// Numeric class value (spam = 1, ham = 0)
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    /// Build a label from its numeric class value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Label::Ham),
            1 => Some(Label::Spam),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text of one file (or one line of a file) before tokenization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Where the text came from
    pub path: PathBuf,
    /// Decoded text with invalid UTF-8 sequences dropped
    pub text: String,
}

impl RawDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// A document with no file of origin (in-memory text)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(PathBuf::new(), text)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A processed token sequence paired with its class label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledDocument {
    /// Tokens in reading order
    pub tokens: Vec<String>,
    pub label: Label,
}

impl LabeledDocument {
    pub fn new(tokens: Vec<String>, label: Label) -> Self {
        Self { tokens, label }
    }

    pub fn spam(tokens: Vec<String>) -> Self {
        Self::new(tokens, Label::Spam)
    }

    pub fn ham(tokens: Vec<String>) -> Self {
        Self::new(tokens, Label::Ham)
    }
}

/// Per-document word counts paired with the document label
///
/// This is the unit consumed by a downstream bag-of-words classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Token -> number of occurrences in the document
    pub counts: FxHashMap<String, u32>,
    pub label: Label,
}

impl FeatureVector {
    /// Occurrences of `token` (0 when absent)
    pub fn count(&self, token: &str) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (document length in tokens)
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }
}

/// Where the stopword set comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwordSource {
    /// Built-in list to start from (`None` starts from an empty set)
    pub language: Option<String>,
    /// Extra stopwords added on top of the built-in list
    pub extra: Vec<String>,
}

impl Default for StopwordSource {
    fn default() -> Self {
        Self {
            language: Some("en".to_string()),
            extra: Vec::new(),
        }
    }
}

impl StopwordSource {
    /// No stopwords at all
    pub fn none() -> Self {
        Self {
            language: None,
            extra: Vec::new(),
        }
    }

    /// Only the given words
    pub fn custom<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: None,
            extra: words.into_iter().map(Into::into).collect(),
        }
    }
}

/// Which lemmatizer the pipeline applies after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LemmatizerKind {
    /// Tokens pass through unchanged
    None,
    /// Rule-based English noun lemmatizer
    #[default]
    Morphy,
    /// Snowball English stemmer
    Snowball,
}

impl LemmatizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Morphy => "morphy",
            Self::Snowball => "snowball",
        }
    }
}

/// Configuration for one corpus-preparation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute count (>= 1) or fraction (< 1) of rare tokens to drop
    pub uncommon_amount: f64,
    /// Whether rarity is measured per document or across the batch
    pub frequency_scope: FrequencyScope,
    /// Ordering among tokens with equal counts
    pub tie_break: TieBreak,
    pub stopwords: StopwordSource,
    pub lemmatizer: LemmatizerKind,
    /// Shuffle the accumulated examples after each load
    pub shuffle: bool,
    /// Seed for the shuffle; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Process directory entries sorted by file name
    pub sort_entries: bool,
    /// Run per-document stages on the rayon thread pool
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            uncommon_amount: 0.1,
            frequency_scope: FrequencyScope::PerDocument,
            tie_break: TieBreak::FirstOccurrence,
            stopwords: StopwordSource::default(),
            lemmatizer: LemmatizerKind::Morphy,
            shuffle: true,
            seed: None,
            sort_entries: true,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rare-token removal amount
    pub fn with_uncommon_amount(mut self, amount: f64) -> Self {
        self.uncommon_amount = amount;
        self
    }

    pub fn with_frequency_scope(mut self, scope: FrequencyScope) -> Self {
        self.frequency_scope = scope;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_stopwords(mut self, stopwords: StopwordSource) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn with_lemmatizer(mut self, lemmatizer: LemmatizerKind) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    /// Enable or disable shuffling of accumulated examples
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Shuffle deterministically with the given seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The rare-token amount interpreted as a count or a fraction
    pub fn uncommon(&self) -> UncommonAmount {
        UncommonAmount::from_f64(self.uncommon_amount)
    }
}
