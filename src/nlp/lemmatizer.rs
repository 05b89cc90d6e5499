//! Token lemmatization
//!
//! Lemmatizers work on one token at a time with no surrounding context.
//! Tokens a lemmatizer knows nothing about come back unchanged.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use rust_stemmers::{Algorithm, Stemmer};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{CorpusError, Result, Stage};
use crate::nlp::resources::{self, LanguageResources};
use crate::types::LemmatizerKind;

/// Maps a token to its base form
pub trait Lemmatizer: Send + Sync {
    /// Lemma of a single token, borrowed when unchanged
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str>;

    /// Replace every token with its lemma in place
    fn lemmatize_tokens(&self, tokens: &mut [String]) {
        for token in tokens.iter_mut() {
            let lemma = match self.lemmatize(token) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(lemma) => lemma,
            };
            *token = lemma;
        }
    }
}

/// Returns every token unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    #[inline]
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(token)
    }
}

/// Suffix rules for English nouns, applied to the end of a word
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Rule-based English noun lemmatizer
///
/// Irregular forms are looked up first. The detachment rules then only
/// produce words present in the noun vocabulary, and the shortest match
/// wins. A token no rule maps into the vocabulary comes back unchanged.
/// The vocabulary defaults to the built-in English noun list.
#[derive(Debug, Clone)]
pub struct MorphyLemmatizer {
    resources: &'static LanguageResources,
    vocabulary: Cow<'static, FxHashSet<String>>,
    min_length: usize,
}

impl Default for MorphyLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphyLemmatizer {
    pub fn new() -> Self {
        let resources = resources::ensure_resources();
        Self {
            resources,
            vocabulary: Cow::Borrowed(resources.nouns()),
            min_length: 4,
        }
    }

    /// Only accept lemmas present in `vocabulary`, replacing the built-in list
    pub fn with_vocabulary<I, S>(mut self, vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = Cow::Owned(vocabulary.into_iter().map(Into::into).collect());
        self
    }

    /// Accept these lemmas on top of the current vocabulary
    pub fn with_extra_nouns<I, S>(mut self, nouns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary
            .to_mut()
            .extend(nouns.into_iter().map(Into::into));
        self
    }

    /// Words shorter than this (in chars) are left alone
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn detach<'a>(&self, token: &'a str) -> Cow<'a, str> {
        let mut best: Option<String> = None;
        for &(suffix, replacement) in NOUN_RULES {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.is_empty() {
                    continue;
                }
                let candidate = format!("{stem}{replacement}");
                if self.vocabulary.contains(&candidate)
                    && best.as_ref().map_or(true, |b| candidate.len() < b.len())
                {
                    best = Some(candidate);
                }
            }
        }
        match best {
            Some(lemma) if !self.vocabulary.contains(token) || lemma.len() < token.len() => {
                Cow::Owned(lemma)
            }
            _ => Cow::Borrowed(token),
        }
    }
}

impl Lemmatizer for MorphyLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if let Some(lemma) = self.resources.noun_exception(token) {
            return if lemma == token {
                Cow::Borrowed(token)
            } else {
                Cow::Owned(lemma.to_string())
            };
        }
        if token.chars().count() < self.min_length || !token.chars().all(char::is_alphabetic) {
            return Cow::Borrowed(token);
        }
        self.detach(token)
    }
}

/// Lemmatizer backed by an explicit form -> lemma table
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    lemmas: FxHashMap<String, String>,
}

impl DictionaryLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(form, lemma)` pairs
    pub fn from_pairs<I, F, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: AsRef<str>,
        L: Into<String>,
    {
        let lemmas = pairs
            .into_iter()
            .map(|(form, lemma)| (form.as_ref().to_lowercase(), lemma.into()))
            .collect();
        Self { lemmas }
    }

    /// Parse a lemma list where each line reads `lemma -> form, form, ...`
    ///
    /// Anything after a `/` in the lemma column is ignored, as are blank
    /// lines, `#` comments and lines without an arrow.
    pub fn parse(text: &str) -> Self {
        let mut dict = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lemma, forms)) = line.split_once("->") else {
                continue;
            };
            let lemma = lemma.split('/').next().unwrap_or("").trim();
            if lemma.is_empty() {
                continue;
            }
            for form in forms.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                dict.insert(form, lemma);
            }
        }
        dict
    }

    /// Load a lemma list from disk (see [`DictionaryLemmatizer::parse`])
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| CorpusError::io(Stage::Lemmatize, path, e))?;
        let dict = Self::parse(&text);
        tracing::debug!(path = %path.display(), forms = dict.len(), "lemma dictionary loaded");
        Ok(dict)
    }

    pub fn insert(&mut self, form: &str, lemma: &str) {
        self.lemmas.insert(form.to_lowercase(), lemma.to_string());
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self.lemmas.get(token) {
            Some(lemma) if lemma != token => Cow::Owned(lemma.clone()),
            _ => Cow::Borrowed(token),
        }
    }
}

/// Snowball English stemmer used in place of a lemmatizer
pub struct SnowballLemmatizer {
    stemmer: Stemmer,
}

impl Default for SnowballLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SnowballLemmatizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl fmt::Debug for SnowballLemmatizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballLemmatizer")
            .field("algorithm", &"english")
            .finish()
    }
}

impl Lemmatizer for SnowballLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self.stemmer.stem(token) {
            Cow::Owned(stem) if stem != token => Cow::Owned(stem),
            _ => Cow::Borrowed(token),
        }
    }
}

/// Lemmatizer chosen at runtime from configuration
#[derive(Debug)]
pub enum AnyLemmatizer {
    Identity(IdentityLemmatizer),
    Morphy(MorphyLemmatizer),
    Dictionary(DictionaryLemmatizer),
    Snowball(SnowballLemmatizer),
}

impl AnyLemmatizer {
    pub fn from_kind(kind: LemmatizerKind) -> Self {
        match kind {
            LemmatizerKind::None => Self::Identity(IdentityLemmatizer),
            LemmatizerKind::Morphy => Self::Morphy(MorphyLemmatizer::new()),
            LemmatizerKind::Snowball => Self::Snowball(SnowballLemmatizer::new()),
        }
    }
}

impl Default for AnyLemmatizer {
    fn default() -> Self {
        Self::from_kind(LemmatizerKind::default())
    }
}

impl From<DictionaryLemmatizer> for AnyLemmatizer {
    fn from(dict: DictionaryLemmatizer) -> Self {
        Self::Dictionary(dict)
    }
}

impl Lemmatizer for AnyLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self {
            Self::Identity(l) => l.lemmatize(token),
            Self::Morphy(l) => l.lemmatize(token),
            Self::Dictionary(l) => l.lemmatize(token),
            Self::Snowball(l) => l.lemmatize(token),
        }
    }
}
