//! Stopword sets
//!
//! Built-in lists come from the `stop-words` crate. A filter can also start
//! empty, which is the well-defined fallback when no stopwords are configured.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::nlp::resources;
use crate::types::StopwordSource;

/// A set of tokens that never reach the feature extractor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordFilter {
    /// Lowercase stopwords
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Stopwords for the given language
    ///
    /// English is served from the process-wide resource cache.
    pub fn new(language: &str) -> Self {
        let stopwords = match Self::language(language) {
            LANGUAGE::English => resources::ensure_resources().stopwords().clone(),
            lang => Self::load_stopwords(lang),
        };
        Self { stopwords }
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a stopword filter from a custom list
    pub fn from_list<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        Self { stopwords }
    }

    /// Use `stopwords` exactly as given, without case folding
    pub fn from_set(stopwords: FxHashSet<String>) -> Self {
        Self { stopwords }
    }

    /// Build the filter a [`StopwordSource`] describes
    pub fn from_source(source: &StopwordSource) -> Self {
        let mut filter = match source.language.as_deref() {
            Some(language) => Self::new(language),
            None => Self::empty(),
        };
        filter.add_stopwords(&source.extra);
        filter
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.remove(&word.as_ref().to_lowercase());
        }
    }

    /// Check if a token is a stopword
    ///
    /// Tokens are expected to be lowercase already.
    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// The underlying set
    pub fn as_set(&self) -> &FxHashSet<String> {
        &self.stopwords
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    /// Whether `language` names a built-in list
    pub fn is_known_language(language: &str) -> bool {
        Self::parse_language(language).is_some()
    }

    /// Resolve a language name, falling back to English for unknown names
    fn language(language: &str) -> LANGUAGE {
        Self::parse_language(language).unwrap_or(LANGUAGE::English)
    }

    fn parse_language(language: &str) -> Option<LANGUAGE> {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "hu" | "hungarian" => LANGUAGE::Hungarian,
            "tr" | "turkish" => LANGUAGE::Turkish,
            "pl" | "polish" => LANGUAGE::Polish,
            "ar" | "arabic" => LANGUAGE::Arabic,
            _ => return None,
        };
        Some(lang)
    }

    pub(crate) fn load_stopwords(lang: LANGUAGE) -> FxHashSet<String> {
        get(lang).iter().map(|s| s.to_lowercase()).collect()
    }
}
