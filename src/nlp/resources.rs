//! Process-wide language resources
//!
//! The English stopword list, the lemmatizer's noun vocabulary and its
//! irregular-form table are built once per process on the first call to [`ensure_resources`]. Every
//! later call returns the same bundle, so calling it eagerly at startup and
//! lazily from pipeline code are both fine.

use std::sync::OnceLock;

use rustc_hash::{FxHashMap, FxHashSet};
use stop_words::LANGUAGE;

use crate::nlp::stopwords::StopwordFilter;

static RESOURCES: OnceLock<LanguageResources> = OnceLock::new();

/// Base forms the noun lemmatizer may reduce plurals to
const ENGLISH_NOUNS: &str = include_str!("data/english_nouns.txt");

/// Irregular English noun plurals and words the suffix rules must not touch
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("selves", "self"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("calves", "calf"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("diagnoses", "diagnosis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("zombies", "zombie"),
    ("calories", "calorie"),
    ("rookies", "rookie"),
    ("hippies", "hippie"),
    ("ties", "tie"),
    ("pies", "pie"),
    ("lies", "lie"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("aches", "ache"),
    ("headaches", "headache"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("means", "means"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("whereas", "whereas"),
    ("thanks", "thanks"),
    ("unless", "unless"),
    ("yes", "yes"),
];

/// Resources shared by every pipeline in the process
#[derive(Debug)]
pub struct LanguageResources {
    stopwords: FxHashSet<String>,
    nouns: FxHashSet<String>,
    noun_exceptions: FxHashMap<&'static str, &'static str>,
}

impl LanguageResources {
    fn load() -> Self {
        let stopwords = StopwordFilter::load_stopwords(LANGUAGE::English);
        let nouns = ENGLISH_NOUNS
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        let noun_exceptions = NOUN_EXCEPTIONS.iter().copied().collect();
        Self {
            stopwords,
            nouns,
            noun_exceptions,
        }
    }

    /// English stopwords (lowercase)
    pub fn stopwords(&self) -> &FxHashSet<String> {
        &self.stopwords
    }

    /// English noun base forms (lowercase)
    pub fn nouns(&self) -> &FxHashSet<String> {
        &self.nouns
    }

    /// Lemma for an irregular noun form, if listed
    pub fn noun_exception(&self, word: &str) -> Option<&'static str> {
        self.noun_exceptions.get(word).copied()
    }

    pub fn noun_exception_count(&self) -> usize {
        self.noun_exceptions.len()
    }
}

/// Make sure the language resources are loaded and return them
pub fn ensure_resources() -> &'static LanguageResources {
    RESOURCES.get_or_init(|| {
        let resources = LanguageResources::load();
        tracing::debug!(
            stopwords = resources.stopwords.len(),
            nouns = resources.nouns.len(),
            noun_exceptions = resources.noun_exceptions.len(),
            "language resources loaded"
        );
        resources
    })
}

/// Whether [`ensure_resources`] has run in this process
pub fn is_initialized() -> bool {
    RESOURCES.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_resources_is_idempotent() {
        let first = ensure_resources();
        let second = ensure_resources();

        assert!(std::ptr::eq(first, second));
        assert!(is_initialized());
    }

    #[test]
    fn test_resources_contents() {
        let res = ensure_resources();

        assert!(res.stopwords().contains("the"));
        assert_eq!(res.noun_exception("children"), Some("child"));
        assert_eq!(res.noun_exception("news"), Some("news"));
        assert_eq!(res.noun_exception("cats"), None);
        assert_eq!(res.noun_exception_count(), NOUN_EXCEPTIONS.len());
        assert!(res.nouns().contains("offer"));
        assert!(!res.nouns().iter().any(|n| n.starts_with('#') || n.is_empty()));
    }
}
