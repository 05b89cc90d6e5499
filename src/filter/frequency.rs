//! Rare-token and stopword filtering
//!
//! A [`FrequencyTable`] is built fresh for every filtering call. The `k`
//! rarest distinct tokens are marked uncommon and every occurrence of them is
//! removed, together with every stopword occurrence.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::nlp::stopwords::StopwordFilter;

/// How many rare tokens to remove
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UncommonAmount {
    /// Remove this many distinct tokens
    Count(usize),
    /// Remove `floor(fraction * corpus_len)` distinct tokens
    Fraction(f64),
}

impl Default for UncommonAmount {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl UncommonAmount {
    /// Interpret a raw amount: `>= 1` is a count, `(0, 1)` a fraction
    ///
    /// Zero, negative and NaN amounts remove nothing. Fractional counts
    /// are floored.
    pub fn from_f64(amount: f64) -> Self {
        if amount.is_nan() || amount <= 0.0 {
            Self::Count(0)
        } else if amount >= 1.0 {
            // saturating float -> int conversion
            Self::Count(amount.floor() as usize)
        } else {
            Self::Fraction(amount)
        }
    }

    /// Number of distinct tokens to remove from a corpus of `corpus_len` tokens
    pub fn resolve(&self, corpus_len: usize) -> usize {
        match *self {
            Self::Count(k) => k,
            Self::Fraction(f) => (f * corpus_len as f64).floor() as usize,
        }
    }
}

/// Ordering among tokens that occur equally often
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The token seen first counts as rarer
    #[default]
    FirstOccurrence,
    /// The token whose first appearance comes latest counts as rarer
    LatestFirstSeen,
    /// The lexicographically smallest token counts as rarer
    Alphabetical,
}

/// Which tokens a frequency table is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyScope {
    /// One table per document
    #[default]
    PerDocument,
    /// One table over every document of the batch
    Corpus,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: usize,
    first_seen: usize,
}

/// Occurrence counts of the distinct tokens of a corpus
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable<'a> {
    entries: FxHashMap<&'a str, Entry>,
    total: usize,
}

impl<'a> FrequencyTable<'a> {
    /// Count the tokens of `tokens`
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: FxHashMap<&'a str, Entry> = FxHashMap::default();
        let mut total = 0;
        for token in tokens {
            let first_seen = entries.len();
            entries
                .entry(token)
                .or_insert(Entry {
                    count: 0,
                    first_seen,
                })
                .count += 1;
            total += 1;
        }
        Self { entries, total }
    }

    pub fn count(&self, token: &str) -> usize {
        self.entries.get(token).map_or(0, |e| e.count)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tokens counted, duplicates included
    pub fn total(&self) -> usize {
        self.total
    }

    /// Distinct tokens ordered rarest first
    pub fn ranked(&self, tie_break: TieBreak) -> Vec<(&'a str, usize)> {
        let mut ranked: Vec<(&'a str, Entry)> =
            self.entries.iter().map(|(&t, &e)| (t, e)).collect();
        ranked.sort_by(|a, b| {
            a.1.count
                .cmp(&b.1.count)
                .then_with(|| Self::tie(a, b, tie_break))
        });
        ranked.into_iter().map(|(t, e)| (t, e.count)).collect()
    }

    /// The `k` rarest distinct tokens (all of them when `k >= len`)
    pub fn rarest(&self, k: usize, tie_break: TieBreak) -> Vec<&'a str> {
        if k == 0 {
            return Vec::new();
        }
        let mut ranked = self.ranked(tie_break);
        ranked.truncate(k);
        ranked.into_iter().map(|(t, _)| t).collect()
    }

    fn tie(a: &(&str, Entry), b: &(&str, Entry), tie_break: TieBreak) -> Ordering {
        match tie_break {
            TieBreak::FirstOccurrence => a.1.first_seen.cmp(&b.1.first_seen),
            TieBreak::LatestFirstSeen => b.1.first_seen.cmp(&a.1.first_seen),
            TieBreak::Alphabetical => a.0.cmp(b.0),
        }
    }
}

/// Removes stopwords and the rarest tokens from token sequences
#[derive(Debug, Clone, Default)]
pub struct FrequencyFilter {
    stopwords: StopwordFilter,
    uncommon: UncommonAmount,
    tie_break: TieBreak,
}

impl FrequencyFilter {
    pub fn new(stopwords: StopwordFilter, uncommon: UncommonAmount) -> Self {
        Self {
            stopwords,
            uncommon,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    pub fn uncommon(&self) -> UncommonAmount {
        self.uncommon
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Tokens of `corpus` ranked among the rarest
    pub fn uncommon_tokens<'a>(&self, corpus: &'a [String]) -> FxHashSet<&'a str> {
        let table = FrequencyTable::from_tokens(corpus.iter().map(String::as_str));
        let k = self.uncommon.resolve(corpus.len());
        table.rarest(k, self.tie_break).into_iter().collect()
    }

    /// Filtered copy of `corpus`
    pub fn filter(&self, corpus: &[String]) -> Vec<String> {
        let uncommon = self.uncommon_tokens(corpus);
        corpus
            .iter()
            .filter(|t| self.keep(t, &uncommon))
            .cloned()
            .collect()
    }

    /// Filter one token sequence in place
    pub fn filter_in_place(&self, tokens: &mut Vec<String>) {
        let uncommon = self.owned_uncommon(tokens);
        tokens.retain(|t| self.keep(t, &uncommon));
    }

    /// Filter several documents in place
    ///
    /// With [`FrequencyScope::Corpus`] the rarity ranking is computed once over
    /// the concatenation of all documents.
    pub fn filter_documents(&self, documents: &mut [Vec<String>], scope: FrequencyScope) {
        match scope {
            FrequencyScope::PerDocument => {
                for tokens in documents.iter_mut() {
                    let uncommon = self.owned_uncommon(tokens);
                    tokens.retain(|t| self.keep(t, &uncommon));
                }
            }
            FrequencyScope::Corpus => {
                let uncommon = self.corpus_uncommon(documents);
                for tokens in documents.iter_mut() {
                    tokens.retain(|t| self.keep(t, &uncommon));
                }
            }
        }
    }

    /// Rare tokens across all `documents` together
    pub fn corpus_uncommon(&self, documents: &[Vec<String>]) -> FxHashSet<String> {
        let table =
            FrequencyTable::from_tokens(documents.iter().flatten().map(String::as_str));
        let k = self.uncommon.resolve(table.total());
        table
            .rarest(k, self.tie_break)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn owned_uncommon(&self, tokens: &[String]) -> FxHashSet<String> {
        self.uncommon_tokens(tokens)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[inline]
    pub(crate) fn keep<S: std::borrow::Borrow<str> + Eq + std::hash::Hash>(
        &self,
        token: &str,
        uncommon: &FxHashSet<S>,
    ) -> bool {
        !self.stopwords.is_stopword(token) && !uncommon.contains(token)
    }
}

/// Remove stopwords and the rarest tokens from a flat corpus
///
/// `uncommon_amount` is a count of distinct tokens when `>= 1`, otherwise a
/// fraction of the corpus length. Ties are broken by first occurrence.
/// Tokens are tested against `stopwords` exactly, case included.
pub fn filter(
    corpus: &[String],
    stopwords: &FxHashSet<String>,
    uncommon_amount: f64,
) -> Vec<String> {
    let filter = FrequencyFilter::new(
        StopwordFilter::from_set(stopwords.clone()),
        UncommonAmount::from_f64(uncommon_amount),
    );
    filter.filter(corpus)
}
