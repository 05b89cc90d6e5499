//! Stage trait definitions for the pipeline.
//!
//! Each trait is one processing stage boundary. The runner is generic over
//! them, so stage combinations are statically dispatched. Lemmatization uses
//! [`Lemmatizer`](crate::nlp::lemmatizer::Lemmatizer) directly as its stage
//! trait.

use rayon::prelude::*;

use crate::filter::frequency::FrequencyFilter;
use crate::nlp::tokenizer::tokenize_document;
use crate::types::{PipelineConfig, RawDocument};

// ============================================================================
// Normalizer: raw text to tokens (stage 1)
// ============================================================================

/// Turns a raw document into a token sequence.
///
/// # Contract
///
/// - Every token returned is lowercase and matches the tokenizer's word shape.
/// - Never fails; undecodable input was already dropped by the loader.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, document: &RawDocument, cfg: &PipelineConfig) -> Vec<String>;
}

/// Line-by-line normalizer built on [`normalize_line`](crate::nlp::tokenizer::normalize_line).
#[derive(Debug, Clone, Copy, Default)]
pub struct LineNormalizer;

impl Normalizer for LineNormalizer {
    fn normalize(&self, document: &RawDocument, _cfg: &PipelineConfig) -> Vec<String> {
        tokenize_document(&document.text)
    }
}

// ============================================================================
// TokenFilter: drop tokens (stage 2)
// ============================================================================

/// Removes tokens from a batch of token sequences in place.
///
/// # Contract
///
/// - Only removes tokens; never reorders or rewrites them.
/// - An empty batch or empty sequences are left as they are.
pub trait TokenFilter: Send + Sync {
    fn filter_batch(&self, documents: &mut [Vec<String>], cfg: &PipelineConfig);
}

/// Keeps every token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFilter;

impl TokenFilter for NoopFilter {
    #[inline]
    fn filter_batch(&self, _documents: &mut [Vec<String>], _cfg: &PipelineConfig) {}
}

impl TokenFilter for FrequencyFilter {
    fn filter_batch(&self, documents: &mut [Vec<String>], cfg: &PipelineConfig) {
        use crate::filter::frequency::FrequencyScope;

        match cfg.frequency_scope {
            FrequencyScope::PerDocument if cfg.parallel => {
                documents
                    .par_iter_mut()
                    .for_each(|tokens| self.filter_in_place(tokens));
            }
            scope => self.filter_documents(documents, scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::frequency::{FrequencyScope, UncommonAmount};
    use crate::nlp::stopwords::StopwordFilter;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_line_normalizer() {
        let doc = RawDocument::from_text("Subject: Cheap MEDS\n\nBuy now!\n");
        let tokens = LineNormalizer.normalize(&doc, &PipelineConfig::default());
        assert_eq!(tokens, vec!["subject", "cheap", "meds", "buy", "now"]);
    }

    #[test]
    fn test_noop_filter_keeps_everything() {
        let mut docs = vec![toks(&["the", "a"]), toks(&[])];
        let before = docs.clone();

        NoopFilter.filter_batch(&mut docs, &PipelineConfig::default());

        assert_eq!(docs, before);
    }

    #[test]
    fn test_frequency_filter_parallel_matches_sequential() {
        let filter = FrequencyFilter::new(StopwordFilter::from_list(["the"]), UncommonAmount::Count(1));
        let docs = vec![
            toks(&["the", "cash", "cash", "prize"]),
            toks(&["meeting", "meeting", "notes", "the"]),
            toks(&[]),
        ];

        let mut sequential = docs.clone();
        filter.filter_batch(&mut sequential, &PipelineConfig::default());

        let mut parallel = docs;
        filter.filter_batch(&mut parallel, &PipelineConfig::default().with_parallel(true));

        assert_eq!(sequential, parallel);
        // "the" is both the rarest token and a stopword, so "prize" survives
        assert_eq!(sequential[0], toks(&["cash", "cash", "prize"]));
    }

    #[test]
    fn test_frequency_filter_uses_configured_scope() {
        let filter = FrequencyFilter::new(StopwordFilter::empty(), UncommonAmount::Count(1));
        let mut docs = vec![toks(&["a", "a", "b"]), toks(&["b", "c"])];

        let cfg = PipelineConfig::default().with_frequency_scope(FrequencyScope::Corpus);
        filter.filter_batch(&mut docs, &cfg);

        assert_eq!(docs, vec![toks(&["a", "a", "b"]), toks(&["b"])]);
    }

    #[test]
    fn test_filter_as_trait_object() {
        let filter: Box<dyn TokenFilter> = Box::new(NoopFilter);
        let mut docs = vec![toks(&["x"])];
        filter.filter_batch(&mut docs, &PipelineConfig::default());
        assert_eq!(docs.len(), 1);
    }
}
