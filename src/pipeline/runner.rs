//! Pipeline runner: orchestrates stage execution.
//!
//! The [`Pipeline`] struct holds a statically-composed set of stages.
//! Calling [`Pipeline::run`] normalizes a batch of raw documents, filters the
//! resulting token lists and lemmatizes what is left, notifying a
//! [`PipelineObserver`] at each boundary.
//!
//! # Static dispatch
//!
//! `Pipeline` is generic over all stage types, so each combination is
//! monomorphized. Zero-sized stages such as [`LineNormalizer`] and
//! [`NoopFilter`] cost nothing at runtime.

use rayon::prelude::*;

use crate::error::Stage;
use crate::filter::frequency::FrequencyFilter;
use crate::nlp::lemmatizer::{AnyLemmatizer, IdentityLemmatizer, Lemmatizer};
use crate::nlp::stopwords::StopwordFilter;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReportBuilder,
};
use crate::pipeline::traits::{LineNormalizer, NoopFilter, Normalizer, TokenFilter};
use crate::types::{PipelineConfig, RawDocument};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($stage:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $stage.as_str()).entered();
    };
}

fn token_count(documents: &[Vec<String>]) -> usize {
    documents.iter().map(Vec::len).sum()
}

// ============================================================================
// Pipeline: statically-composed stage container
// ============================================================================

/// A pipeline composed of concrete stage implementations.
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `N` | [`Normalizer`] | [`LineNormalizer`] |
/// | `F` | [`TokenFilter`] | [`FrequencyFilter`] |
/// | `L` | [`Lemmatizer`] | [`AnyLemmatizer`] |
#[derive(Debug, Clone)]
pub struct Pipeline<N, F, L> {
    pub normalizer: N,
    pub filter: F,
    pub lemmatizer: L,
}

/// Pipeline whose filter and lemmatizer come from a [`PipelineConfig`]
pub type DefaultPipeline = Pipeline<LineNormalizer, FrequencyFilter, AnyLemmatizer>;

impl DefaultPipeline {
    /// Build the stages a configuration describes.
    ///
    /// Stopwords come from `cfg.stopwords`, the rare-word amount and
    /// tie-break from the filter settings, and the lemmatizer from
    /// `cfg.lemmatizer`.
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        let stopwords = StopwordFilter::from_source(&cfg.stopwords);
        Pipeline {
            normalizer: LineNormalizer,
            filter: FrequencyFilter::new(stopwords, cfg.uncommon()).with_tie_break(cfg.tie_break),
            lemmatizer: AnyLemmatizer::from_kind(cfg.lemmatizer),
        }
    }
}

impl Default for DefaultPipeline {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

// ============================================================================
// Pipeline::run: execute stages in order
// ============================================================================

impl<N, F, L> Pipeline<N, F, L>
where
    N: Normalizer,
    F: TokenFilter,
    L: Lemmatizer,
{
    /// Process a batch of documents into token lists, one per document.
    ///
    /// Stages run in order:
    /// 1. Normalize each document
    /// 2. Filter the batch (stopwords and rare words)
    /// 3. Lemmatize every surviving token
    ///
    /// Output order matches input order, also when `cfg.parallel` is set.
    pub fn run(
        &self,
        documents: &[RawDocument],
        cfg: &PipelineConfig,
        observer: &mut impl PipelineObserver,
    ) -> Vec<Vec<String>> {
        // Stage 1: Normalize
        trace_stage!(Stage::Normalize);
        observer.on_stage_start(Stage::Normalize);
        let clock = StageClock::start();
        let mut tokens: Vec<Vec<String>> = if cfg.parallel {
            documents
                .par_iter()
                .map(|doc| self.normalizer.normalize(doc, cfg))
                .collect()
        } else {
            documents
                .iter()
                .map(|doc| self.normalizer.normalize(doc, cfg))
                .collect()
        };
        let normalized = token_count(&tokens);
        let report = StageReportBuilder::new(clock.elapsed())
            .documents(documents.len())
            .tokens_out(normalized)
            .build();
        observer.on_stage_end(Stage::Normalize, &report);
        observer.on_tokens(Stage::Normalize, &tokens);

        // Stage 2: Filter
        trace_stage!(Stage::Filter);
        observer.on_stage_start(Stage::Filter);
        let clock = StageClock::start();
        self.filter.filter_batch(&mut tokens, cfg);
        let filtered = token_count(&tokens);
        let report = StageReportBuilder::new(clock.elapsed())
            .documents(tokens.len())
            .tokens_in(normalized)
            .tokens_out(filtered)
            .build();
        observer.on_stage_end(Stage::Filter, &report);
        observer.on_tokens(Stage::Filter, &tokens);

        // Stage 3: Lemmatize
        trace_stage!(Stage::Lemmatize);
        observer.on_stage_start(Stage::Lemmatize);
        let clock = StageClock::start();
        if cfg.parallel {
            tokens
                .par_iter_mut()
                .for_each(|doc| self.lemmatizer.lemmatize_tokens(doc));
        } else {
            for doc in tokens.iter_mut() {
                self.lemmatizer.lemmatize_tokens(doc);
            }
        }
        let report = StageReportBuilder::new(clock.elapsed())
            .documents(tokens.len())
            .tokens_in(filtered)
            .tokens_out(token_count(&tokens))
            .build();
        observer.on_stage_end(Stage::Lemmatize, &report);
        observer.on_tokens(Stage::Lemmatize, &tokens);

        tokens
    }

    /// Run a single in-memory text through every stage
    pub fn process_text(&self, text: &str, cfg: &PipelineConfig) -> Vec<String> {
        let document = RawDocument::from_text(text);
        self.run(std::slice::from_ref(&document), cfg, &mut NoopObserver)
            .pop()
            .unwrap_or_default()
    }
}

// ============================================================================
// PipelineBuilder: fluent construction with custom stages
// ============================================================================

/// Fluent builder for constructing a [`Pipeline`] with custom stages.
///
/// Starts from stages that only normalize, then lets each one be replaced.
///
/// ```
/// # use spam_corpus::pipeline::runner::PipelineBuilder;
/// # use spam_corpus::nlp::lemmatizer::SnowballLemmatizer;
/// let pipeline = PipelineBuilder::new()
///     .lemmatizer(SnowballLemmatizer::new())
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder<N = LineNormalizer, F = NoopFilter, L = IdentityLemmatizer> {
    normalizer: N,
    filter: F,
    lemmatizer: L,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        PipelineBuilder {
            normalizer: LineNormalizer,
            filter: NoopFilter,
            lemmatizer: IdentityLemmatizer,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, F, L> PipelineBuilder<N, F, L> {
    /// Override the normalizer stage.
    pub fn normalizer<M: Normalizer>(self, normalizer: M) -> PipelineBuilder<M, F, L> {
        PipelineBuilder {
            normalizer,
            filter: self.filter,
            lemmatizer: self.lemmatizer,
        }
    }

    /// Override the filter stage.
    pub fn filter<G: TokenFilter>(self, filter: G) -> PipelineBuilder<N, G, L> {
        PipelineBuilder {
            normalizer: self.normalizer,
            filter,
            lemmatizer: self.lemmatizer,
        }
    }

    /// Override the lemmatizer stage.
    pub fn lemmatizer<M: Lemmatizer>(self, lemmatizer: M) -> PipelineBuilder<N, F, M> {
        PipelineBuilder {
            normalizer: self.normalizer,
            filter: self.filter,
            lemmatizer,
        }
    }

    pub fn build(self) -> Pipeline<N, F, L> {
        Pipeline {
            normalizer: self.normalizer,
            filter: self.filter,
            lemmatizer: self.lemmatizer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::frequency::UncommonAmount;
    use crate::nlp::lemmatizer::DictionaryLemmatizer;
    use crate::pipeline::observer::StageTimingObserver;
    use crate::types::{LemmatizerKind, StopwordSource};

    fn docs(texts: &[&str]) -> Vec<RawDocument> {
        texts.iter().map(|t| RawDocument::from_text(*t)).collect()
    }

    #[test]
    fn test_builder_defaults_only_normalize() {
        let pipeline = PipelineBuilder::new().build();
        let out = pipeline.process_text("The Offers are FREE\n", &PipelineConfig::default());
        assert_eq!(out, vec!["the", "offers", "are", "free"]);
    }

    #[test]
    fn test_default_pipeline_removes_stopwords_and_lemmatizes() {
        let cfg = PipelineConfig::default()
            .with_uncommon_amount(0.0)
            .with_stopwords(StopwordSource::custom(["the", "and"]));
        let pipeline = DefaultPipeline::from_config(&cfg);

        let out = pipeline.process_text("Claim the prizes and the offers\n", &cfg);

        assert_eq!(out, vec!["claim", "prize", "offer"]);
    }

    #[test]
    fn test_run_preserves_document_order() {
        let cfg = PipelineConfig::default()
            .with_uncommon_amount(0.0)
            .with_stopwords(StopwordSource::none())
            .with_lemmatizer(LemmatizerKind::None);
        let pipeline = DefaultPipeline::from_config(&cfg);
        let batch = docs(&["alpha beta\n", "gamma\n", "", "delta epsilon\n"]);

        let sequential = pipeline.run(&batch, &cfg, &mut NoopObserver);
        let parallel = pipeline.run(&batch, &cfg.clone().with_parallel(true), &mut NoopObserver);

        assert_eq!(sequential.len(), 4);
        assert_eq!(sequential[0], vec!["alpha", "beta"]);
        assert!(sequential[2].is_empty());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let cfg = PipelineConfig::default();
        let pipeline = PipelineBuilder::new()
            .filter(FrequencyFilter::new(
                StopwordFilter::from_list(["the"]),
                UncommonAmount::Count(0),
            ))
            .build();
        let mut obs = StageTimingObserver::new();

        pipeline.run(&docs(&["the cat\n", "the dog\n"]), &cfg, &mut obs);

        let stages: Vec<Stage> = obs.reports().iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, vec![Stage::Normalize, Stage::Filter, Stage::Lemmatize]);
        let filter = obs.report(Stage::Filter).unwrap();
        assert_eq!(filter.documents(), Some(2));
        assert_eq!(filter.tokens_in(), Some(4));
        assert_eq!(filter.tokens_out(), Some(2));
    }

    #[test]
    fn test_custom_lemmatizer_stage() {
        let dict = DictionaryLemmatizer::from_pairs([("ran", "run")]);
        let pipeline = PipelineBuilder::new().lemmatizer(dict).build();

        let out = pipeline.process_text("He ran home\n", &PipelineConfig::default());

        assert_eq!(out, vec!["he", "run", "home"]);
    }

    #[test]
    fn test_process_empty_text() {
        let pipeline = DefaultPipeline::default();
        assert!(pipeline
            .process_text("", &PipelineConfig::default())
            .is_empty());
    }
}
