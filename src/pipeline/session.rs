//! Labeled corpus assembly.
//!
//! A [`CorpusSession`] loads a spam directory and a ham directory, runs
//! every document through the pipeline, and accumulates labeled examples
//! and their feature vectors across calls.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::corpus::loader::{load_directory_with, LoaderConfig};
use crate::error::Result;
use crate::features::FeatureAccumulator;
use crate::nlp::lemmatizer::AnyLemmatizer;
use crate::pipeline::observer::TracingObserver;
use crate::pipeline::runner::DefaultPipeline;
use crate::pipeline::spec::PipelineSpec;
use crate::types::{FeatureVector, Label, LabeledDocument, PipelineConfig};

/// Accumulates labeled examples and features for one training corpus
#[derive(Debug)]
pub struct CorpusSession {
    config: PipelineConfig,
    pipeline: DefaultPipeline,
    examples: Vec<LabeledDocument>,
    features: FeatureAccumulator,
    rng: StdRng,
}

impl CorpusSession {
    pub fn new(config: PipelineConfig) -> Self {
        let pipeline = DefaultPipeline::from_config(&config);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            pipeline,
            examples: Vec::new(),
            features: FeatureAccumulator::new(),
            rng,
        }
    }

    /// Validate a spec and start a session from it
    pub fn from_spec(spec: PipelineSpec) -> Result<Self> {
        Ok(Self::new(spec.into_config()?))
    }

    /// Replace the configured lemmatizer, e.g. with a dictionary
    pub fn with_lemmatizer(mut self, lemmatizer: impl Into<AnyLemmatizer>) -> Self {
        self.pipeline.lemmatizer = lemmatizer.into();
        self
    }

    /// Load, process and label every file under `spam_dir` and `ham_dir`.
    ///
    /// Spam examples are appended before ham examples. When shuffling is
    /// enabled the whole accumulator is shuffled afterwards. Returns all
    /// examples held so far.
    pub fn load_and_process(
        &mut self,
        spam_dir: impl AsRef<Path>,
        ham_dir: impl AsRef<Path>,
    ) -> Result<&[LabeledDocument]> {
        let spam = self.process_directory(spam_dir.as_ref(), Label::Spam)?;
        let ham = self.process_directory(ham_dir.as_ref(), Label::Ham)?;
        let batch = spam.len() + ham.len();

        self.examples.extend(spam);
        self.examples.extend(ham);
        if self.config.shuffle {
            self.examples.shuffle(&mut self.rng);
        }

        tracing::info!("extracted {} files", batch);
        if self.examples.len() > batch {
            tracing::info!("{} examples in total", self.examples.len());
        }
        Ok(&self.examples)
    }

    fn process_directory(&self, dir: &Path, label: Label) -> Result<Vec<LabeledDocument>> {
        let loader = LoaderConfig {
            sort_entries: self.config.sort_entries,
        };
        let documents = load_directory_with(dir, loader)?;
        tracing::debug!(
            dir = %dir.display(),
            label = label.as_str(),
            documents = documents.len(),
            "processing directory"
        );
        let tokens = self
            .pipeline
            .run(&documents, &self.config, &mut TracingObserver);
        Ok(tokens
            .into_iter()
            .map(|tokens| LabeledDocument::new(tokens, label))
            .collect())
    }

    /// Append examples prepared elsewhere
    pub fn extend_examples<I>(&mut self, examples: I)
    where
        I: IntoIterator<Item = LabeledDocument>,
    {
        self.examples.extend(examples);
    }

    /// Compute features for every example currently held and append them.
    ///
    /// Calling this twice without loading in between appends the same
    /// features twice.
    pub fn extract_features(&mut self) -> &[FeatureVector] {
        let added = self.features.extend_from(&self.examples);
        tracing::debug!(added, total = self.features.len(), "features extracted");
        self.features.features()
    }

    /// Process one in-memory text with this session's pipeline
    pub fn process_text(&self, text: &str) -> Vec<String> {
        self.pipeline.process_text(text, &self.config)
    }

    pub fn examples(&self) -> &[LabeledDocument] {
        &self.examples
    }

    pub fn features(&self) -> &[FeatureVector] {
        self.features.features()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::types::{LemmatizerKind, StopwordSource};
    use std::fs;
    use tempfile::TempDir;

    fn corpus(spam: &[&str], ham: &[&str]) -> (TempDir, TempDir) {
        let spam_dir = TempDir::new().unwrap();
        let ham_dir = TempDir::new().unwrap();
        for (i, text) in spam.iter().enumerate() {
            fs::write(spam_dir.path().join(format!("spam{i}.txt")), text).unwrap();
        }
        for (i, text) in ham.iter().enumerate() {
            fs::write(ham_dir.path().join(format!("ham{i}.txt")), text).unwrap();
        }
        (spam_dir, ham_dir)
    }

    fn plain_config() -> PipelineConfig {
        PipelineConfig::default()
            .with_uncommon_amount(0.0)
            .with_stopwords(StopwordSource::none())
            .with_lemmatizer(LemmatizerKind::None)
            .with_shuffle(false)
    }

    #[test]
    fn test_spam_before_ham_without_shuffle() {
        let (spam, ham) = corpus(&["win cash\n", "free money\n"], &["lunch today\n"]);
        let mut session = CorpusSession::new(plain_config());

        let examples = session.load_and_process(spam.path(), ham.path()).unwrap();

        let labels: Vec<Label> = examples.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![Label::Spam, Label::Spam, Label::Ham]);
        assert_eq!(examples[0].tokens, vec!["win", "cash"]);
        assert_eq!(examples[2].tokens, vec!["lunch", "today"]);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let spam_texts: Vec<String> = (0..10).map(|i| format!("spam word{i}\n")).collect();
        let ham_texts: Vec<String> = (0..10).map(|i| format!("ham word{i}\n")).collect();
        let spam_refs: Vec<&str> = spam_texts.iter().map(String::as_str).collect();
        let ham_refs: Vec<&str> = ham_texts.iter().map(String::as_str).collect();
        let (spam, ham) = corpus(&spam_refs, &ham_refs);

        let cfg = plain_config().with_shuffle(true).with_seed(7);
        let mut a = CorpusSession::new(cfg.clone());
        let mut b = CorpusSession::new(cfg);
        a.load_and_process(spam.path(), ham.path()).unwrap();
        b.load_and_process(spam.path(), ham.path()).unwrap();

        assert_eq!(a.examples(), b.examples());
        assert_eq!(a.examples().len(), 20);
    }

    #[test]
    fn test_examples_accumulate_across_loads() {
        let (spam, ham) = corpus(&["buy now\n"], &["see you\n"]);
        let mut session = CorpusSession::new(plain_config());

        session.load_and_process(spam.path(), ham.path()).unwrap();
        session.load_and_process(spam.path(), ham.path()).unwrap();

        assert_eq!(session.examples().len(), 4);
    }

    #[test]
    fn test_extract_features_appends_for_all_examples() {
        let mut session = CorpusSession::new(plain_config());
        session.extend_examples([
            LabeledDocument::spam(vec!["cash".into(), "cash".into()]),
            LabeledDocument::ham(vec!["meeting".into()]),
        ]);

        let features = session.extract_features();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].count("cash"), 2);
        assert_eq!(features[0].label, Label::Spam);
        assert_eq!(features[1].label, Label::Ham);

        assert_eq!(session.extract_features().len(), 4);
    }

    #[test]
    fn test_missing_directory_is_load_error() {
        let (_, ham) = corpus(&[], &["hello there\n"]);
        let mut session = CorpusSession::new(plain_config());

        let err = session
            .load_and_process("/nonexistent/spam/dir", ham.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Load);
        assert!(session.examples().is_empty());
    }

    #[test]
    fn test_from_spec() {
        let spec =
            PipelineSpec::from_json_str(r#"{ "v": 1, "shuffle": { "enabled": false } }"#).unwrap();
        let session = CorpusSession::from_spec(spec).unwrap();
        assert!(!session.config().shuffle);

        let bad = PipelineSpec::from_json_str(r#"{ "v": 9 }"#).unwrap();
        assert!(CorpusSession::from_spec(bad).is_err());
    }

    #[test]
    fn test_process_text_uses_session_config() {
        let session = CorpusSession::new(plain_config());
        assert_eq!(session.process_text("Hello World\n"), vec!["hello", "world"]);
    }
}
