//! # spam_corpus
//!
//! Corpus preparation for bag-of-words spam classification.
//!
//! Raw e-mail text is normalized into lowercase word tokens, stripped of
//! stopwords and of its rarest words, lemmatized, and finally counted into
//! per-document feature vectors labeled spam or ham.
//!
//! ```no_run
//! use spam_corpus::{CorpusSession, PipelineConfig};
//!
//! let mut session = CorpusSession::new(PipelineConfig::default().with_seed(42));
//! session.load_and_process("data/spam", "data/ham")?;
//! let features = session.extract_features();
//! println!("{} feature vectors", features.len());
//! # Ok::<(), spam_corpus::CorpusError>(())
//! ```

pub mod corpus;
pub mod error;
pub mod features;
pub mod filter;
pub mod nlp;
pub mod pipeline;
pub mod types;

pub use corpus::loader::{load_directory, load_file};
pub use error::{CorpusError, Result, Stage};
pub use features::extract_features;
pub use filter::frequency::filter;
pub use nlp::resources::ensure_resources;
pub use nlp::tokenizer::normalize_line;
pub use pipeline::session::CorpusSession;
pub use pipeline::spec::PipelineSpec;
pub use types::{FeatureVector, Label, LabeledDocument, PipelineConfig, RawDocument};
