//! Pipeline specification types.
//!
//! A [`PipelineSpec`] is the JSON form of a [`PipelineConfig`]. Omitted
//! sections keep their defaults; unrecognized fields are captured so the
//! [`super::validation::ValidationEngine`] can report them.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "filter": { "uncommon_amount": 0.1, "scope": "per_document", "tie_break": "first_occurrence" },
//!   "stopwords": { "language": "en", "extra": ["subject"] },
//!   "lemmatizer": "morphy",
//!   "shuffle": { "enabled": true, "seed": 42 },
//!   "loader": { "sort_entries": true, "parallel": false },
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::error::{CorpusError, Result, Stage};
use crate::filter::frequency::{FrequencyScope, TieBreak};
use crate::types::{LemmatizerKind, PipelineConfig, StopwordSource};

/// Spec version this crate reads and writes
pub const SPEC_VERSION: u32 = 1;

/// Top-level pipeline specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    #[serde(default)]
    pub filter: FilterSpec,

    #[serde(default)]
    pub stopwords: StopwordSpec,

    #[serde(default)]
    pub lemmatizer: Option<LemmatizerKind>,

    #[serde(default)]
    pub shuffle: ShuffleSpec,

    #[serde(default)]
    pub loader: LoaderSpec,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Rare-word filtering settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub uncommon_amount: Option<f64>,

    #[serde(default)]
    pub scope: Option<FrequencyScope>,

    #[serde(default)]
    pub tie_break: Option<TieBreak>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Stopword settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwordSpec {
    /// Built-in list; `null` or `"none"` disables it
    #[serde(default = "default_language")]
    pub language: Option<String>,

    #[serde(default)]
    pub extra: Vec<String>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_language() -> Option<String> {
    Some("en".to_string())
}

impl Default for StopwordSpec {
    fn default() -> Self {
        Self {
            language: default_language(),
            extra: Vec::new(),
            unknown_fields: HashMap::new(),
        }
    }
}

/// Example shuffling settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShuffleSpec {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Directory loading and execution settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderSpec {
    #[serde(default)]
    pub sort_entries: Option<bool>,

    #[serde(default)]
    pub parallel: Option<bool>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            filter: FilterSpec::default(),
            stopwords: StopwordSpec::default(),
            lemmatizer: None,
            shuffle: ShuffleSpec::default(),
            loader: LoaderSpec::default(),
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl PipelineSpec {
    /// Parse a spec from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| CorpusError::Json {
            stage: Stage::Configure,
            path: "<inline>".into(),
            source,
        })
    }

    /// Read and parse a spec file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| CorpusError::io(Stage::Configure, path, e))?;
        serde_json::from_str(&text).map_err(|source| CorpusError::Json {
            stage: Stage::Configure,
            path: path.to_path_buf(),
            source,
        })
    }

    /// Spec describing an existing configuration
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        Self {
            v: SPEC_VERSION,
            filter: FilterSpec {
                uncommon_amount: Some(cfg.uncommon_amount),
                scope: Some(cfg.frequency_scope),
                tie_break: Some(cfg.tie_break),
                unknown_fields: HashMap::new(),
            },
            stopwords: StopwordSpec {
                language: cfg.stopwords.language.clone(),
                extra: cfg.stopwords.extra.clone(),
                unknown_fields: HashMap::new(),
            },
            lemmatizer: Some(cfg.lemmatizer),
            shuffle: ShuffleSpec {
                enabled: Some(cfg.shuffle),
                seed: cfg.seed,
                unknown_fields: HashMap::new(),
            },
            loader: LoaderSpec {
                sort_entries: Some(cfg.sort_entries),
                parallel: Some(cfg.parallel),
                unknown_fields: HashMap::new(),
            },
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }

    /// Validate with the default rules and build the configuration
    ///
    /// Warnings are logged; any error rejects the spec.
    pub fn into_config(self) -> Result<PipelineConfig> {
        let report = ValidationEngine::with_defaults().validate(&self);
        for warning in report.warnings() {
            tracing::warn!(%warning, "pipeline spec warning");
        }
        if report.has_errors() {
            return Err(CorpusError::InvalidSpec { report });
        }
        Ok(self.to_config())
    }

    /// Map onto a configuration without validating
    pub fn to_config(&self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        let language = self
            .stopwords
            .language
            .clone()
            .filter(|l| !l.eq_ignore_ascii_case("none"));
        PipelineConfig {
            uncommon_amount: self.filter.uncommon_amount.unwrap_or(defaults.uncommon_amount),
            frequency_scope: self.filter.scope.unwrap_or(defaults.frequency_scope),
            tie_break: self.filter.tie_break.unwrap_or(defaults.tie_break),
            stopwords: StopwordSource {
                language,
                extra: self.stopwords.extra.clone(),
            },
            lemmatizer: self.lemmatizer.unwrap_or(defaults.lemmatizer),
            shuffle: self.shuffle.enabled.unwrap_or(defaults.shuffle),
            seed: self.shuffle.seed,
            sort_entries: self.loader.sort_entries.unwrap_or(defaults.sort_entries),
            parallel: self.loader.parallel.unwrap_or(defaults.parallel),
        }
    }
}
