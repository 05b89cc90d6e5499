//! Validation engine for pipeline specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`PipelineSpec`](super::spec::PipelineSpec) and collects every diagnostic
//! into a [`ValidationReport`]. It never stops at the first error, so users
//! see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use spam_corpus::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::errors::{ErrorCode, PipelineSpecError};
use super::spec::*;
use crate::nlp::stopwords::StopwordFilter;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding with its severity
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: PipelineSpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All error messages joined into one line
    pub fn summary(&self) -> String {
        self.errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`PipelineSpec`] and returns
/// zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"uncommon_amount"`).
    fn name(&self) -> &str;

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a [`PipelineSpec`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(UncommonAmountRule));
        engine.add_rule(Box::new(StopwordLanguageRule));
        engine.add_rule(Box::new(ShuffleSeedRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &PipelineSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Spec version must be supported ──────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            PipelineSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("spec version {} is not supported", spec.v),
            )
            .with_hint(format!("Set \"v\" to {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. uncommon_amount must be a finite, non-negative number ───────────────

struct UncommonAmountRule;

impl ValidationRule for UncommonAmountRule {
    fn name(&self) -> &str {
        "uncommon_amount"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let Some(amount) = spec.filter.uncommon_amount else {
            return vec![];
        };
        let path = "/filter/uncommon_amount";

        if !amount.is_finite() || amount < 0.0 {
            vec![ValidationDiagnostic::error(
                PipelineSpecError::new(
                    ErrorCode::InvalidValue,
                    path,
                    format!("uncommon_amount must be a non-negative number, got {amount}"),
                )
                .with_hint("Use 0 to disable rare-word removal"),
            )]
        } else if amount > 1.0 && amount.fract() != 0.0 {
            vec![ValidationDiagnostic::warning(
                PipelineSpecError::new(
                    ErrorCode::InvalidValue,
                    path,
                    format!(
                        "uncommon_amount {amount} is a count and will be rounded down to {}",
                        amount.floor()
                    ),
                )
                .with_hint("Use a value below 1 to remove a fraction of the corpus"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 3. Stopword language should have a built-in list ───────────────────────

struct StopwordLanguageRule;

impl ValidationRule for StopwordLanguageRule {
    fn name(&self) -> &str {
        "stopword_language"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        match spec.stopwords.language.as_deref() {
            Some(lang)
                if !lang.eq_ignore_ascii_case("none")
                    && !StopwordFilter::is_known_language(lang) =>
            {
                vec![ValidationDiagnostic::warning(
                    PipelineSpecError::new(
                        ErrorCode::UnknownLanguage,
                        "/stopwords/language",
                        format!("no built-in stopword list for \"{lang}\", English will be used"),
                    )
                    .with_hint("Use an ISO code such as \"en\", or null with an explicit extra list"),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 4. A seed without shuffling does nothing ───────────────────────────────

struct ShuffleSeedRule;

impl ValidationRule for ShuffleSeedRule {
    fn name(&self) -> &str {
        "shuffle_seed"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        if spec.shuffle.seed.is_some() && spec.shuffle.enabled == Some(false) {
            vec![ValidationDiagnostic::warning(
                PipelineSpecError::new(
                    ErrorCode::IgnoredSetting,
                    "/shuffle/seed",
                    "seed has no effect while shuffling is disabled",
                )
                .with_hint("Remove the seed or enable shuffling"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Diagnostics for the extra fields captured at JSON pointer `path`
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    PipelineSpecError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let sections: [(&str, &HashMap<String, serde_json::Value>); 5] = [
            ("", &spec.unknown_fields),
            ("/filter", &spec.filter.unknown_fields),
            ("/stopwords", &spec.stopwords.unknown_fields),
            ("/shuffle", &spec.shuffle.unknown_fields),
            ("/loader", &spec.loader.unknown_fields),
        ];
        sections
            .into_iter()
            .flat_map(|(path, unknowns)| Self::check_unknowns(path, unknowns, spec.strict))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
