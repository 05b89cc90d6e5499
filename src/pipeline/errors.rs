//! Diagnostics produced while validating a pipeline spec.

use serde::Serialize;
use thiserror::Error;

/// Stable machine-readable code for a spec diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `v` names a spec version this crate does not understand
    UnsupportedVersion,
    /// A value is out of its accepted range
    InvalidValue,
    /// A stopword language has no built-in list
    UnknownLanguage,
    /// A setting has no effect given the rest of the spec
    IgnoredSetting,
    /// A field is not part of the schema
    UnknownField,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::InvalidValue => "invalid_value",
            Self::UnknownLanguage => "unknown_language",
            Self::IgnoredSetting => "ignored_setting",
            Self::UnknownField => "unknown_field",
        }
    }
}

/// One problem found in a spec, located by a JSON pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("[{}] {path}: {message}", code.as_str())]
pub struct PipelineSpecError {
    pub code: ErrorCode,
    /// JSON pointer to the offending field (e.g. `/filter/uncommon_amount`)
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl PipelineSpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
