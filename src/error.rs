//! Error types
//!
//! Every surfaced error names the pipeline stage that failed and, where one
//! exists, the file it was working on.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::validation::ValidationReport;

/// Pipeline stage, used to tag errors and observer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Configure,
    Load,
    Normalize,
    Filter,
    Lemmatize,
    Extract,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Load => "load",
            Self::Normalize => "normalize",
            Self::Filter => "filter",
            Self::Lemmatize => "lemmatize",
            Self::Extract => "extract",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    /// Reading a file or directory failed
    #[error("{stage} stage failed on {}: {source}", path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON document could not be parsed
    #[error("{stage} stage could not parse {}: {source}", path.display())]
    Json {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A pipeline spec failed validation
    #[error("invalid pipeline spec ({} error(s)): {}", report.errors().count(), report.summary())]
    InvalidSpec { report: ValidationReport },
}

impl CorpusError {
    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Stage the error originated in
    pub fn stage(&self) -> Stage {
        match self {
            Self::Io { stage, .. } | Self::Json { stage, .. } => *stage,
            Self::InvalidSpec { .. } => Stage::Configure,
        }
    }

    /// File the error refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => Some(path),
            Self::InvalidSpec { .. } => None,
        }
    }
}

pub type Result<T, E = CorpusError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_stage_and_path() {
        let err = CorpusError::io(
            Stage::Load,
            "/data/spam",
            io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        );

        let msg = err.to_string();
        assert!(msg.contains("load"));
        assert!(msg.contains("/data/spam"));
        assert_eq!(err.stage(), Stage::Load);
        assert_eq!(err.path(), Some(std::path::Path::new("/data/spam")));
    }
}
