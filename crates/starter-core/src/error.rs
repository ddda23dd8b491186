//! Error types for the scaffolding engine

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Errors that stop the engine's own work
///
/// Per-command install failures are not errors: they are recorded as
/// [`crate::install::CommandFailure`] values in the attempt log.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid project name '{name}': {}", violations.join("; "))]
    InvalidName {
        name: String,
        violations: Vec<String>,
    },

    #[error("Template '{name}' not found. Available templates: {}", available.join(", "))]
    UnknownTemplate {
        name: String,
        available: Vec<String>,
    },

    #[error("API key must not contain control characters such as newlines")]
    InvalidSecret,

    #[error("Directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template path escapes the project root: {0}")]
    InvalidTemplatePath(String),

    #[error("Template declares {0} more than once")]
    DuplicateTemplatePath(String),

    #[error("Failed to process metadata file {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error for the run report
    pub fn fatal_kind(&self) -> FatalKind {
        match self {
            ScaffoldError::InvalidName { .. } => FatalKind::InvalidName,
            ScaffoldError::UnknownTemplate { .. } => FatalKind::UnknownTemplate,
            ScaffoldError::InvalidSecret => FatalKind::InvalidSecret,
            ScaffoldError::AlreadyExists(_) => FatalKind::AlreadyExists,
            ScaffoldError::Io { .. }
            | ScaffoldError::InvalidTemplatePath(_)
            | ScaffoldError::DuplicateTemplatePath(_)
            | ScaffoldError::Metadata { .. } => FatalKind::Io,
        }
    }
}

/// Category of a fatal run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FatalKind {
    InvalidName,
    UnknownTemplate,
    InvalidSecret,
    AlreadyExists,
    Io,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_message_lists_violations() {
        let err = ScaffoldError::InvalidName {
            name: "Bad Name".to_string(),
            violations: vec![
                "name can no longer contain capital letters".to_string(),
                "name can only contain URL-friendly characters".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Bad Name"));
        assert!(msg.contains("capital letters; name can only"));
        assert_eq!(err.fatal_kind(), FatalKind::InvalidName);
    }

    #[test]
    fn test_io_like_errors_map_to_io_kind() {
        let err = ScaffoldError::io(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.fatal_kind(), FatalKind::Io);
        assert_eq!(
            ScaffoldError::InvalidTemplatePath("../x".to_string()).fatal_kind(),
            FatalKind::Io
        );
    }
}
