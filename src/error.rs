use std::path::PathBuf;
use thiserror::Error;

/// Sift's custom error types for better error handling and user experience.
///
/// Only `MissingInput` and `EmptyContent` are hard failures for an analysis;
/// everything else that can go wrong mid-scan (decode failures, per-pattern
/// match construction failures, summarizer failures) is recovered in place
/// and never crosses the pipeline boundary as an error.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required input: {field}")]
    MissingInput { field: String },

    #[error("file content is empty")]
    EmptyContent,

    #[error("signature library loading failed: {message}")]
    RuleLoading { message: String },

    #[error("path does not exist: {}", .path.display())]
    PathNotFound { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SiftError>;

impl SiftError {
    pub fn missing_input<S: Into<String>>(field: S) -> Self {
        Self::MissingInput {
            field: field.into(),
        }
    }

    pub fn rule_loading<S: Into<String>>(message: S) -> Self {
        Self::RuleLoading {
            message: message.into(),
        }
    }

    pub fn path_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Returns true if the error is an input problem the caller can surface
    /// verbatim (as opposed to an internal failure that must stay generic).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingInput { .. } | Self::EmptyContent)
    }
}
