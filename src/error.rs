// Error taxonomy for the data preparation pipeline.
//
// Not-found and validation errors abort the calling operation with no partial
// results. External-call failures carry the tagged CompletionError so callers
// can tell a service outage from a malformed response.

use std::path::PathBuf;

use thiserror::Error;

use crate::extractor::traits::CompletionError;

/// Errors returned by the library operations.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Input file does not exist.
    #[error("Input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Missing column, mismatched lengths, malformed CSV content.
    #[error("{0}")]
    Validation(String),

    /// Transport or service-level failure from the language model API.
    #[error("Language model service error during topic extraction: {0}")]
    Service(CompletionError),

    /// Unexpected failure during extraction, surfaced under the propagate policy.
    #[error("Unexpected error during topic extraction: {0}")]
    Extraction(CompletionError),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing or invalid configuration value.
    #[error("{0}")]
    Config(String),
}

impl PrepError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PrepError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PrepError::Validation(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, PrepError::Service(_))
    }
}
