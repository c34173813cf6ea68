//! Error types for loading and rendering OpenAPI documents.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or rendering a document.
///
/// Key collisions during a merge are not errors; see [`crate::Conflict`].
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// The source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source bytes are not a well-formed tree.
    #[error("failed to parse document: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The tree parsed, but does not have the shape of an OpenAPI document.
    #[error("Invalid OpenAPI spec: {message}")]
    InvalidSpec { message: String },

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[source] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenApiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }
}
