// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Casebook intake pipeline.

use thiserror::Error;

/// The primary error type used across all Casebook adapter traits and core operations.
#[derive(Debug, Error)]
pub enum CasebookError {
    /// Configuration errors (missing credentials, invalid values). Not retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transcript fetch errors (non-2xx response, malformed body, network failure).
    #[error("transcript error: {message}")]
    Transcript {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Classifier errors. Absorbed into a degraded outcome before reaching the orchestrator.
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Docs publish errors (non-2xx response, missing page URL).
    #[error("publish error: {message}")]
    Publish {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller supplied an input that cannot be processed (blank id, bad header value).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CasebookError {
    /// Wrap any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Returns true for configuration errors, which must be fixed operationally.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
