//! Error types for fieldwork.
//!
//! This module defines `FieldworkError`, the unified error type used throughout
//! the crate, and `ErrorKind`, the coarse taxonomy callers branch on.
//!
//! # Security
//!
//! Movidesk expects the API token in the query string, so it ends up inside
//! request URLs and therefore inside `reqwest` error messages. Always pass
//! errors through `sanitized_display()` before logging or returning them.

use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`FieldworkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration, including a missing technician identity.
    Configuration,
    /// The remote API failed or answered with something we could not read.
    Remote,
    /// User-supplied report data was rejected before any network call.
    Validation,
    /// The local technician store could not be read or written.
    Storage,
}

/// Unified error type for all fieldwork operations.
#[derive(Error, Debug)]
pub enum FieldworkError {
    /// Configuration error - missing or invalid environment variables or identity.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// The response body did not have the expected structure.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Reading or writing the technician store failed.
    #[error("technician store error: {0}")]
    Storage(#[from] std::io::Error),

    /// The technician store exists but is not valid JSON.
    #[error("technician store is corrupt: {0}")]
    StoreFormat(#[source] serde_json::Error),
}

impl FieldworkError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        FieldworkError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        FieldworkError::Config(message.into())
    }

    /// Creates the error returned when no technician identity is available.
    pub fn missing_technician() -> Self {
        FieldworkError::Config("technician identity is not set".to_string())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        FieldworkError::Validation(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        FieldworkError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Returns which branch of the taxonomy this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldworkError::Config(_) | FieldworkError::HttpClient(_) => ErrorKind::Configuration,
            FieldworkError::Http(_)
            | FieldworkError::HttpStatus { .. }
            | FieldworkError::Timeout { .. }
            | FieldworkError::Decode(_) => ErrorKind::Remote,
            FieldworkError::Validation(_) => ErrorKind::Validation,
            FieldworkError::Storage(_) | FieldworkError::StoreFormat(_) => ErrorKind::Storage,
        }
    }

    /// Returns true for failures of the remote API.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.kind() == ErrorKind::Remote
    }

    /// Sanitizes an error message to remove any occurrence of the API token.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `token` - The token to strip from the message
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the token replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, token: &str) -> String {
        if token.is_empty() {
            return message.to_string();
        }
        message.replace(token, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, token: &str) -> String {
        Self::sanitize_message(&self.to_string(), token)
    }
}
