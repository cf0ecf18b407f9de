//! Error types for the loadboard console.
//!
//! - [`ValidationError`] - Draft rejected locally, before any request
//! - [`RequestError`] - Remote collaborator unreachable or non-2xx
//! - [`SubmitError`] - Top-level submission errors
//! - [`DraftError`] - Draft file loading/saving errors
//! - [`ConfigError`] - Unusable configuration
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Validation Errors
// =============================================================================

/// Reasons a draft cannot be submitted.
///
/// Checked in declaration order; only the first failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The draft has no customer ID.
    #[error("Customer ID is required.")]
    MissingCustomer,

    /// The stop list lacks a Load row or an Unload row.
    #[error("Need at least one Load and one Unload stop.")]
    MissingStopCoverage,

    /// At least one stop has no location ID.
    #[error("Each stop needs a Location ID.")]
    MissingLocationId,
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors talking to the shipments API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Connection failed or the request never completed.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-2xx status.
    #[error("HTTP {status}\n{body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl RequestError {
    /// HTTP status, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else {
            RequestError::Network(err.to_string())
        }
    }
}

// =============================================================================
// Submission Errors (top-level)
// =============================================================================

/// Errors returned by the submission path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Draft rejected locally.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Create request failed.
    #[error("Create failed: {0}")]
    Request(#[from] RequestError),

    /// Another submission has not completed yet.
    #[error("A submission is already in flight")]
    SubmissionInFlight,
}

// =============================================================================
// Draft File Errors
// =============================================================================

/// Errors reading or writing a draft file.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Failed to read or write the file.
    #[error("Draft file error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid draft.
    #[error("Invalid draft: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API base URL is empty.
    #[error("API base URL is empty")]
    EmptyApiBase,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for remote calls.
pub type RequestResult<T> = Result<T, RequestError>;

/// Result type for the submission path.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Result type for draft file operations.
pub type DraftResult<T> = Result<T, DraftError>;
