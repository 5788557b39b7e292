//! Unified error handling for datafactory-core
//!
//! Every operation returns [`CoreError`]. HTTP failures keep the status code,
//! the service error code and the request id so callers can branch on them
//! with the helper predicates.
//!
//! # Example
//!
//! ```rust
//! use datafactory_core::CoreError;
//!
//! fn handle_error(err: CoreError) {
//!     if err.is_not_found() {
//!         println!("Activity type not found");
//!     } else if err.is_retryable() {
//!         println!("Temporary error, can retry");
//!     }
//! }
//!
//! let err = CoreError::Api {
//!     status: 404,
//!     code: Some("ResourceNotFound".to_string()),
//!     message: "activity type 'Copy' does not exist".to_string(),
//!     request_id: None,
//! };
//! assert!(err.is_not_found());
//! ```

use std::time::Duration;
use thiserror::Error;

/// Core error type for Data Factory operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// The service answered with a non-success status
    #[error("API error (HTTP {status}{}): {message}", code_suffix(.code, ", ", ""))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request or response body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Arguments rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Long-running operation reached the Failed state
    #[error("Operation failed{}: {message}", code_suffix(.code, " (", ")"))]
    OperationFailed {
        code: Option<String>,
        message: String,
    },

    /// Long-running operation did not finish in time
    #[error("Operation timed out after {0:?}")]
    OperationTimeout(Duration),

    /// Caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn code_suffix(code: &Option<String>, open: &str, close: &str) -> String {
    code.as_deref()
        .map(|c| format!("{open}{c}{close}"))
        .unwrap_or_default()
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<crate::config::ConfigError> for CoreError {
    fn from(err: crate::config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

impl CoreError {
    /// HTTP status of an API error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Api { status, .. } => Some(*status),
            CoreError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Service request id (`x-ms-request-id`) of an API error, if any
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            CoreError::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::Transport(e) => e.is_timeout(),
            CoreError::OperationTimeout(_) => true,
            _ => self.status() == Some(408),
        }
    }

    /// Returns true if this is a rate limiting error (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Returns true if this is a conflict/precondition error (409/412)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self.status(), Some(409) | Some(412))
    }

    /// Returns true if this is a bad request error (400)
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        match self {
            CoreError::Validation(_) => true,
            _ => self.status() == Some(400),
        }
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Transport(e) => e.is_timeout() || e.is_connect(),
            CoreError::OperationTimeout(_) => true,
            _ => self.is_server_error() || self.is_rate_limited() || self.status() == Some(408),
        }
    }
}
