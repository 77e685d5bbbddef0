//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body did not match the expected shape.
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        /// Path of the endpoint that produced the body.
        endpoint: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Server answered with a status other than the one the call expects.
    #[error("Remote error from {endpoint} ({status}): {reason}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
        /// Path of the endpoint that failed.
        endpoint: String,
    },

    /// A mandatory flow input was not supplied.
    #[error("Missing required flow input: {name}")]
    MissingInput {
        /// Name of the first missing mandatory input.
        name: String,
    },

    /// Server accepted the submission request but refused to start the run.
    #[error("Execution rejected by server: {code}")]
    Rejected {
        /// Error code reported by the server.
        code: String,
    },

    /// Response was well-formed JSON but unusable.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Polling budget ran out before the run reached a terminal status.
    #[error("Timed out waiting for execution {run_id} after {polls} status checks")]
    TimeoutExpired {
        /// Execution being tracked.
        run_id: String,
        /// Number of status checks performed.
        polls: u64,
    },

    /// Run finished with a result other than resolved.
    #[error("Execution {run_id} finished with status {status}")]
    Unresolved {
        /// Execution that finished.
        run_id: String,
        /// Terminal status reported by the server.
        status: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a remote (unexpected HTTP status) error.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }

    /// Check if this is an input validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::MissingInput { .. })
    }

    /// Check if the polling budget ran out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TimeoutExpired { .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Remote { status: 401, .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
