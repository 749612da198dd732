//! Error types for zone record synchronization
//!
//! Every store operation surfaces one of these variants directly to its
//! caller. Nothing in the library retries, panics or exits the process.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonesync
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status
    #[error("API error: status {status}: {body}")]
    Api {
        /// HTTP status code returned by the store
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// The response body did not have the expected record-list shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The store has not wired up this operation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an API error from a status code and raw body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a "not implemented" error for the named operation
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented(operation.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether a caller could reasonably try the same call again.
    ///
    /// Transport failures and 5xx answers are transient; everything else
    /// will fail the same way on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
