//! Error types for the settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unknown settlement or payment
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input (non-positive amount, duplicate payment, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Illegal status transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Payout rail failure worth retrying
    #[error("Transient failure: {0}")]
    TransientFailure(String),

    /// Another worker changed the settlement first
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Retry loop cancelled between attempts
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Retry budget used up
    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Failed attempts recorded on the settlement
        attempts: u32,
        /// Last failure reason
        last_error: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Only transient payout failures are retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::TransientFailure(_))
    }
}
