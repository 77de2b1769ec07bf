//! Error types for the delivery pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum Error {
    /// Transit data error
    #[error(transparent)]
    Transit(#[from] transit_core::Error),

    /// Matching error
    #[error(transparent)]
    Matching(#[from] matching_engine::Error),

    /// Pricing error
    #[error(transparent)]
    Pricing(#[from] pricing_engine::Error),

    /// Settlement error
    #[error(transparent)]
    Settlement(#[from] settlement::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
