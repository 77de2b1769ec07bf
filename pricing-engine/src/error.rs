//! Error types for pricing

use thiserror::Error;

/// Result type for pricing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pricing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Options cannot be priced
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
