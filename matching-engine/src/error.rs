//! Error types for matching

use thiserror::Error;

/// Result type for matching operations
pub type Result<T> = std::result::Result<T, Error>;

/// Matching errors
///
/// An empty match is not an error; see [`crate::MatchOutcome::NoRouteAvailable`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Transit graph error (unknown station, no nearby station)
    #[error(transparent)]
    Transit(#[from] transit_core::Error),

    /// Request failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown carrier or route
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Caused by an unknown id
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Transit(transit_core::Error::NotFound(_))
        )
    }
}
