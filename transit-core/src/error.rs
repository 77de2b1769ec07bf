//! Error types for transit data access

use thiserror::Error;

/// Result type for transit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Transit errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unknown station, route or carrier id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed request field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nearest station is farther than the one-time matching radius
    #[error("No station within {max_km:.2} km (nearest is {distance_km:.2} km away)")]
    NoNearbyStation {
        /// Distance to the nearest station
        distance_km: f64,
        /// Configured maximum
        max_km: f64,
    },
}

impl Error {
    /// Station id that could not be resolved
    pub fn station_not_found(id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("station {}", id))
    }
}
