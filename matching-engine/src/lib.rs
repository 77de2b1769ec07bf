//! Carrier matching for Giller delivery requests
//!
//! # Flow
//!
//! 1. **Resolve**: pickup station from the request, or the nearest station to
//!    the requester in one-time mode
//! 2. **Direct candidates**: active routes passing pickup then drop-off
//! 3. **Transfer routes**: only when no direct carrier exists, rank transfer
//!    stations bridging the pickup and drop-off lines
//! 4. **Score**: route fit, time fit, rating and responsiveness, averaged
//! 5. **Rank**: descending score, ties by rating then carrier id
//!
//! Every step is a pure function of the transit graph and the request, so the
//! same inputs always give the same ranking.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod candidates;
pub mod config;
pub mod error;
pub mod scoring;
pub mod service;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-exports
pub use candidates::CandidateFinder;
pub use config::{MatchingConfig, ScoringConfig};
pub use error::{Error, Result};
pub use scoring::{rank_matches, MatchScorer};
pub use service::MatchingService;
pub use transfer::TransferRoutePlanner;
pub use types::*;
