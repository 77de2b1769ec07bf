//! Giller Transit Core
//!
//! Shared domain model and read-only transit graph for the Giller delivery
//! platform.
//!
//! # Contents
//!
//! - **Data model**: stations, carrier-declared routes, carrier profiles and
//!   delivery requests
//! - **Graph reader**: [`StationDirectory`], [`RouteDirectory`] and
//!   [`CarrierDirectory`] traits, implemented in memory by
//!   [`TransitDirectory`]
//! - **Geo**: great-circle distance and nearest-station lookup
//!
//! All types here are immutable reference data from the point of view of the
//! matching and pricing engines.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod directory;
pub mod error;
pub mod geo;
pub mod types;

// Re-exports
pub use directory::{CarrierDirectory, RouteDirectory, StationDirectory, TransitDirectory};
pub use error::{Error, Result};
pub use geo::{haversine_km, nearest_station};
pub use types::*;
