//! Giller delivery engine
//!
//! Wires the workspace crates into the request lifecycle:
//!
//! 1. **Match**: rank carriers whose commute covers the request
//!    ([`matching_engine`])
//! 2. **Price**: fare for every ranked match ([`pricing_engine`])
//! 3. **Settle**: once delivered, commission, tax and payout
//!    ([`settlement`])
//!
//! [`Config`] loads every engine's settings from one TOML file or from
//! `GILLER_*` environment variables.
//!
//! # Example
//!
//! ```no_run
//! use delivery_engine::{sample, Config, DeliveryPipeline};
//! use std::sync::Arc;
//! use transit_core::{DeliveryRequest, Package, PackageSize, StationId, UrgencyLevel, UserId};
//!
//! # fn main() -> delivery_engine::Result<()> {
//! let pipeline = DeliveryPipeline::new(Arc::new(sample::seoul_network()), &Config::default())?;
//!
//! let request = DeliveryRequest::between(
//!     UserId::new("gler-1"),
//!     StationId::new("seoul"),
//!     StationId::new("gangnam"),
//!     Package { size: PackageSize::Small, weight_kg: 1.0 },
//!     UrgencyLevel::Urgent,
//! );
//!
//! if let Some(offer) = pipeline.quote(&request)?.best() {
//!     println!("{} for {} won", offer.matched.carrier_id, offer.pricing.total_fare);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sample;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{completed_payment, DeliveryPipeline, Offer, Quote};
