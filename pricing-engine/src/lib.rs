//! Fare calculation for Giller deliveries
//!
//! # Pipeline
//!
//! A fare is built as an ordered list of line items, each rounded to whole
//! currency units on its own:
//!
//! 1. **Base band**: short / medium / long by distance, or by travel time
//!    when no distance is known
//! 2. **Rush hour**: percentage of the running fare
//! 3. **Urgency**: percentage of the fare after rush hour
//! 4. **Transfer**: flat discount plus a per-transfer bonus, recorded separately
//! 5. **Tier bonus**: carrier-side bonus, not charged to the requester
//! 6. **Floor**: minimum fare
//! 7. **Split**: service fee vs. carrier earnings
//!
//! Surcharges compound in the order above.
//!
//! # Example
//!
//! ```
//! use pricing_engine::{PricingConfig, PricingEngine, PricingOptions};
//! use transit_core::UrgencyLevel;
//!
//! let engine = PricingEngine::new(PricingConfig::default());
//! let options = PricingOptions::for_distance(8.0).with_urgency(UrgencyLevel::Urgent);
//! let result = engine.price(&options).unwrap();
//! assert_eq!(result.service_fee + result.carrier_base_earnings, result.total_fare);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod types;

// Re-exports
pub use config::{FareTable, PricingConfig, RushHourWindow, TierBonusTable, UrgencyRates};
pub use engine::PricingEngine;
pub use error::{Error, Result};
pub use money::round_won;
pub use types::*;
