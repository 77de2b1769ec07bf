//! Commission and settlement engine
//!
//! Turns the payment for a completed delivery into a carrier payout.
//!
//! # Pipeline
//!
//! 1. **Commission**: base rate + carrier-grade rate + urgency rate, each
//!    rounded to whole won, floored to a minimum
//! 2. **Amounts**: platform fee, carrier earnings, withholding tax, net payout
//! 3. **Scheduling**: payout date from the confirmation time
//! 4. **Payout**: batch runs over pending settlements, retries with
//!    exponential backoff for failures
//!
//! Every status change is a conditional write on the stored status, so
//! several workers can drain the same store.
//!
//! # Example
//!
//! ```no_run
//! use settlement::{
//!     InMemorySettlementStore, LoggingNotifier, SettlementConfig, SettlementProcessor,
//!     SimulatedPayoutGateway,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> settlement::Result<()> {
//!     let processor = SettlementProcessor::new(
//!         SettlementConfig::default(),
//!         Arc::new(InMemorySettlementStore::new()),
//!         Arc::new(SimulatedPayoutGateway::new(50, 0.9)),
//!         Arc::new(LoggingNotifier),
//!     )?;
//!
//!     let report = processor.process_pending_batch().await?;
//!     println!("{} paid, {} failed", report.completed.len(), report.failed.len());
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod calculator;
pub mod commission;
pub mod config;
pub mod error;
pub mod gateway;
pub mod processor;
pub mod retry;
pub mod scheduler;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports
pub use calculator::SettlementCalculator;
pub use commission::CommissionCalculator;
pub use config::{CommissionConfig, GradeRates, SettlementConfig, UrgencySurchargeRates};
pub use error::{Error, Result};
pub use gateway::{LoggingNotifier, PayoutGateway, SettlementNotifier, SimulatedPayoutGateway};
pub use processor::SettlementProcessor;
pub use retry::{RetryExecutor, RetryPolicy};
pub use scheduler::PayoutSchedule;
pub use store::{InMemorySettlementStore, SettlementStore};
pub use types::*;
