//! External collaborators: the payout rail and failure notifications

use crate::{
    types::{PayoutReceipt, Settlement},
    Error, Result,
};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Executes the bank transfer for a settlement
#[async_trait]
pub trait PayoutGateway: Send + Sync {
    /// Transfer `settlement.amounts.net_amount` to the snapshotted account.
    ///
    /// Return [`Error::TransientFailure`] for failures worth retrying.
    async fn execute_payout(&self, settlement: &Settlement) -> Result<PayoutReceipt>;
}

/// Told once when a settlement fails for good
#[async_trait]
pub trait SettlementNotifier: Send + Sync {
    /// Retries are exhausted; the settlement needs manual handling
    async fn settlement_failed(&self, settlement: &Settlement);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl SettlementNotifier for LoggingNotifier {
    async fn settlement_failed(&self, settlement: &Settlement) {
        error!(
            settlement_id = %settlement.id,
            carrier_id = %settlement.carrier_id,
            retry_count = settlement.retry_count,
            reason = settlement.failure_reason.as_deref().unwrap_or("unknown"),
            "Settlement permanently failed"
        );
    }
}

/// Payout rail simulator with latency and random failures
#[derive(Debug, Clone)]
pub struct SimulatedPayoutGateway {
    latency_ms: u64,
    success_rate: f64,
}

impl SimulatedPayoutGateway {
    /// Create new simulator; `success_rate` in [0, 1]
    pub fn new(latency_ms: u64, success_rate: f64) -> Self {
        Self {
            latency_ms,
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }

    fn should_succeed(&self) -> bool {
        let mut rng = rand::thread_rng();
        rng.gen::<f64>() < self.success_rate
    }
}

#[async_trait]
impl PayoutGateway for SimulatedPayoutGateway {
    async fn execute_payout(&self, settlement: &Settlement) -> Result<PayoutReceipt> {
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;

        if !self.should_succeed() {
            warn!(settlement_id = %settlement.id, "Simulated payout failure");
            return Err(Error::TransientFailure("simulated bank failure".to_string()));
        }

        let reference = format!("SIM-{}", Uuid::new_v4());
        info!(
            settlement_id = %settlement.id,
            amount = %settlement.amounts.net_amount,
            account = %settlement.bank_account.masked(),
            reference = %reference,
            "Simulated payout executed"
        );

        Ok(PayoutReceipt {
            reference,
            executed_at: Utc::now(),
        })
    }
}
