//! Test doubles shared by the unit tests

use crate::{
    calculator::SettlementCalculator,
    commission::CommissionCalculator,
    gateway::{PayoutGateway, SettlementNotifier},
    store::{InMemorySettlementStore, SettlementStore},
    types::{
        BankAccount, CommissionInput, CompletedPayment, PayoutReceipt, Settlement,
        SettlementStatus,
    },
    Error, Result,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use transit_core::{CarrierTier, UrgencyLevel, UserId};
use uuid::Uuid;

pub(crate) fn payment(amount: Decimal) -> CompletedPayment {
    CompletedPayment {
        payment_id: Uuid::new_v4(),
        request_id: Uuid::new_v4(),
        carrier_id: UserId::new("giller-a"),
        carrier_grade: CarrierTier::Regular,
        urgency: UrgencyLevel::Normal,
        amount,
        bank_account: BankAccount::new("088", "110123456789", "Kim Giller"),
        // Wednesday
        confirmed_at: Utc.with_ymd_and_hms(2026, 10, 14, 15, 0, 0).unwrap(),
    }
}

pub(crate) fn settlement() -> Settlement {
    let payment = payment(dec!(20000));
    let commission = CommissionCalculator::default()
        .calculate(&CommissionInput {
            amount: payment.amount,
            grade: payment.carrier_grade,
            urgency: payment.urgency,
        })
        .unwrap();
    let amounts = SettlementCalculator::new(dec!(0.033)).amounts(&commission).unwrap();
    let now = Utc::now();

    Settlement {
        id: Uuid::now_v7(),
        payment_id: payment.payment_id,
        carrier_id: payment.carrier_id,
        bank_account: payment.bank_account,
        commission,
        amounts,
        status: SettlementStatus::Pending,
        retry_count: 0,
        retry_exhausted: false,
        failure_reason: None,
        payout_reference: None,
        scheduled_date: payment.confirmed_at.date_naive(),
        created_at: now,
        updated_at: now,
        completed_at: None,
    }
}

/// Gateway that fails chosen settlements a set number of times
#[derive(Debug, Default)]
pub(crate) struct ScriptedGateway {
    transient: DashMap<Uuid, u32>,
    rejected: DashMap<Uuid, ()>,
    calls: DashMap<Uuid, u32>,
    latency: Option<Duration>,
}

impl ScriptedGateway {
    pub(crate) fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Default::default()
        }
    }

    /// Fail `times` attempts with a transient error, then succeed
    pub(crate) fn fail_transiently(&self, id: Uuid, times: u32) {
        self.transient.insert(id, times);
    }

    /// Always fail with a non-retryable error
    pub(crate) fn reject(&self, id: Uuid) {
        self.rejected.insert(id, ());
    }

    pub(crate) fn calls(&self, id: Uuid) -> u32 {
        self.calls.get(&id).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl PayoutGateway for ScriptedGateway {
    async fn execute_payout(&self, settlement: &Settlement) -> Result<PayoutReceipt> {
        *self.calls.entry(settlement.id).or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.rejected.contains_key(&settlement.id) {
            return Err(Error::InvalidInput("account closed".to_string()));
        }

        if let Some(mut remaining) = self.transient.get_mut(&settlement.id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::TransientFailure("bank timeout".to_string()));
            }
        }

        Ok(PayoutReceipt {
            reference: format!("TEST-{}", settlement.id),
            executed_at: Utc::now(),
        })
    }
}

/// Notifier that records who it was told about
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    failed: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    pub(crate) fn notified(&self) -> Vec<Uuid> {
        self.failed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SettlementNotifier for RecordingNotifier {
    async fn settlement_failed(&self, settlement: &Settlement) {
        self.failed.lock().unwrap().push(settlement.id);
    }
}

/// Store whose next writes out of `Processing` fail
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    inner: InMemorySettlementStore,
    failing_writes: AtomicU32,
}

impl FlakyStore {
    pub(crate) fn fail_processing_writes(&self, times: u32) {
        self.failing_writes.store(times, Ordering::SeqCst);
    }
}

#[async_trait]
impl SettlementStore for FlakyStore {
    async fn insert(&self, settlement: Settlement) -> Result<()> {
        self.inner.insert(settlement).await
    }

    async fn get(&self, id: Uuid) -> Result<Settlement> {
        self.inner.get(id).await
    }

    async fn find_by_payment(&self, payment_id: Uuid) -> Result<Option<Settlement>> {
        self.inner.find_by_payment(payment_id).await
    }

    async fn list_by_status(&self, status: SettlementStatus) -> Result<Vec<Settlement>> {
        self.inner.list_by_status(status).await
    }

    async fn update_if_status(
        &self,
        expected: SettlementStatus,
        settlement: &Settlement,
    ) -> Result<bool> {
        if expected == SettlementStatus::Processing
            && self
                .failing_writes
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            return Err(Error::TransientFailure("store unavailable".to_string()));
        }
        self.inner.update_if_status(expected, settlement).await
    }
}
