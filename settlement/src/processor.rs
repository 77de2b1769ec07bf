//! Settlement processing
//!
//! Turns completed payments into settlements and pays them out:
//!
//! 1. **Creation**: commission, tax and payout date are fixed up front
//! 2. **Batch payout**: every pending settlement gets one attempt, each
//!    isolated from the others
//! 3. **Retry**: failed settlements are retried with backoff until the
//!    budget runs out, then the notifier is told once
//!
//! Workers never assume they own a settlement: each status change is a
//! conditional write, and a worker that loses the race skips the item.

use crate::{
    calculator::SettlementCalculator,
    commission::CommissionCalculator,
    config::SettlementConfig,
    gateway::{PayoutGateway, SettlementNotifier},
    retry::RetryExecutor,
    store::SettlementStore,
    types::{BatchReport, CommissionInput, CompletedPayment, Settlement, SettlementStatus},
    Error, Result,
};
use chrono::{NaiveDate, Utc};
use futures_util::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Settlement processor
pub struct SettlementProcessor {
    store: Arc<dyn SettlementStore>,
    gateway: Arc<dyn PayoutGateway>,
    notifier: Arc<dyn SettlementNotifier>,
    commission: CommissionCalculator,
    calculator: SettlementCalculator,
    retry: RetryExecutor,
    config: SettlementConfig,
}

impl fmt::Debug for SettlementProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettlementProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SettlementProcessor {
    /// Create new processor
    pub fn new(
        config: SettlementConfig,
        store: Arc<dyn SettlementStore>,
        gateway: Arc<dyn PayoutGateway>,
        notifier: Arc<dyn SettlementNotifier>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            gateway,
            notifier,
            commission: CommissionCalculator::new(config.commission.clone()),
            calculator: SettlementCalculator::new(config.tax_rate),
            retry: RetryExecutor::new(config.retry.clone()),
            config,
        })
    }

    /// Processor configuration
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settlement by ID
    pub async fn get_settlement(&self, id: Uuid) -> Result<Settlement> {
        self.store.get(id).await
    }

    /// Settlement for a payment, if one was created
    pub async fn settlement_for_payment(&self, payment_id: Uuid) -> Result<Option<Settlement>> {
        self.store.find_by_payment(payment_id).await
    }

    /// Create the pending settlement for a completed payment
    pub async fn create_settlement(&self, payment: CompletedPayment) -> Result<Settlement> {
        payment.bank_account.validate()?;

        if let Some(existing) = self.store.find_by_payment(payment.payment_id).await? {
            return Err(Error::InvalidInput(format!(
                "payment {} already has settlement {}",
                payment.payment_id, existing.id
            )));
        }

        let commission = self.commission.calculate(&CommissionInput {
            amount: payment.amount,
            grade: payment.carrier_grade,
            urgency: payment.urgency,
        })?;
        let amounts = self.calculator.amounts(&commission)?;
        let now = Utc::now();

        let settlement = Settlement {
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
            scheduled_date: self.config.schedule.scheduled_date(payment.confirmed_at),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        self.store.insert(settlement.clone()).await?;

        info!(
            settlement_id = %settlement.id,
            payment_id = %settlement.payment_id,
            carrier_id = %settlement.carrier_id,
            net_amount = %settlement.amounts.net_amount,
            scheduled_date = %settlement.scheduled_date,
            "Settlement created"
        );

        Ok(settlement)
    }

    /// One payout attempt for a pending settlement
    pub async fn process_settlement(&self, id: Uuid) -> Result<Settlement> {
        let settlement = self.store.get(id).await?;
        if settlement.status != SettlementStatus::Pending {
            return Err(Error::InvalidState(format!(
                "settlement {} is {}, expected {}",
                id,
                settlement.status,
                SettlementStatus::Pending
            )));
        }
        self.attempt(settlement).await
    }

    /// Pay out every pending settlement.
    ///
    /// A failing item is recorded in the report and never fails the batch;
    /// only a store listing error does.
    pub async fn process_pending_batch(&self) -> Result<BatchReport> {
        let pending = self.store.list_by_status(SettlementStatus::Pending).await?;
        Ok(self.run_batch(pending).await)
    }

    /// Pay out pending settlements scheduled on or before `as_of`
    pub async fn process_due_batch(&self, as_of: NaiveDate) -> Result<BatchReport> {
        let due: Vec<Settlement> = self
            .store
            .list_by_status(SettlementStatus::Pending)
            .await?
            .into_iter()
            .filter(|s| self.config.schedule.is_due(s.scheduled_date, as_of))
            .collect();
        Ok(self.run_batch(due).await)
    }

    /// Retry a failed settlement with backoff.
    ///
    /// Once the retry budget is spent the settlement stays `Failed` with
    /// `retry_exhausted` set and the notifier is called.
    pub async fn retry_settlement(&self, id: Uuid, cancel: &CancellationToken) -> Result<Settlement> {
        let settlement = self.store.get(id).await?;
        if settlement.status != SettlementStatus::Failed {
            return Err(Error::InvalidState(format!(
                "settlement {} is {}, only failed settlements are retried",
                id, settlement.status
            )));
        }
        if settlement.retry_exhausted {
            return Err(Error::RetriesExhausted {
                attempts: settlement.retry_count,
                last_error: settlement.failure_reason.unwrap_or_default(),
            });
        }

        // The first failure was the original attempt, not a retry
        let retries_used = settlement.retry_count.saturating_sub(1);
        let operation = format!("settlement {}", id);

        let result = self
            .retry
            .execute(&operation, retries_used, cancel, move || async move {
                let current = self.store.get(id).await?;
                if current.status != SettlementStatus::Failed {
                    return Err(Error::Conflict(format!(
                        "settlement {} moved to {} during retry",
                        id, current.status
                    )));
                }
                self.attempt(current).await
            })
            .await;

        match result {
            Ok(settlement) => Ok(settlement),
            Err(e @ (Error::Cancelled(_) | Error::Conflict(_))) => Err(e),
            Err(Error::RetriesExhausted { last_error, .. }) => {
                let settlement = self.mark_exhausted(id).await?;
                Err(Error::RetriesExhausted {
                    attempts: settlement.retry_count,
                    last_error,
                })
            }
            Err(e) => {
                // Non-retryable payout failure: no point trying again
                self.mark_exhausted(id).await?;
                Err(e)
            }
        }
    }

    /// Retry every failed settlement that still has retry budget
    pub async fn retry_failed_batch(&self, cancel: &CancellationToken) -> Result<BatchReport> {
        let failed: Vec<Uuid> = self
            .store
            .list_by_status(SettlementStatus::Failed)
            .await?
            .into_iter()
            .filter(|s| !s.retry_exhausted)
            .map(|s| s.id)
            .collect();

        info!(count = failed.len(), "Retrying failed settlements");

        let outcomes: Vec<(Uuid, Result<Settlement>)> = stream::iter(failed)
            .map(|id| async move { (id, self.retry_settlement(id, cancel).await) })
            .buffer_unordered(self.config.batch_concurrency)
            .collect()
            .await;

        Ok(summarize(outcomes))
    }

    /// Hold a pending settlement for manual review
    pub async fn hold_settlement(&self, id: Uuid, reason: &str) -> Result<Settlement> {
        let mut settlement = self.store.get(id).await?;
        let expected = settlement.status;
        settlement.hold(reason, Utc::now())?;

        if !self.store.update_if_status(expected, &settlement).await? {
            return Err(Error::Conflict(format!("settlement {} changed before hold", id)));
        }

        info!(settlement_id = %id, reason, "Settlement put on hold");
        Ok(settlement)
    }

    async fn run_batch(&self, settlements: Vec<Settlement>) -> BatchReport {
        info!(count = settlements.len(), "Processing settlement batch");

        let outcomes: Vec<(Uuid, Result<Settlement>)> = stream::iter(settlements)
            .map(|settlement| async move {
                let id = settlement.id;
                (id, self.attempt(settlement).await)
            })
            .buffer_unordered(self.config.batch_concurrency)
            .collect()
            .await;

        let report = summarize(outcomes);
        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Settlement batch finished"
        );
        report
    }

    /// Claim the settlement, call the gateway and record the outcome.
    ///
    /// A failed payout whose outcome cannot be written is put back in its
    /// pre-attempt status. A successful payout is never put back; recording
    /// it is retried instead.
    async fn attempt(&self, settlement: Settlement) -> Result<Settlement> {
        let id = settlement.id;
        let expected = settlement.status;

        let mut claimed = settlement.clone();
        claimed.transition(SettlementStatus::Processing, Utc::now())?;
        if !self.store.update_if_status(expected, &claimed).await? {
            debug!(settlement_id = %id, "Settlement claimed by another worker");
            return Err(Error::Conflict(format!(
                "settlement {} is no longer {}",
                id, expected
            )));
        }

        match self.gateway.execute_payout(&claimed).await {
            Ok(receipt) => {
                claimed.complete(receipt, Utc::now())?;
                let reference = claimed.payout_reference.clone().unwrap_or_default();
                if let Err(e) = self.record_payout(&claimed).await {
                    error!(
                        settlement_id = %id,
                        reference = %reference,
                        error = %e,
                        "Payout executed but could not be recorded"
                    );
                    return Err(e);
                }
                info!(
                    settlement_id = %id,
                    net_amount = %claimed.amounts.net_amount,
                    reference = %reference,
                    "Settlement paid out"
                );
                Ok(claimed)
            }
            Err(e) => {
                claimed.fail(e.to_string(), Utc::now())?;
                if let Err(store_error) = self.commit(&claimed).await {
                    warn!(
                        settlement_id = %id,
                        error = %store_error,
                        "Could not record failed payout, restoring {}", expected
                    );
                    self.restore(&settlement).await;
                    return Err(e);
                }
                warn!(
                    settlement_id = %id,
                    retry_count = claimed.retry_count,
                    error = %e,
                    "Settlement payout failed"
                );
                if !e.is_retryable() {
                    if let Err(store_error) = self.mark_exhausted(id).await {
                        warn!(settlement_id = %id, error = %store_error, "Could not mark settlement permanent");
                    }
                }
                Err(e)
            }
        }
    }

    /// Record a completed payout, retrying transient store failures
    async fn record_payout(&self, settlement: &Settlement) -> Result<()> {
        match self.commit(settlement).await {
            Err(e) if e.is_retryable() => {
                warn!(settlement_id = %settlement.id, error = %e, "Recording payout failed, retrying");
                let operation = format!("record payout {}", settlement.id);
                self.retry
                    .execute(&operation, 0, &CancellationToken::new(), || self.commit(settlement))
                    .await
            }
            other => other,
        }
    }

    /// Put a claimed settlement back the way it was before the attempt
    async fn restore(&self, original: &Settlement) {
        match self
            .store
            .update_if_status(SettlementStatus::Processing, original)
            .await
        {
            Ok(true) => debug!(settlement_id = %original.id, status = %original.status, "Settlement restored"),
            Ok(false) => warn!(settlement_id = %original.id, "Settlement changed before it could be restored"),
            Err(e) => error!(
                settlement_id = %original.id,
                error = %e,
                "Settlement left {} after a failed write", SettlementStatus::Processing
            ),
        }
    }

    /// Write the outcome of an attempt this worker claimed
    async fn commit(&self, settlement: &Settlement) -> Result<()> {
        if self
            .store
            .update_if_status(SettlementStatus::Processing, settlement)
            .await?
        {
            Ok(())
        } else {
            Err(Error::Conflict(format!(
                "settlement {} left {} while its payout was in flight",
                settlement.id,
                SettlementStatus::Processing
            )))
        }
    }

    async fn mark_exhausted(&self, id: Uuid) -> Result<Settlement> {
        let mut settlement = self.store.get(id).await?;
        if settlement.retry_exhausted || settlement.status != SettlementStatus::Failed {
            return Ok(settlement);
        }

        settlement.retry_exhausted = true;
        settlement.updated_at = Utc::now();
        if !self
            .store
            .update_if_status(SettlementStatus::Failed, &settlement)
            .await?
        {
            return Err(Error::Conflict(format!(
                "settlement {} changed before it was marked exhausted",
                id
            )));
        }

        error!(
            settlement_id = %id,
            retry_count = settlement.retry_count,
            "Settlement retries exhausted"
        );
        self.notifier.settlement_failed(&settlement).await;
        Ok(settlement)
    }
}

fn summarize(outcomes: Vec<(Uuid, Result<Settlement>)>) -> BatchReport {
    let mut report = BatchReport::default();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(_) => report.completed.push(id),
            Err(Error::Conflict(_)) | Err(Error::Cancelled(_)) => report.skipped.push(id),
            Err(e) => report.failed.push((id, e.to_string())),
        }
    }
    report.sort();
    report
}
