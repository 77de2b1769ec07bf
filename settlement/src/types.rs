//! Core types for the settlement engine

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use transit_core::{CarrierId, CarrierTier, UrgencyLevel};
use uuid::Uuid;

/// Carrier bank account, snapshotted onto each settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Bank code
    pub bank_code: String,

    /// Account number
    pub account_number: String,

    /// Account holder name
    pub holder_name: String,
}

impl BankAccount {
    /// Create new bank account
    pub fn new(
        bank_code: impl Into<String>,
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
    ) -> Self {
        Self {
            bank_code: bank_code.into(),
            account_number: account_number.into(),
            holder_name: holder_name.into(),
        }
    }

    /// Account number with all but the last four digits hidden, for logs
    pub fn masked(&self) -> String {
        let digits: Vec<char> = self.account_number.chars().collect();
        let visible = digits.len().min(4);
        let hidden = digits.len() - visible;
        let tail: String = digits[hidden..].iter().collect();
        format!("{}{}", "*".repeat(hidden), tail)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.bank_code.trim().is_empty() || self.account_number.trim().is_empty() {
            return Err(Error::InvalidInput("bank account is incomplete".to_string()));
        }
        Ok(())
    }
}

/// Payment confirmed for a completed delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedPayment {
    /// Payment ID (one settlement per payment)
    pub payment_id: Uuid,

    /// Delivery request the payment belongs to
    pub request_id: Uuid,

    /// Carrier to pay
    pub carrier_id: CarrierId,

    /// Carrier grade at completion time
    pub carrier_grade: CarrierTier,

    /// Request urgency
    pub urgency: UrgencyLevel,

    /// Amount paid by the requester
    pub amount: Decimal,

    /// Payout destination
    pub bank_account: BankAccount,

    /// When the payment was confirmed
    pub confirmed_at: DateTime<Utc>,
}

/// Commission inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionInput {
    /// Payment amount
    pub amount: Decimal,

    /// Carrier grade
    pub grade: CarrierTier,

    /// Request urgency
    pub urgency: UrgencyLevel,
}

/// Platform commission on one payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResult {
    /// Payment amount
    pub amount: Decimal,

    /// Base-rate part
    pub base_commission: Decimal,

    /// Carrier-grade part
    pub grade_bonus: Decimal,

    /// Urgency part
    pub urgency_surcharge: Decimal,

    /// Total commission, floored to the minimum
    pub total_commission: Decimal,

    /// The minimum commission replaced the computed sum
    pub applied_minimum: bool,

    /// Amount minus total commission
    pub carrier_net_earnings: Decimal,
}

/// Amount breakdown of a settlement
///
/// `net_amount + tax + platform_fee == total_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementAmounts {
    /// Amount paid by the requester
    pub total_payment: Decimal,

    /// Platform commission
    pub platform_fee: Decimal,

    /// Carrier earnings before tax
    pub carrier_earnings: Decimal,

    /// Withholding tax
    pub tax: Decimal,

    /// Amount transferred to the carrier
    pub net_amount: Decimal,
}

/// Settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    /// Waiting for a batch run
    Pending,
    /// Payout in flight
    Processing,
    /// Paid out
    Completed,
    /// Payout failed
    Failed,
    /// Held for manual review
    OnHold,
}

impl SettlementStatus {
    /// Allowed transitions. `Failed → Processing` is the retry path.
    pub fn can_transition_to(self, next: SettlementStatus) -> bool {
        use SettlementStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Failed)
                | (Pending, OnHold)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Failed, Processing)
        )
    }

    /// No further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, SettlementStatus::Completed | SettlementStatus::OnHold)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettlementStatus::Pending => "PENDING",
            SettlementStatus::Processing => "PROCESSING",
            SettlementStatus::Completed => "COMPLETED",
            SettlementStatus::Failed => "FAILED",
            SettlementStatus::OnHold => "ON_HOLD",
        };
        f.write_str(s)
    }
}

/// Receipt from the payout rail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutReceipt {
    /// Transfer reference on the rail
    pub reference: String,

    /// When the transfer executed
    pub executed_at: DateTime<Utc>,
}

/// Carrier settlement for one payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID (time ordered)
    pub id: Uuid,

    /// Payment ID
    pub payment_id: Uuid,

    /// Carrier ID
    pub carrier_id: CarrierId,

    /// Bank account at creation time
    pub bank_account: BankAccount,

    /// Commission breakdown
    pub commission: CommissionResult,

    /// Amount breakdown
    pub amounts: SettlementAmounts,

    /// Current status
    pub status: SettlementStatus,

    /// Failed payout attempts
    pub retry_count: u32,

    /// No further automatic retries
    pub retry_exhausted: bool,

    /// Last failure or hold reason
    pub failure_reason: Option<String>,

    /// Payout rail reference once completed
    pub payout_reference: Option<String>,

    /// Planned payout date
    pub scheduled_date: NaiveDate,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Completed timestamp
    pub completed_at: Option<DateTime<Utc>>,
}

impl Settlement {
    /// Move to `next`, rejecting illegal transitions
    pub fn transition(&mut self, next: SettlementStatus, now: DateTime<Utc>) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidState(format!(
                "settlement {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Record a successful payout
    pub fn complete(&mut self, receipt: PayoutReceipt, now: DateTime<Utc>) -> Result<()> {
        self.transition(SettlementStatus::Completed, now)?;
        self.payout_reference = Some(receipt.reference);
        self.failure_reason = None;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Record a failed payout attempt
    pub fn fail(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        self.transition(SettlementStatus::Failed, now)?;
        self.retry_count += 1;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Put on hold for manual review
    pub fn hold(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        self.transition(SettlementStatus::OnHold, now)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Settlements paid out
    pub completed: Vec<Uuid>,

    /// Settlements that failed, with the reason
    pub failed: Vec<(Uuid, String)>,

    /// Settlements another worker claimed first
    pub skipped: Vec<Uuid>,
}

impl BatchReport {
    /// Settlements looked at
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len() + self.skipped.len()
    }

    pub(crate) fn sort(&mut self) {
        self.completed.sort();
        self.failed.sort();
        self.skipped.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SettlementStatus::*;

    #[test]
    fn test_status_transitions() {
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(OnHold));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Failed.can_transition_to(Processing));

        assert!(!Completed.can_transition_to(Processing));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!OnHold.can_transition_to(Processing));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Pending));
    }

    #[test]
    fn test_masked_account() {
        let account = BankAccount::new("088", "110123456789", "Kim Giller");
        assert_eq!(account.masked(), "********6789");
        assert_eq!(BankAccount::new("088", "12", "Kim").masked(), "12");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&OnHold).unwrap(), "\"ON_HOLD\"");
        assert_eq!(OnHold.to_string(), "ON_HOLD");
    }
}
