//! Configuration for the settlement engine

use crate::{retry::RetryPolicy, scheduler::PayoutSchedule, Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use transit_core::{CarrierTier, UrgencyLevel};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Platform commission policy
    pub commission: CommissionConfig,

    /// Withholding tax on carrier earnings (default: 3.3%)
    pub tax_rate: Decimal,

    /// Backoff for failed payouts
    pub retry: RetryPolicy,

    /// Payout date policy
    pub schedule: PayoutSchedule,

    /// Settlements processed in parallel by a batch run
    pub batch_concurrency: usize,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            commission: CommissionConfig::default(),
            tax_rate: dec!(0.033),
            retry: RetryPolicy::default(),
            schedule: PayoutSchedule::default(),
            batch_concurrency: 4,
        }
    }
}

impl SettlementConfig {
    /// Reject rates outside [0, 1) and empty worker pools
    pub fn validate(&self) -> Result<()> {
        self.commission.validate()?;
        check_rate("tax_rate", self.tax_rate)?;
        self.retry.validate()?;

        if self.batch_concurrency == 0 {
            return Err(Error::Config("batch_concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Commission policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    /// Base commission rate on every payment
    pub base_rate: Decimal,

    /// Extra rate by carrier grade
    pub grade_rates: GradeRates,

    /// Extra rate by request urgency
    pub urgency_rates: UrgencySurchargeRates,

    /// Floor on the total commission
    pub minimum_commission: Decimal,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            base_rate: dec!(0.05),
            grade_rates: GradeRates::default(),
            urgency_rates: UrgencySurchargeRates::default(),
            minimum_commission: dec!(500),
        }
    }
}

impl CommissionConfig {
    /// Check every rate and the floor
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("base_rate", self.base_rate),
            ("grade_rates.regular", self.grade_rates.regular),
            ("grade_rates.professional", self.grade_rates.professional),
            ("grade_rates.master", self.grade_rates.master),
            ("urgency_rates.normal", self.urgency_rates.normal),
            ("urgency_rates.urgent", self.urgency_rates.urgent),
            ("urgency_rates.very_urgent", self.urgency_rates.very_urgent),
        ];
        for (name, rate) in rates {
            check_rate(name, rate)?;
        }

        if self.minimum_commission.is_sign_negative() {
            return Err(Error::Config(format!(
                "minimum_commission must not be negative, got {}",
                self.minimum_commission
            )));
        }
        Ok(())
    }
}

/// Commission bonus rate per carrier grade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeRates {
    /// Regular carriers
    pub regular: Decimal,
    /// Professional carriers
    pub professional: Decimal,
    /// Master carriers
    pub master: Decimal,
}

impl Default for GradeRates {
    fn default() -> Self {
        Self {
            regular: Decimal::ZERO,
            professional: dec!(0.01),
            master: dec!(0.02),
        }
    }
}

impl GradeRates {
    /// Rate for a grade
    pub fn rate(&self, grade: CarrierTier) -> Decimal {
        match grade {
            CarrierTier::Regular => self.regular,
            CarrierTier::Professional => self.professional,
            CarrierTier::Master => self.master,
        }
    }
}

/// Commission surcharge rate per urgency level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencySurchargeRates {
    /// Normal requests
    pub normal: Decimal,
    /// Urgent requests
    pub urgent: Decimal,
    /// Very urgent requests
    pub very_urgent: Decimal,
}

impl Default for UrgencySurchargeRates {
    fn default() -> Self {
        Self {
            normal: Decimal::ZERO,
            urgent: dec!(0.02),
            very_urgent: dec!(0.03),
        }
    }
}

impl UrgencySurchargeRates {
    /// Rate for an urgency level
    pub fn rate(&self, urgency: UrgencyLevel) -> Decimal {
        match urgency {
            UrgencyLevel::Normal => self.normal,
            UrgencyLevel::Urgent => self.urgent,
            UrgencyLevel::VeryUrgent => self.very_urgent,
        }
    }
}

fn check_rate(name: &str, rate: Decimal) -> Result<()> {
    if rate.is_sign_negative() || rate >= Decimal::ONE {
        return Err(Error::Config(format!("{} must be in [0, 1), got {}", name, rate)));
    }
    Ok(())
}
