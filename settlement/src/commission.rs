//! Platform commission
//!
//! `total = round(amount * base) + round(amount * grade) + round(amount * urgency)`,
//! floored to the configured minimum. Each part is rounded on its own.

use crate::{
    config::CommissionConfig,
    types::{CommissionInput, CommissionResult},
    Error, Result,
};
use pricing_engine::round_won;

/// Commission calculator
#[derive(Debug, Clone, Default)]
pub struct CommissionCalculator {
    config: CommissionConfig,
}

impl CommissionCalculator {
    /// Create new calculator
    pub fn new(config: CommissionConfig) -> Self {
        Self { config }
    }

    /// Commission policy
    pub fn config(&self) -> &CommissionConfig {
        &self.config
    }

    /// Commission on one payment
    pub fn calculate(&self, input: &CommissionInput) -> Result<CommissionResult> {
        if input.amount <= rust_decimal::Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "payment amount must be positive, got {}",
                input.amount
            )));
        }

        let base_commission = round_won(input.amount * self.config.base_rate);
        let grade_bonus = round_won(input.amount * self.config.grade_rates.rate(input.grade));
        let urgency_surcharge =
            round_won(input.amount * self.config.urgency_rates.rate(input.urgency));

        let computed = base_commission + grade_bonus + urgency_surcharge;
        let applied_minimum = computed < self.config.minimum_commission;
        let total_commission = computed.max(self.config.minimum_commission);

        Ok(CommissionResult {
            amount: input.amount,
            base_commission,
            grade_bonus,
            urgency_surcharge,
            total_commission,
            applied_minimum,
            carrier_net_earnings: input.amount - total_commission,
        })
    }
}
