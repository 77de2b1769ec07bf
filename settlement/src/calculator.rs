//! Settlement amounts
//!
//! Turns a payment and its commission into the carrier payout:
//! `earnings = total - platform fee`, `tax = round(earnings * tax_rate)`,
//! `net = earnings - tax`.

use crate::{
    types::{CommissionResult, SettlementAmounts},
    Error, Result,
};
use pricing_engine::round_won;
use rust_decimal::Decimal;

/// Settlement amount calculator
#[derive(Debug, Clone)]
pub struct SettlementCalculator {
    tax_rate: Decimal,
}

impl SettlementCalculator {
    /// Create new calculator
    pub fn new(tax_rate: Decimal) -> Self {
        Self { tax_rate }
    }

    /// Amount breakdown for a payment
    pub fn amounts(&self, commission: &CommissionResult) -> Result<SettlementAmounts> {
        let total_payment = commission.amount;
        let platform_fee = commission.total_commission;

        if platform_fee > total_payment {
            return Err(Error::InvalidInput(format!(
                "commission {} exceeds payment {}",
                platform_fee, total_payment
            )));
        }

        let carrier_earnings = total_payment - platform_fee;
        let tax = round_won(carrier_earnings * self.tax_rate);

        Ok(SettlementAmounts {
            total_payment,
            platform_fee,
            carrier_earnings,
            tax,
            net_amount: carrier_earnings - tax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::CommissionCalculator;
    use crate::types::CommissionInput;
    use rust_decimal_macros::dec;
    use transit_core::{CarrierTier, UrgencyLevel};

    fn commission(amount: Decimal) -> Result<CommissionResult> {
        CommissionCalculator::default().calculate(&CommissionInput {
            amount,
            grade: CarrierTier::Regular,
            urgency: UrgencyLevel::Normal,
        })
    }

    #[test]
    fn test_amounts() {
        let calculator = SettlementCalculator::new(dec!(0.033));
        let amounts = calculator.amounts(&commission(dec!(5000)).unwrap()).unwrap();

        assert_eq!(amounts.platform_fee, dec!(500));
        assert_eq!(amounts.carrier_earnings, dec!(4500));
        // 4500 * 3.3% = 148.5
        assert_eq!(amounts.tax, dec!(149));
        assert_eq!(amounts.net_amount, dec!(4351));
        assert_eq!(
            amounts.net_amount + amounts.tax + amounts.platform_fee,
            amounts.total_payment
        );
    }

    #[test]
    fn test_payment_below_commission_rejected() {
        let calculator = SettlementCalculator::new(dec!(0.033));
        // 300 won still owes the 500 won minimum
        let result = calculator.amounts(&commission(dec!(300)).unwrap());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_payment_equal_to_commission() {
        let calculator = SettlementCalculator::new(dec!(0.033));
        let amounts = calculator.amounts(&commission(dec!(500)).unwrap()).unwrap();
        assert_eq!(amounts.carrier_earnings, dec!(0));
        assert_eq!(amounts.net_amount, dec!(0));
    }
}
