//! Whole-unit currency rounding

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole currency units, half away from zero
pub fn round_won(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_won(dec!(12.5)), dec!(13));
        assert_eq!(round_won(dec!(12.49)), dec!(12));
        assert_eq!(round_won(dec!(13.5)), dec!(14));
        assert_eq!(round_won(dec!(-12.5)), dec!(-13));
        assert_eq!(round_won(dec!(1400)), dec!(1400));
    }
}
