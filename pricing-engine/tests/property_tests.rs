//! Property-based tests for fare invariants
//!
//! - Floor: total fare never drops below the minimum fare
//! - Split: service fee + carrier base earnings == total fare
//! - Earnings: carrier earnings == base earnings + tier bonus
//! - Line items are whole currency units

use pricing_engine::{PricingConfig, PricingEngine, PricingOptions};
use proptest::prelude::*;
use rust_decimal::Decimal;
use transit_core::{CarrierTier, UrgencyLevel};

fn urgency_strategy() -> impl Strategy<Value = UrgencyLevel> {
    prop_oneof![
        Just(UrgencyLevel::Normal),
        Just(UrgencyLevel::Urgent),
        Just(UrgencyLevel::VeryUrgent),
    ]
}

fn tier_strategy() -> impl Strategy<Value = CarrierTier> {
    prop_oneof![
        Just(CarrierTier::Regular),
        Just(CarrierTier::Professional),
        Just(CarrierTier::Master),
    ]
}

/// Either a distance or a travel time
fn options_strategy() -> impl Strategy<Value = PricingOptions> {
    (
        prop_oneof![
            (0.0f64..80.0).prop_map(PricingOptions::for_distance),
            (0u32..180).prop_map(PricingOptions::for_travel_time),
        ],
        urgency_strategy(),
        any::<bool>(),
        0u32..4,
        tier_strategy(),
    )
        .prop_map(|(options, urgency, rush, transfers, tier)| {
            options
                .with_urgency(urgency)
                .with_rush_hour(rush)
                .with_transfers(transfers)
                .with_tier(tier)
        })
}

/// Policies with fares around the floor so the minimum sometimes binds
fn config_strategy() -> impl Strategy<Value = PricingConfig> {
    (500i64..2000, 0i64..1500).prop_map(|(short, discount)| {
        let mut config = PricingConfig::default();
        config.fares.short_fare = Decimal::from(short);
        config.fares.medium_fare = Decimal::from(short + 1000);
        config.fares.long_fare = Decimal::from(short + 2000);
        config.transfer_discount = Decimal::from(discount);
        config
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: total fare is floored and the split always adds up
    #[test]
    fn prop_floor_and_split(config in config_strategy(), options in options_strategy()) {
        let minimum = config.minimum_fare;
        let result = PricingEngine::new(config).price(&options).unwrap();

        prop_assert!(result.total_fare >= minimum);
        prop_assert_eq!(result.service_fee + result.carrier_base_earnings, result.total_fare);
        prop_assert_eq!(result.carrier_earnings, result.carrier_base_earnings + result.tier_bonus);
    }

    /// Property: every recorded amount is a whole currency unit
    #[test]
    fn prop_line_items_whole_units(options in options_strategy()) {
        let result = PricingEngine::new(PricingConfig::default()).price(&options).unwrap();

        for item in result.surcharges.iter().chain(result.adjustments.iter()) {
            prop_assert_eq!(item.amount.fract(), Decimal::ZERO);
        }
        prop_assert_eq!(result.service_fee.fract(), Decimal::ZERO);
    }

    /// Property: raising urgency never lowers the fare
    #[test]
    fn prop_urgency_monotonic(options in options_strategy()) {
        let engine = PricingEngine::new(PricingConfig::default());
        let normal = engine.price(&options.clone().with_urgency(UrgencyLevel::Normal)).unwrap();
        let very = engine.price(&options.with_urgency(UrgencyLevel::VeryUrgent)).unwrap();

        prop_assert!(very.total_fare >= normal.total_fare);
    }
}
