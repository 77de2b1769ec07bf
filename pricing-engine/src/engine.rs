//! Fare calculation

use crate::{
    config::PricingConfig,
    money::round_won,
    types::*,
    Error, Result,
};
use chrono::NaiveTime;
use rust_decimal::Decimal;

/// Pricing engine
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    /// Create new pricing engine
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Create engine after validating the policy
    pub fn try_new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active policy
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// `time` falls in a rush-hour window
    pub fn is_rush_hour(&self, time: NaiveTime) -> bool {
        self.config.is_rush_hour(time)
    }

    /// Price a trip
    pub fn price(&self, options: &PricingOptions) -> Result<PricingResult> {
        let (band, base_fare) = self.base_fare(options)?;

        let mut fare = base_fare;
        let mut surcharges = Vec::new();
        let mut adjustments = Vec::new();

        // Step 2: rush hour on the running fare
        if options.rush_hour && self.config.rush_hour_rate > Decimal::ZERO {
            let rate = self.config.rush_hour_rate;
            let amount = round_won(fare * rate);
            surcharges.push(LineItem::percentage(LineItemKind::RushHour, rate, amount));
            fare += amount;
        }

        // Step 3: urgency on the fare after rush hour
        let urgency_rate = self.config.urgency.rate(options.urgency);
        if urgency_rate > Decimal::ZERO {
            let amount = round_won(fare * urgency_rate);
            surcharges.push(LineItem::percentage(LineItemKind::Urgency, urgency_rate, amount));
            fare += amount;
        }

        // Step 4: transfer discount and bonus stay separate items
        if options.transfer_count > 0 {
            if self.config.transfer_discount > Decimal::ZERO {
                let amount = -round_won(self.config.transfer_discount);
                adjustments.push(LineItem::flat(LineItemKind::TransferDiscount, amount));
                fare += amount;
            }

            let bonus = round_won(
                self.config.transfer_bonus_per_transfer * Decimal::from(options.transfer_count),
            );
            if bonus > Decimal::ZERO {
                adjustments.push(LineItem::flat(LineItemKind::TransferBonus, bonus));
                fare += bonus;
            }
        }

        // Step 5: tier bonus is paid by the platform, not the requester
        let tier_rate = self.config.tier_bonus.rate(options.carrier_tier);
        let tier_bonus = if tier_rate > Decimal::ZERO {
            let amount = round_won(fare.max(Decimal::ZERO) * tier_rate);
            adjustments.push(LineItem::percentage(LineItemKind::TierBonus, tier_rate, amount));
            amount
        } else {
            Decimal::ZERO
        };

        // Step 6: floor
        let applied_minimum = fare < self.config.minimum_fare;
        let total_fare = if applied_minimum {
            self.config.minimum_fare
        } else {
            fare
        };

        // Step 7: split
        let service_fee = round_won(total_fare * self.config.service_fee_rate);
        let carrier_base_earnings = total_fare - service_fee;

        Ok(PricingResult {
            band,
            base_fare,
            surcharges,
            adjustments,
            total_fare,
            applied_minimum,
            service_fee,
            carrier_base_earnings,
            tier_bonus,
            carrier_earnings: carrier_base_earnings + tier_bonus,
        })
    }

    fn base_fare(&self, options: &PricingOptions) -> Result<(FareBand, Decimal)> {
        let fares = &self.config.fares;

        let band = match (options.distance_km, options.travel_minutes) {
            (Some(km), _) => {
                if !km.is_finite() || km < 0.0 {
                    return Err(Error::InvalidInput(format!("distance {} km", km)));
                }
                fares.band_for_distance(km)
            }
            (None, Some(minutes)) => fares.band_for_minutes(minutes),
            (None, None) => {
                return Err(Error::InvalidInput(
                    "either distance or travel time is required".to_string(),
                ))
            }
        };

        Ok((band, round_won(fares.fare(band))))
    }
}
