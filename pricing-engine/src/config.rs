//! Pricing policy configuration
//!
//! A policy is an immutable value handed to [`crate::PricingEngine`] at
//! construction, so several policies (e.g. an A/B test) can run side by side.

use crate::{types::FareBand, Error, Result};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use transit_core::{CarrierTier, UrgencyLevel};

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Base fare bands
    pub fares: FareTable,

    /// Rush-hour windows (local time)
    pub rush_hours: Vec<RushHourWindow>,

    /// Rush-hour surcharge rate
    pub rush_hour_rate: Decimal,

    /// Urgency surcharge rates
    pub urgency: UrgencyRates,

    /// Flat discount when the route needs a transfer
    pub transfer_discount: Decimal,

    /// Flat bonus per transfer
    pub transfer_bonus_per_transfer: Decimal,

    /// Carrier tier bonus rates
    pub tier_bonus: TierBonusTable,

    /// Minimum total fare
    pub minimum_fare: Decimal,

    /// Platform service fee rate
    pub service_fee_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fares: FareTable::default(),
            rush_hours: vec![
                RushHourWindow::new(7, 9),
                RushHourWindow::new(18, 20),
            ],
            rush_hour_rate: dec!(0.20),
            urgency: UrgencyRates::default(),
            transfer_discount: dec!(200),
            transfer_bonus_per_transfer: dec!(300),
            tier_bonus: TierBonusTable::default(),
            minimum_fare: dec!(1000),
            service_fee_rate: dec!(0.10),
        }
    }
}

impl PricingConfig {
    /// Check rates and bands are sane
    pub fn validate(&self) -> Result<()> {
        self.fares.validate()?;

        let rates = [
            ("rush_hour_rate", self.rush_hour_rate),
            ("urgency.urgent", self.urgency.urgent),
            ("urgency.very_urgent", self.urgency.very_urgent),
            ("tier_bonus.professional", self.tier_bonus.professional),
            ("tier_bonus.master", self.tier_bonus.master),
            ("service_fee_rate", self.service_fee_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(Error::Config(format!("{} must not be negative", name)));
            }
        }

        if self.service_fee_rate > Decimal::ONE {
            return Err(Error::Config("service_fee_rate above 100%".to_string()));
        }

        if self.transfer_discount < Decimal::ZERO || self.transfer_bonus_per_transfer < Decimal::ZERO {
            return Err(Error::Config(
                "transfer adjustments are magnitudes and must not be negative".to_string(),
            ));
        }

        if self.minimum_fare <= Decimal::ZERO {
            return Err(Error::Config("minimum_fare must be positive".to_string()));
        }

        for window in &self.rush_hours {
            if window.start >= window.end {
                return Err(Error::Config(format!(
                    "rush hour window {}-{} is empty",
                    window.start, window.end
                )));
            }
        }

        Ok(())
    }

    /// `time` falls inside a rush-hour window
    pub fn is_rush_hour(&self, time: NaiveTime) -> bool {
        self.rush_hours.iter().any(|window| window.contains(time))
    }
}

/// Three-band base fare table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FareTable {
    /// Short trip fare
    pub short_fare: Decimal,
    /// Medium trip fare
    pub medium_fare: Decimal,
    /// Long trip fare
    pub long_fare: Decimal,

    /// Upper bound of the short band (km, inclusive)
    pub short_max_km: f64,
    /// Upper bound of the medium band (km, inclusive)
    pub medium_max_km: f64,

    /// Upper bound of the short band (minutes, inclusive)
    pub short_max_minutes: u32,
    /// Upper bound of the medium band (minutes, inclusive)
    pub medium_max_minutes: u32,
}

impl Default for FareTable {
    fn default() -> Self {
        Self {
            short_fare: dec!(1400),
            medium_fare: dec!(2400),
            long_fare: dec!(3400),
            short_max_km: 10.0,
            medium_max_km: 30.0,
            short_max_minutes: 30,
            medium_max_minutes: 60,
        }
    }
}

impl FareTable {
    fn validate(&self) -> Result<()> {
        if self.short_max_km >= self.medium_max_km {
            return Err(Error::Config("distance bands must ascend".to_string()));
        }
        if self.short_max_minutes >= self.medium_max_minutes {
            return Err(Error::Config("time bands must ascend".to_string()));
        }
        if self.short_fare <= Decimal::ZERO
            || self.medium_fare < self.short_fare
            || self.long_fare < self.medium_fare
        {
            return Err(Error::Config("band fares must be positive and ascending".to_string()));
        }
        Ok(())
    }

    /// Band for a distance in km
    pub fn band_for_distance(&self, km: f64) -> FareBand {
        if km <= self.short_max_km {
            FareBand::Short
        } else if km <= self.medium_max_km {
            FareBand::Medium
        } else {
            FareBand::Long
        }
    }

    /// Band for a travel time in minutes
    pub fn band_for_minutes(&self, minutes: u32) -> FareBand {
        if minutes <= self.short_max_minutes {
            FareBand::Short
        } else if minutes <= self.medium_max_minutes {
            FareBand::Medium
        } else {
            FareBand::Long
        }
    }

    /// Fare for a band
    pub fn fare(&self, band: FareBand) -> Decimal {
        match band {
            FareBand::Short => self.short_fare,
            FareBand::Medium => self.medium_fare,
            FareBand::Long => self.long_fare,
        }
    }

    /// Base fare for a trip distance in km
    pub fn base_fare_for_distance(&self, km: f64) -> Decimal {
        self.fare(self.band_for_distance(km))
    }
}

/// Daily surcharge window, start inclusive, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RushHourWindow {
    /// Window start
    pub start: NaiveTime,
    /// Window end
    pub end: NaiveTime,
}

impl RushHourWindow {
    /// Window between two whole hours
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// `time` is inside the window
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// Urgency surcharge rates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyRates {
    /// Urgent
    pub urgent: Decimal,
    /// Very urgent
    pub very_urgent: Decimal,
}

impl Default for UrgencyRates {
    fn default() -> Self {
        Self {
            urgent: dec!(0.20),
            very_urgent: dec!(0.50),
        }
    }
}

impl UrgencyRates {
    /// Rate for a level
    pub fn rate(&self, level: UrgencyLevel) -> Decimal {
        match level {
            UrgencyLevel::Normal => Decimal::ZERO,
            UrgencyLevel::Urgent => self.urgent,
            UrgencyLevel::VeryUrgent => self.very_urgent,
        }
    }
}

/// Carrier tier bonus rates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBonusTable {
    /// Professional tier
    pub professional: Decimal,
    /// Master tier
    pub master: Decimal,
}

impl Default for TierBonusTable {
    fn default() -> Self {
        Self {
            professional: dec!(0.10),
            master: dec!(0.20),
        }
    }
}

impl TierBonusTable {
    /// Rate for a tier
    pub fn rate(&self, tier: CarrierTier) -> Decimal {
        match tier {
            CarrierTier::Regular => Decimal::ZERO,
            CarrierTier::Professional => self.professional,
            CarrierTier::Master => self.master,
        }
    }
}
