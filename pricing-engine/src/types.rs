//! Pricing inputs and results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use transit_core::{CarrierTier, UrgencyLevel};

/// Base fare band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FareBand {
    /// Short trip
    Short,
    /// Medium trip
    Medium,
    /// Long trip
    Long,
}

/// What a line item accounts for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// Rush-hour surcharge
    RushHour,
    /// Urgency surcharge
    Urgency,
    /// Discount for routes with a transfer
    TransferDiscount,
    /// Per-transfer bonus
    TransferBonus,
    /// Carrier tier bonus
    TierBonus,
}

/// One traceable policy effect on the fare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Policy that produced the item
    pub kind: LineItemKind,

    /// Rate applied, for percentage items
    pub rate: Option<Decimal>,

    /// Signed amount in whole currency units
    pub amount: Decimal,

    /// Counts toward the requester's fare. Tier bonuses do not.
    pub charged_to_requester: bool,
}

impl LineItem {
    pub(crate) fn percentage(kind: LineItemKind, rate: Decimal, amount: Decimal) -> Self {
        Self {
            kind,
            rate: Some(rate),
            amount,
            charged_to_requester: kind != LineItemKind::TierBonus,
        }
    }

    pub(crate) fn flat(kind: LineItemKind, amount: Decimal) -> Self {
        Self {
            kind,
            rate: None,
            amount,
            charged_to_requester: true,
        }
    }
}

/// Inputs for one fare calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOptions {
    /// Trip distance, preferred for banding
    pub distance_km: Option<f64>,

    /// Travel time, used when distance is unknown
    pub travel_minutes: Option<u32>,

    /// Urgency
    pub urgency: UrgencyLevel,

    /// Request falls in a rush-hour window
    pub rush_hour: bool,

    /// Transfers on the route
    pub transfer_count: u32,

    /// Selected carrier's tier
    pub carrier_tier: CarrierTier,
}

impl PricingOptions {
    /// Price by distance
    pub fn for_distance(km: f64) -> Self {
        Self {
            distance_km: Some(km),
            travel_minutes: None,
            urgency: UrgencyLevel::Normal,
            rush_hour: false,
            transfer_count: 0,
            carrier_tier: CarrierTier::Regular,
        }
    }

    /// Price by travel time
    pub fn for_travel_time(minutes: u32) -> Self {
        Self {
            distance_km: None,
            travel_minutes: Some(minutes),
            ..Self::for_distance(0.0)
        }
    }

    /// Set urgency
    pub fn with_urgency(mut self, urgency: UrgencyLevel) -> Self {
        self.urgency = urgency;
        self
    }

    /// Set rush-hour flag
    pub fn with_rush_hour(mut self, rush_hour: bool) -> Self {
        self.rush_hour = rush_hour;
        self
    }

    /// Set transfer count
    pub fn with_transfers(mut self, count: u32) -> Self {
        self.transfer_count = count;
        self
    }

    /// Set carrier tier
    pub fn with_tier(mut self, tier: CarrierTier) -> Self {
        self.carrier_tier = tier;
        self
    }

    /// Also record travel time alongside a distance
    pub fn with_travel_minutes(mut self, minutes: u32) -> Self {
        self.travel_minutes = Some(minutes);
        self
    }
}

/// Priced fare with its audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Band the base fare came from
    pub band: FareBand,

    /// Base fare
    pub base_fare: Decimal,

    /// Surcharges, in the order applied
    pub surcharges: Vec<LineItem>,

    /// Signed discounts and bonuses, in the order applied
    pub adjustments: Vec<LineItem>,

    /// Fare charged to the requester
    pub total_fare: Decimal,

    /// Minimum fare was the binding constraint
    pub applied_minimum: bool,

    /// Platform service fee
    pub service_fee: Decimal,

    /// Total fare minus service fee
    pub carrier_base_earnings: Decimal,

    /// Tier bonus paid to the carrier
    pub tier_bonus: Decimal,

    /// Base earnings plus tier bonus
    pub carrier_earnings: Decimal,
}

impl PricingResult {
    /// Sum of all surcharges
    pub fn total_surcharges(&self) -> Decimal {
        self.surcharges.iter().map(|item| item.amount).sum()
    }

    /// Find a line item by kind
    pub fn line_item(&self, kind: LineItemKind) -> Option<&LineItem> {
        self.surcharges
            .iter()
            .chain(self.adjustments.iter())
            .find(|item| item.kind == kind)
    }
}
