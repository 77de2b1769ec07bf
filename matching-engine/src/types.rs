//! Matching inputs and results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use transit_core::{CarrierId, Facilities, StationId};
use uuid::Uuid;

/// A declared route that covers a pickup/drop-off pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierRoute {
    /// Route ID
    pub route_id: String,

    /// Owning carrier
    pub carrier_id: CarrierId,

    /// Index of the pickup in the route sequence
    pub pickup_index: usize,

    /// Index of the drop-off in the route sequence
    pub dropoff_index: usize,

    /// Route runs drop-off before pickup
    pub reversed: bool,

    /// Line changes the carrier makes between the two stations
    pub transfer_count: u32,

    /// Travel time between the two stations
    pub travel_minutes: u32,
}

impl CarrierRoute {
    /// Stops between pickup and drop-off
    pub fn hops(&self) -> usize {
        self.pickup_index.abs_diff(self.dropoff_index)
    }
}

/// Two-leg route through a transfer station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRoute {
    /// Pickup station
    pub pickup: StationId,

    /// Hand-off station
    pub transfer_station: StationId,

    /// Drop-off station
    pub dropoff: StationId,

    /// Pickup to transfer station
    pub first_leg_minutes: u32,

    /// Transfer station to drop-off
    pub second_leg_minutes: u32,

    /// Time spent changing at the transfer station
    pub dwell_minutes: u32,

    /// First leg + second leg + dwell
    pub total_minutes: u32,

    /// Transfers on the route
    pub transfer_count: u32,

    /// Base fare banded by total travel time
    pub base_fare: Decimal,

    /// Transfer station facilities
    pub facilities: Facilities,

    /// Requester asked for this transfer station
    pub preferred: bool,
}

/// How a matched carrier would move the package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchRoute {
    /// Carrier's own route covers pickup and drop-off
    Direct {
        /// Covering route
        route: CarrierRoute,
    },
    /// Carrier takes the first leg and hands off at a transfer station
    Transfer {
        /// Planned transfer route
        route: TransferRoute,
        /// Carrier's route covering the first leg
        first_leg: CarrierRoute,
        /// Carriers able to take the second leg
        handoff_carriers: Vec<CarrierId>,
    },
}

impl MatchRoute {
    /// Transfers required
    pub fn transfer_count(&self) -> u32 {
        match self {
            MatchRoute::Direct { route } => route.transfer_count,
            MatchRoute::Transfer { route, .. } => route.transfer_count,
        }
    }

    /// Door-to-door travel time
    pub fn total_minutes(&self) -> u32 {
        match self {
            MatchRoute::Direct { route } => route.travel_minutes,
            MatchRoute::Transfer { route, .. } => route.total_minutes,
        }
    }

    /// Produced by the transfer planner
    pub fn is_transfer(&self) -> bool {
        matches!(self, MatchRoute::Transfer { .. })
    }
}

/// Component scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Route fit
    pub route: f64,
    /// Travel time fit
    pub time: f64,
    /// Carrier rating
    pub rating: f64,
    /// Carrier responsiveness
    pub responsiveness: f64,
}

impl ComponentScores {
    /// Arithmetic mean of the four components
    pub fn mean(&self) -> f64 {
        (self.route + self.time + self.rating + self.responsiveness) / 4.0
    }
}

/// Scored candidate carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Request being matched
    pub request_id: Uuid,

    /// Candidate carrier
    pub carrier_id: CarrierId,

    /// 1-based rank among the request's matches, 0 before ranking
    pub rank: usize,

    /// Composite score in [0, 100]
    pub total_score: f64,

    /// Component scores
    pub scores: ComponentScores,

    /// Carrier rating used for tie-breaking
    pub carrier_rating: f64,

    /// Route details
    pub route: MatchRoute,
}

/// Result of matching one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "matches", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Ranked matches, best first
    Matched(Vec<MatchResult>),
    /// No direct or transfer route reaches the drop-off
    NoRouteAvailable,
}

impl MatchOutcome {
    /// Ranked matches, empty when no route exists
    pub fn matches(&self) -> &[MatchResult] {
        match self {
            MatchOutcome::Matched(matches) => matches,
            MatchOutcome::NoRouteAvailable => &[],
        }
    }

    /// Best match, if any
    pub fn best(&self) -> Option<&MatchResult> {
        self.matches().first()
    }
}
