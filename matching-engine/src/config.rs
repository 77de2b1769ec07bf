//! Matching configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// One-time mode only works within this distance of a station
    pub max_nearby_station_km: f64,

    /// Transfer routes kept by the planner
    pub max_transfer_routes: usize,

    /// Ranked matches returned per request
    pub max_candidates: usize,

    /// Dwell time for stations without a surveyed value
    pub default_transfer_dwell_minutes: u32,

    /// Per-hop estimate when the travel-time table has gaps
    pub minutes_per_stop: u32,

    /// Accept routes that pass drop-off before pickup
    pub allow_reverse_direction: bool,

    /// Heaviest package a carrier can be asked to take
    pub max_package_weight_kg: f64,

    /// Scoring weights
    pub scoring: ScoringConfig,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_nearby_station_km: 1.0,
            max_transfer_routes: 5,
            max_candidates: 10,
            default_transfer_dwell_minutes: 5,
            minutes_per_stop: 2,
            allow_reverse_direction: false,
            max_package_weight_kg: 20.0,
            scoring: ScoringConfig::default(),
        }
    }
}

impl MatchingConfig {
    /// Reject limits that would make every match impossible
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(Error::InvalidInput("max_candidates must be at least 1".to_string()));
        }
        let positive = |value: f64| value > 0.0;
        if !positive(self.max_nearby_station_km) || !positive(self.max_package_weight_kg) {
            return Err(Error::InvalidInput(
                "max_nearby_station_km and max_package_weight_kg must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scoring weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Route points lost per transfer
    pub transfer_penalty: f64,

    /// Extra route points lost when two carriers hand off at a transfer station
    pub handoff_penalty: f64,

    /// Route points per transfer-station facility
    pub facility_bonus: f64,

    /// Flat bonus for matches found by the transfer planner
    pub transfer_match_bonus: f64,

    /// Responsiveness points lost per minute of average response time
    pub response_minute_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            transfer_penalty: 20.0,
            handoff_penalty: 10.0,
            facility_bonus: 5.0,
            transfer_match_bonus: 10.0,
            response_minute_penalty: 10.0,
        }
    }
}
