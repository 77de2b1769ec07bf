//! Match scoring and ranking
//!
//! Four components, each clamped to [0, 100]:
//!
//! | Component | Formula |
//! |---|---|
//! | Route | `100 - 20 * transfers` (hand-offs lose 10 more and gain facility points) |
//! | Time | `100 - travel minutes` |
//! | Rating | `rating / 5 * 100` |
//! | Responsiveness | `100 - avg response minutes * 10` |
//!
//! The total is their mean, plus a flat bonus for transfer-planner matches.

use crate::{
    config::ScoringConfig,
    types::{ComponentScores, MatchResult, MatchRoute},
};
use std::cmp::Ordering;
use transit_core::{CarrierProfile, DeliveryRequest};

const MAX_SCORE: f64 = 100.0;
const MAX_RATING: f64 = 5.0;

/// Match scorer
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    config: ScoringConfig,
}

impl MatchScorer {
    /// Create new scorer
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one candidate. Pure: no clock, no randomness.
    pub fn score(
        &self,
        carrier: &CarrierProfile,
        request: &DeliveryRequest,
        route: MatchRoute,
    ) -> MatchResult {
        let scores = ComponentScores {
            route: self.route_score(&route),
            time: self.time_score(route.total_minutes()),
            rating: self.rating_score(carrier.rating),
            responsiveness: self.responsiveness_score(carrier.avg_response_minutes),
        };

        let bonus = if route.is_transfer() {
            self.config.transfer_match_bonus
        } else {
            0.0
        };

        MatchResult {
            request_id: request.id,
            carrier_id: carrier.carrier_id.clone(),
            rank: 0,
            total_score: clamp_score(scores.mean() + bonus),
            scores,
            carrier_rating: carrier.rating,
            route,
        }
    }

    /// Route fit
    pub fn route_score(&self, route: &MatchRoute) -> f64 {
        let penalty = self.config.transfer_penalty * f64::from(route.transfer_count());

        match route {
            MatchRoute::Direct { .. } => clamp_score(MAX_SCORE - penalty),
            MatchRoute::Transfer { route, .. } => {
                let base = (MAX_SCORE - penalty - self.config.handoff_penalty).max(0.0);
                let facilities = self.config.facility_bonus * f64::from(route.facilities.count());
                clamp_score(base + facilities)
            }
        }
    }

    /// Linear decay with travel time
    pub fn time_score(&self, total_minutes: u32) -> f64 {
        clamp_score(MAX_SCORE - f64::from(total_minutes))
    }

    /// Rating scaled to 100
    pub fn rating_score(&self, rating: f64) -> f64 {
        clamp_score(rating / MAX_RATING * MAX_SCORE)
    }

    /// Penalises slow responders
    pub fn responsiveness_score(&self, avg_response_minutes: f64) -> f64 {
        clamp_score(MAX_SCORE - avg_response_minutes * self.config.response_minute_penalty)
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_SCORE)
}

/// Ranking order: score descending, rating descending, carrier id ascending
pub fn compare_matches(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| b.carrier_rating.total_cmp(&a.carrier_rating))
        .then_with(|| a.carrier_id.cmp(&b.carrier_id))
}

/// Sort, keep each carrier's best match, truncate to `limit` and number 1..N
pub fn rank_matches(mut matches: Vec<MatchResult>, limit: usize) -> Vec<MatchResult> {
    matches.sort_by(compare_matches);

    let mut seen = std::collections::HashSet::new();
    matches.retain(|m| seen.insert(m.carrier_id.clone()));
    matches.truncate(limit);

    for (index, result) in matches.iter_mut().enumerate() {
        result.rank = index + 1;
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::types::{CarrierRoute, TransferRoute};
    use rust_decimal_macros::dec;
    use transit_core::Facilities;

    fn direct(carrier: &str, transfers: u32, minutes: u32) -> MatchRoute {
        MatchRoute::Direct {
            route: CarrierRoute {
                route_id: format!("r-{}", carrier),
                carrier_id: transit_core::UserId::new(carrier),
                pickup_index: 0,
                dropoff_index: 3,
                reversed: false,
                transfer_count: transfers,
                travel_minutes: minutes,
            },
        }
    }

    fn via_transfer(facilities: Facilities, minutes: u32) -> MatchRoute {
        let first_leg = match direct("giller-b", 0, 3) {
            MatchRoute::Direct { route } => route,
            MatchRoute::Transfer { .. } => unreachable!(),
        };
        MatchRoute::Transfer {
            route: TransferRoute {
                pickup: station("seoul"),
                transfer_station: station("city_hall"),
                dropoff: station("gangnam"),
                first_leg_minutes: 3,
                second_leg_minutes: minutes - 7,
                dwell_minutes: 4,
                total_minutes: minutes,
                transfer_count: 1,
                base_fare: dec!(2400),
                facilities,
                preferred: false,
            },
            first_leg,
            handoff_carriers: vec![transit_core::UserId::new("giller-c")],
        }
    }

    #[test]
    fn test_direct_components() {
        let scorer = MatchScorer::default();
        let result = scorer.score(&carrier("giller-a", 4.5, 2.0), &request("seoul", "gangnam"), direct("giller-a", 0, 30));

        assert_eq!(result.scores.route, 100.0);
        assert_eq!(result.scores.time, 70.0);
        assert_eq!(result.scores.rating, 90.0);
        assert_eq!(result.scores.responsiveness, 80.0);
        assert_eq!(result.total_score, 85.0);
    }

    #[test]
    fn test_transfer_penalty_floors_at_zero() {
        let scorer = MatchScorer::default();
        assert_eq!(scorer.route_score(&direct("a", 1, 10)), 80.0);
        assert_eq!(scorer.route_score(&direct("a", 6, 10)), 0.0);
    }

    #[test]
    fn test_one_transfer_with_all_facilities() {
        let scorer = MatchScorer::default();
        let route = via_transfer(Facilities::all(), 34);

        assert_eq!(scorer.route_score(&route), 85.0);

        let result = scorer.score(&carrier("giller-b", 4.0, 1.0), &request("seoul", "gangnam"), route);
        // mean(85, 66, 80, 90) = 80.25, plus the transfer bonus
        assert_eq!(result.total_score, 90.25);
    }

    #[test]
    fn test_facility_bonus_capped() {
        let scorer = MatchScorer::new(ScoringConfig {
            facility_bonus: 50.0,
            ..Default::default()
        });
        assert_eq!(scorer.route_score(&via_transfer(Facilities::all(), 34)), 100.0);
    }

    #[test]
    fn test_component_floors() {
        let scorer = MatchScorer::default();
        assert_eq!(scorer.time_score(240), 0.0);
        assert_eq!(scorer.responsiveness_score(25.0), 0.0);
        assert_eq!(scorer.rating_score(7.0), 100.0);
        assert_eq!(scorer.rating_score(-1.0), 0.0);
    }

    #[test]
    fn test_total_clamped_with_bonus() {
        let scorer = MatchScorer::new(ScoringConfig {
            transfer_match_bonus: 80.0,
            ..Default::default()
        });
        let result = scorer.score(
            &carrier("giller-b", 5.0, 0.0),
            &request("seoul", "gangnam"),
            via_transfer(Facilities::all(), 10),
        );
        assert_eq!(result.total_score, 100.0);
    }

    #[test]
    fn test_scoring_is_repeatable() {
        let scorer = MatchScorer::default();
        let profile = carrier("giller-a", 3.7, 1.3);
        let req = request("seoul", "gangnam");

        let first = scorer.score(&profile, &req, direct("giller-a", 1, 33));
        let second = scorer.score(&profile, &req, direct("giller-a", 1, 33));
        assert_eq!(first, second);
        assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
    }

    #[test]
    fn test_ranking_tie_breaks() {
        let scorer = MatchScorer::default();
        let req = request("seoul", "gangnam");

        // Same total: 4.0 rating + 1.0 min response vs 5.0 rating + 3.0 min response
        let low_rating = scorer.score(&carrier("giller-b", 4.0, 1.0), &req, direct("giller-b", 0, 30));
        let high_rating = scorer.score(&carrier("giller-c", 5.0, 3.0), &req, direct("giller-c", 0, 30));
        let same_as_b = scorer.score(&carrier("giller-a", 4.0, 1.0), &req, direct("giller-a", 0, 30));
        assert_eq!(low_rating.total_score, high_rating.total_score);

        let ranked = rank_matches(vec![low_rating, same_as_b, high_rating], 10);
        let order: Vec<&str> = ranked.iter().map(|m| m.carrier_id.as_str()).collect();
        assert_eq!(order, vec!["giller-c", "giller-a", "giller-b"]);
        assert_eq!(ranked.iter().map(|m| m.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_ranking_keeps_best_per_carrier() {
        let scorer = MatchScorer::default();
        let req = request("seoul", "gangnam");
        let profile = carrier("giller-a", 4.5, 2.0);

        let slow = scorer.score(&profile, &req, direct("giller-a", 0, 60));
        let fast = scorer.score(&profile, &req, direct("giller-a", 0, 20));

        let ranked = rank_matches(vec![slow, fast], 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].route.total_minutes(), 20);
    }
}
