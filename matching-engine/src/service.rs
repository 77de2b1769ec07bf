//! Request matching
//!
//! Ties the candidate finder, transfer planner and scorer together for one
//! request. Holds no mutable state, so one service can match many requests
//! concurrently.

use crate::{
    candidates::CandidateFinder,
    config::MatchingConfig,
    scoring::{rank_matches, MatchScorer},
    transfer::TransferRoutePlanner,
    types::{CarrierRoute, MatchOutcome, MatchResult, MatchRoute, TransferRoute},
    Error, Result,
};
use pricing_engine::FareTable;
use std::sync::Arc;
use tracing::{debug, info, warn};
use transit_core::{
    CarrierDirectory, CarrierId, DeliveryRequest, MatchingMode, Route, RouteDirectory,
    StationDirectory, StationId,
};

/// Matching service over a transit graph
#[derive(Debug)]
pub struct MatchingService<G> {
    graph: Arc<G>,
    finder: CandidateFinder,
    planner: TransferRoutePlanner,
    scorer: MatchScorer,
    config: MatchingConfig,
}

impl<G> MatchingService<G>
where
    G: StationDirectory + RouteDirectory + CarrierDirectory,
{
    /// Create new matching service
    pub fn new(graph: Arc<G>, config: MatchingConfig, fares: FareTable) -> Self {
        Self {
            graph,
            finder: CandidateFinder::new(config.clone()),
            planner: TransferRoutePlanner::new(config.clone(), fares),
            scorer: MatchScorer::new(config.scoring.clone()),
            config,
        }
    }

    /// Create service after validating the configuration
    pub fn try_new(graph: Arc<G>, config: MatchingConfig, fares: FareTable) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(graph, config, fares))
    }

    /// Transit graph
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Rank carriers for a request
    pub fn match_request(&self, request: &DeliveryRequest) -> Result<MatchOutcome> {
        self.validate(request)?;

        let pickup = self.resolve_pickup(request)?;
        let dropoff = &request.dropoff_station;
        if &pickup == dropoff {
            return Err(Error::InvalidInput(
                "pickup and drop-off resolve to the same station".to_string(),
            ));
        }

        let eligible = |route: &Route| self.route_eligible(route, request);

        let direct = self
            .finder
            .find_candidates_where(self.graph.as_ref(), &pickup, dropoff, eligible)?;

        let matches = if direct.is_empty() {
            debug!(request_id = %request.id, "No direct carrier, planning transfer routes");
            self.match_via_transfers(request, &pickup, dropoff)?
        } else {
            direct
                .into_iter()
                .filter_map(|route| {
                    let carrier_id = route.carrier_id.clone();
                    self.score(&carrier_id, request, MatchRoute::Direct { route })
                })
                .collect()
        };

        let ranked = rank_matches(matches, self.config.max_candidates);
        let Some(best) = ranked.first() else {
            info!(request_id = %request.id, %pickup, %dropoff, "No route available");
            return Ok(MatchOutcome::NoRouteAvailable);
        };

        info!(
            request_id = %request.id,
            matches = ranked.len(),
            best_score = best.total_score,
            "Request matched"
        );

        Ok(MatchOutcome::Matched(ranked))
    }

    /// Pickup station, resolved from the requester's location in one-time mode
    pub fn resolve_pickup(&self, request: &DeliveryRequest) -> Result<StationId> {
        match request.mode {
            MatchingMode::ScheduledRoute => request.pickup_station.clone().ok_or_else(|| {
                Error::InvalidInput("scheduled-route request without pickup station".to_string())
            }),
            MatchingMode::OneTime => {
                let location = request.current_location.as_ref().ok_or_else(|| {
                    Error::InvalidInput("one-time request without current location".to_string())
                })?;
                let station = self
                    .finder
                    .resolve_nearest_station(self.graph.as_ref(), location)?;
                debug!(request_id = %request.id, station = %station.id, "Resolved one-time pickup");
                Ok(station.id.clone())
            }
        }
    }

    fn validate(&self, request: &DeliveryRequest) -> Result<()> {
        let weight = request.package.weight_kg;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::InvalidInput(format!("package weight {} kg", weight)));
        }
        if weight > self.config.max_package_weight_kg {
            return Err(Error::InvalidInput(format!(
                "package weight {} kg exceeds {} kg",
                weight, self.config.max_package_weight_kg
            )));
        }
        Ok(())
    }

    fn route_eligible(&self, route: &Route, request: &DeliveryRequest) -> bool {
        if route.carrier_id == request.requester_id {
            return false;
        }
        match request.desired_departure {
            Some(at) => route.runs_at(at),
            None => true,
        }
    }

    fn match_via_transfers(
        &self,
        request: &DeliveryRequest,
        pickup: &StationId,
        dropoff: &StationId,
    ) -> Result<Vec<MatchResult>> {
        let routes = self.planner.plan(
            self.graph.as_ref(),
            pickup,
            dropoff,
            request.preferred_transfer_station.as_ref(),
        )?;

        let mut matches = Vec::new();
        for transfer in routes {
            matches.extend(self.match_transfer_route(request, transfer)?);
        }
        Ok(matches)
    }

    fn match_transfer_route(
        &self,
        request: &DeliveryRequest,
        transfer: TransferRoute,
    ) -> Result<Vec<MatchResult>> {
        let eligible = |route: &Route| self.route_eligible(route, request);
        let graph = self.graph.as_ref();

        let first_legs =
            self.finder
                .find_candidates_where(graph, &transfer.pickup, &transfer.transfer_station, eligible)?;
        let second_legs =
            self.finder
                .find_candidates_where(graph, &transfer.transfer_station, &transfer.dropoff, eligible)?;

        if first_legs.is_empty() || second_legs.is_empty() {
            debug!(
                station = %transfer.transfer_station,
                first_leg = first_legs.len(),
                second_leg = second_legs.len(),
                "Transfer station lacks carriers on a leg"
            );
            return Ok(Vec::new());
        }

        let mut handoff_carriers: Vec<CarrierId> =
            second_legs.into_iter().map(|leg| leg.carrier_id).collect();
        handoff_carriers.sort();
        handoff_carriers.dedup();

        Ok(first_legs
            .into_iter()
            .filter_map(|first_leg: CarrierRoute| {
                let carrier_id = first_leg.carrier_id.clone();
                let route = MatchRoute::Transfer {
                    route: transfer.clone(),
                    first_leg,
                    handoff_carriers: handoff_carriers.clone(),
                };
                self.score(&carrier_id, request, route)
            })
            .collect())
    }

    fn score(
        &self,
        carrier_id: &CarrierId,
        request: &DeliveryRequest,
        route: MatchRoute,
    ) -> Option<MatchResult> {
        match self.graph.carrier(carrier_id) {
            Some(profile) => Some(self.scorer.score(profile, request, route)),
            None => {
                warn!(carrier_id = %carrier_id, "Carrier has a route but no profile, skipping");
                None
            }
        }
    }
}
