//! Request → match → price
//!
//! The pipeline matches a request, then prices every ranked match for the
//! carrier who would take it. Distance bands the base fare: the great-circle
//! distance between pickup and drop-off stations. The rush-hour flag comes
//! from the desired departure, or the quote time when there is none.

use crate::{config::Config, Error, Result};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use matching_engine::{MatchOutcome, MatchResult, MatchingService};
use pricing_engine::{PricingEngine, PricingOptions, PricingResult};
use serde::{Deserialize, Serialize};
use settlement::{BankAccount, CompletedPayment};
use std::sync::Arc;
use tracing::{debug, info};
use transit_core::{
    haversine_km, CarrierDirectory, DeliveryRequest, RouteDirectory, StationDirectory, StationId,
};
use uuid::Uuid;

/// A ranked match with its fare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Match details
    pub matched: MatchResult,

    /// Fare for this match
    pub pricing: PricingResult,
}

/// Priced matches for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Request ID
    pub request_id: Uuid,

    /// Pickup station used for matching
    pub pickup: StationId,

    /// Great-circle distance between pickup and drop-off
    pub distance_km: f64,

    /// Whether the rush-hour surcharge applies
    pub rush_hour: bool,

    /// Offers in rank order; empty when no route is available
    pub offers: Vec<Offer>,
}

impl Quote {
    /// Top-ranked offer
    pub fn best(&self) -> Option<&Offer> {
        self.offers.first()
    }

    /// No carrier can take the request
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

/// Matching plus pricing over one transit graph
#[derive(Debug)]
pub struct DeliveryPipeline<G> {
    graph: Arc<G>,
    matching: MatchingService<G>,
    pricing: PricingEngine,
}

impl<G> DeliveryPipeline<G>
where
    G: StationDirectory + RouteDirectory + CarrierDirectory,
{
    /// Build the pipeline; fails on invalid configuration
    pub fn new(graph: Arc<G>, config: &Config) -> Result<Self> {
        config.validate()?;

        let pricing = PricingEngine::try_new(config.pricing.clone())?;
        let matching = MatchingService::try_new(
            graph.clone(),
            config.matching.clone(),
            config.pricing.fares.clone(),
        )?;

        Ok(Self {
            graph,
            matching,
            pricing,
        })
    }

    /// Pricing engine
    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Quote at the current local time
    pub fn quote(&self, request: &DeliveryRequest) -> Result<Quote> {
        self.quote_at(request, Local::now().naive_local())
    }

    /// Quote as if requested at `requested_at`
    pub fn quote_at(&self, request: &DeliveryRequest, requested_at: NaiveDateTime) -> Result<Quote> {
        let pickup = self.matching.resolve_pickup(request)?;
        let distance_km = self.distance_km(&pickup, &request.dropoff_station)?;

        let departure = request.desired_departure.unwrap_or(requested_at);
        let rush_hour = self.pricing.is_rush_hour(departure.time());

        let matches = match self.matching.match_request(request)? {
            MatchOutcome::Matched(matches) => matches,
            MatchOutcome::NoRouteAvailable => Vec::new(),
        };

        let offers = matches
            .into_iter()
            .map(|matched| {
                let pricing = self.price_match(request, &matched, distance_km, rush_hour)?;
                Ok(Offer { matched, pricing })
            })
            .collect::<Result<Vec<_>>>()?;

        match offers.first() {
            Some(best) => info!(
                request_id = %request.id,
                offers = offers.len(),
                best_carrier = %best.matched.carrier_id,
                best_fare = %best.pricing.total_fare,
                rush_hour,
                "Quote ready"
            ),
            None => info!(request_id = %request.id, "No offers for request"),
        }

        Ok(Quote {
            request_id: request.id,
            pickup,
            distance_km,
            rush_hour,
            offers,
        })
    }

    /// Fare for one match
    pub fn price_match(
        &self,
        request: &DeliveryRequest,
        matched: &MatchResult,
        distance_km: f64,
        rush_hour: bool,
    ) -> Result<PricingResult> {
        let profile = self.graph.carrier(&matched.carrier_id).ok_or_else(|| {
            Error::Transit(transit_core::Error::NotFound(format!(
                "carrier profile {}",
                matched.carrier_id
            )))
        })?;

        let options = PricingOptions::for_distance(distance_km)
            .with_travel_minutes(matched.route.total_minutes())
            .with_urgency(request.urgency)
            .with_rush_hour(rush_hour)
            .with_transfers(matched.route.transfer_count())
            .with_tier(profile.tier);

        let pricing = self.pricing.price(&options)?;
        debug!(
            request_id = %request.id,
            carrier_id = %matched.carrier_id,
            band = ?pricing.band,
            total_fare = %pricing.total_fare,
            "Match priced"
        );
        Ok(pricing)
    }

    fn distance_km(&self, pickup: &StationId, dropoff: &StationId) -> Result<f64> {
        let from = self.graph.require_station(pickup)?;
        let to = self.graph.require_station(dropoff)?;
        Ok(haversine_km(&from.location, &to.location))
    }
}

/// Payment record for an accepted offer once the delivery completes
pub fn completed_payment(
    request: &DeliveryRequest,
    offer: &Offer,
    grade: transit_core::CarrierTier,
    bank_account: BankAccount,
    confirmed_at: DateTime<Utc>,
) -> CompletedPayment {
    CompletedPayment {
        payment_id: Uuid::new_v4(),
        request_id: request.id,
        carrier_id: offer.matched.carrier_id.clone(),
        carrier_grade: grade,
        urgency: request.urgency,
        amount: offer.pricing.total_fare,
        bank_account,
        confirmed_at,
    }
}
