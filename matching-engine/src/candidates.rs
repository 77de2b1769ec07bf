//! Direct candidate discovery
//!
//! A declared route is a direct candidate when its station sequence contains
//! both the pickup and the drop-off, in travel order.

use crate::{config::MatchingConfig, types::CarrierRoute, Result};
use std::collections::BTreeSet;
use transit_core::{
    nearest_station, GeoPoint, Route, RouteDirectory, Station, StationDirectory, StationId,
};

/// Finds routes covering a station pair
#[derive(Debug, Clone)]
pub struct CandidateFinder {
    config: MatchingConfig,
}

impl CandidateFinder {
    /// Create new finder
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Every active route passing `pickup` then `dropoff`.
    ///
    /// Fails with `NotFound` if either station is unknown.
    pub fn find_direct_candidates<G>(
        &self,
        graph: &G,
        pickup: &StationId,
        dropoff: &StationId,
    ) -> Result<Vec<CarrierRoute>>
    where
        G: StationDirectory + RouteDirectory + ?Sized,
    {
        self.find_candidates_where(graph, pickup, dropoff, |_| true)
    }

    /// Like [`Self::find_direct_candidates`], keeping only routes accepted by `filter`
    pub fn find_candidates_where<G, F>(
        &self,
        graph: &G,
        pickup: &StationId,
        dropoff: &StationId,
        filter: F,
    ) -> Result<Vec<CarrierRoute>>
    where
        G: StationDirectory + RouteDirectory + ?Sized,
        F: Fn(&Route) -> bool,
    {
        graph.require_station(pickup)?;
        graph.require_station(dropoff)?;

        let mut candidates: Vec<CarrierRoute> = graph
            .routes()
            .filter(|route| route.active && filter(route))
            .filter_map(|route| self.cover(graph, route, pickup, dropoff))
            .collect();

        candidates.sort_by(|a, b| {
            a.carrier_id
                .cmp(&b.carrier_id)
                .then_with(|| a.route_id.cmp(&b.route_id))
        });

        Ok(candidates)
    }

    /// Nearest station to `point` within the one-time matching radius
    pub fn resolve_nearest_station<'g, G>(&self, graph: &'g G, point: &GeoPoint) -> Result<&'g Station>
    where
        G: StationDirectory + ?Sized,
    {
        let max_km = self.config.max_nearby_station_km;

        match nearest_station(point, graph.stations()) {
            Some((station, distance_km)) if distance_km <= max_km => Ok(station),
            Some((_, distance_km)) => Err(transit_core::Error::NoNearbyStation {
                distance_km,
                max_km,
            }
            .into()),
            None => Err(transit_core::Error::NotFound("no stations loaded".to_string()).into()),
        }
    }

    fn cover<G>(
        &self,
        graph: &G,
        route: &Route,
        pickup: &StationId,
        dropoff: &StationId,
    ) -> Option<CarrierRoute>
    where
        G: StationDirectory + ?Sized,
    {
        let pickup_index = route.position(pickup)?;
        let dropoff_index = route.position(dropoff)?;

        let reversed = dropoff_index < pickup_index;
        if pickup_index == dropoff_index || (reversed && !self.config.allow_reverse_direction) {
            return None;
        }

        let (from, to) = if reversed {
            (dropoff_index, pickup_index)
        } else {
            (pickup_index, dropoff_index)
        };
        let segment = &route.stations[from..=to];

        Some(CarrierRoute {
            route_id: route.id.clone(),
            carrier_id: route.carrier_id.clone(),
            pickup_index,
            dropoff_index,
            reversed,
            transfer_count: line_changes(graph, segment),
            travel_minutes: self.segment_minutes(graph, pickup, dropoff, segment),
        })
    }

    /// Table lookup, then the sum of consecutive stops, then a per-hop estimate
    fn segment_minutes<G>(
        &self,
        graph: &G,
        pickup: &StationId,
        dropoff: &StationId,
        segment: &[StationId],
    ) -> u32
    where
        G: StationDirectory + ?Sized,
    {
        if let Some(minutes) = graph.travel_minutes(pickup, dropoff) {
            return minutes;
        }

        segment
            .windows(2)
            .map(|pair| graph.travel_minutes(&pair[0], &pair[1]))
            .sum::<Option<u32>>()
            .unwrap_or_else(|| {
                let hops = segment.len().saturating_sub(1) as u32;
                hops * self.config.minutes_per_stop
            })
    }
}

/// Line changes needed to ride `segment` end to end.
///
/// Segments whose stations share no line (gaps in station data) are skipped.
fn line_changes<G>(graph: &G, segment: &[StationId]) -> u32
where
    G: StationDirectory + ?Sized,
{
    let mut changes = 0;
    let mut riding: Option<BTreeSet<String>> = None;

    for pair in segment.windows(2) {
        let (Some(a), Some(b)) = (graph.station(&pair[0]), graph.station(&pair[1])) else {
            continue;
        };
        let shared: BTreeSet<String> = a.lines.intersection(&b.lines).cloned().collect();
        if shared.is_empty() {
            continue;
        }

        riding = Some(match riding {
            Some(current) => {
                let still: BTreeSet<String> = current.intersection(&shared).cloned().collect();
                if still.is_empty() {
                    changes += 1;
                    shared
                } else {
                    still
                }
            }
            None => shared,
        });
    }

    changes
}
