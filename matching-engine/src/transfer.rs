//! Transfer route planning
//!
//! Used when no single carrier covers the pickup and drop-off. A transfer
//! station must serve at least one pickup line and one drop-off line, so two
//! carriers can hand the package over there.
//!
//! Base fares are banded on the pickup to drop-off distance, the same input
//! the pricing engine bands a quoted trip on.

use crate::{config::MatchingConfig, types::TransferRoute, Result};
use pricing_engine::FareTable;
use transit_core::{haversine_km, Station, StationDirectory, StationId};

/// Ranks transfer stations between two endpoints
#[derive(Debug, Clone)]
pub struct TransferRoutePlanner {
    config: MatchingConfig,
    fares: FareTable,
}

impl TransferRoutePlanner {
    /// Create new planner
    pub fn new(config: MatchingConfig, fares: FareTable) -> Self {
        Self { config, fares }
    }

    /// Up to `max_transfer_routes` routes, fastest first.
    ///
    /// An empty result means no transfer station qualifies; only unknown
    /// endpoints are errors.
    pub fn plan<G>(
        &self,
        graph: &G,
        pickup: &StationId,
        dropoff: &StationId,
        preferred: Option<&StationId>,
    ) -> Result<Vec<TransferRoute>>
    where
        G: StationDirectory + ?Sized,
    {
        let origin = graph.require_station(pickup)?;
        let destination = graph.require_station(dropoff)?;

        let is_endpoint = |station: &Station| station.id == origin.id || station.id == destination.id;

        // Preferred station goes first and skips the line filter
        let preferred_station = preferred
            .and_then(|id| graph.station(id))
            .filter(|station| !is_endpoint(station));

        let bridges = graph.stations().filter(|station| {
            !is_endpoint(station)
                && station.is_transfer_station()
                && station.shares_line_with(origin)
                && station.shares_line_with(destination)
                && Some(&station.id) != preferred_station.map(|p| &p.id)
        });

        let mut routes: Vec<TransferRoute> = preferred_station
            .into_iter()
            .map(|station| (station, true))
            .chain(bridges.map(|station| (station, false)))
            .filter_map(|(station, is_preferred)| {
                self.build_route(graph, origin, station, destination, is_preferred)
            })
            .collect();

        routes.sort_by(|a, b| {
            a.total_minutes
                .cmp(&b.total_minutes)
                .then_with(|| b.preferred.cmp(&a.preferred))
                .then_with(|| a.transfer_station.cmp(&b.transfer_station))
        });
        routes.truncate(self.config.max_transfer_routes);

        Ok(routes)
    }

    fn build_route<G>(
        &self,
        graph: &G,
        origin: &Station,
        transfer: &Station,
        destination: &Station,
        preferred: bool,
    ) -> Option<TransferRoute>
    where
        G: StationDirectory + ?Sized,
    {
        let first_leg_minutes = graph.travel_minutes(&origin.id, &transfer.id)?;
        let second_leg_minutes = graph.travel_minutes(&transfer.id, &destination.id)?;
        let dwell_minutes = transfer
            .transfer_dwell_minutes
            .unwrap_or(self.config.default_transfer_dwell_minutes);
        let total_minutes = first_leg_minutes + second_leg_minutes + dwell_minutes;
        let trip_km = haversine_km(&origin.location, &destination.location);

        Some(TransferRoute {
            pickup: origin.id.clone(),
            transfer_station: transfer.id.clone(),
            dropoff: destination.id.clone(),
            first_leg_minutes,
            second_leg_minutes,
            dwell_minutes,
            total_minutes,
            transfer_count: 1,
            base_fare: self.fares.base_fare_for_distance(trip_km),
            facilities: transfer.facilities,
            preferred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use rust_decimal_macros::dec;
    use transit_core::{GeoPoint, Station};

    fn planner() -> TransferRoutePlanner {
        TransferRoutePlanner::new(MatchingConfig::default(), FareTable::default())
    }

    #[test]
    fn test_routes_sorted_by_total_time() {
        let graph = transfer_network();
        let routes = planner()
            .plan(&graph, &station("seoul"), &station("gangnam"), None)
            .unwrap();

        let stations: Vec<&str> = routes.iter().map(|r| r.transfer_station.as_str()).collect();
        assert_eq!(stations, vec!["city_hall", "sadang"]);

        let first = &routes[0];
        assert_eq!(first.first_leg_minutes, 3);
        assert_eq!(first.second_leg_minutes, 27);
        assert_eq!(first.dwell_minutes, 4);
        assert_eq!(first.total_minutes, 34);
        // Seoul Station to Gangnam is under 10 km, whatever the detour
        assert_eq!(first.base_fare, dec!(1400));
        assert_eq!(routes[1].base_fare, first.base_fare);

        // Sadang has no surveyed dwell time
        assert_eq!(routes[1].dwell_minutes, 5);
        assert_eq!(routes[1].total_minutes, 35);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let graph = transfer_network();
        let routes = planner()
            .plan(&graph, &station("seoul"), &station("gangnam"), None)
            .unwrap();

        for route in routes {
            assert_eq!(
                route.total_minutes,
                route.first_leg_minutes + route.second_leg_minutes + route.dwell_minutes
            );
        }
    }

    #[test]
    fn test_unknown_leg_discards_station() {
        let mut graph = transfer_network();
        graph.add_station(Station::new("hapjeong", "Hapjeong", ["2", "4"], GeoPoint::new(37.5495, 126.9139)));

        let routes = planner()
            .plan(&graph, &station("seoul"), &station("gangnam"), None)
            .unwrap();
        assert!(routes.iter().all(|r| r.transfer_station.as_str() != "hapjeong"));
    }

    #[test]
    fn test_preferred_station_still_ranked_by_time() {
        let graph = transfer_network();
        let routes = planner()
            .plan(&graph, &station("seoul"), &station("gangnam"), Some(&station("sadang")))
            .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].transfer_station.as_str(), "city_hall");
        assert!(routes[1].preferred);
    }

    #[test]
    fn test_preferred_station_wins_ties() {
        let mut graph = transfer_network();
        graph.set_travel_time("seoul", "sadang", 17);

        let routes = planner()
            .plan(&graph, &station("seoul"), &station("gangnam"), Some(&station("sadang")))
            .unwrap();
        assert_eq!(routes[0].total_minutes, routes[1].total_minutes);
        assert_eq!(routes[0].transfer_station.as_str(), "sadang");
    }

    #[test]
    fn test_no_transfer_station_is_empty_not_error() {
        let graph = transfer_network();
        // Jonggak (line 1) and Euljiro (line 2) are bridged only by City Hall,
        // which has no travel time to Jonggak
        let routes = planner()
            .plan(&graph, &station("jonggak"), &station("euljiro"), None)
            .unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_limit() {
        let graph = transfer_network();
        let planner = TransferRoutePlanner::new(
            MatchingConfig {
                max_transfer_routes: 1,
                ..Default::default()
            },
            FareTable::default(),
        );

        let routes = planner
            .plan(&graph, &station("seoul"), &station("gangnam"), None)
            .unwrap();
        assert_eq!(routes.len(), 1);
    }
}
