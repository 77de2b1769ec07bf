//! Read-only transit graph access
//!
//! The matching engine only ever reads reference data through these traits,
//! so any store (document database, GTFS import, test fixture) can back it.

use crate::{
    types::{CarrierId, CarrierProfile, Route, Station, StationId},
    Error, Result,
};
use std::collections::{BTreeMap, HashMap};

/// Station metadata and travel-time table
pub trait StationDirectory {
    /// Look up a station
    fn station(&self, id: &StationId) -> Option<&Station>;

    /// All stations, in id order
    fn stations(&self) -> Box<dyn Iterator<Item = &Station> + '_>;

    /// Travel time between two stations, if known. Lookups are symmetric.
    fn travel_minutes(&self, from: &StationId, to: &StationId) -> Option<u32>;

    /// Look up a station, failing with `NotFound`
    fn require_station(&self, id: &StationId) -> Result<&Station> {
        self.station(id).ok_or_else(|| Error::station_not_found(id))
    }
}

/// Carrier-declared routes
pub trait RouteDirectory {
    /// All declared routes, active or not
    fn routes(&self) -> Box<dyn Iterator<Item = &Route> + '_>;

    /// Look up a route by id
    fn route(&self, id: &str) -> Option<&Route> {
        self.routes().find(|route| route.id == id)
    }
}

/// Carrier profile snapshots
pub trait CarrierDirectory {
    /// Look up a carrier profile
    fn carrier(&self, id: &CarrierId) -> Option<&CarrierProfile>;
}

/// In-memory transit graph
#[derive(Debug, Clone, Default)]
pub struct TransitDirectory {
    stations: BTreeMap<StationId, Station>,
    routes: Vec<Route>,
    carriers: HashMap<CarrierId, CarrierProfile>,
    travel_times: HashMap<(StationId, StationId), u32>,
}

impl TransitDirectory {
    /// Create empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a station
    pub fn add_station(&mut self, station: Station) -> &mut Self {
        self.stations.insert(station.id.clone(), station);
        self
    }

    /// Add a declared route
    pub fn add_route(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    /// Add or replace a carrier profile
    pub fn add_carrier(&mut self, profile: CarrierProfile) -> &mut Self {
        self.carriers.insert(profile.carrier_id.clone(), profile);
        self
    }

    /// Record travel time between two stations
    pub fn set_travel_time(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        minutes: u32,
    ) -> &mut Self {
        self.travel_times
            .insert((StationId::new(from), StationId::new(to)), minutes);
        self
    }

    /// Number of stations
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

impl StationDirectory for TransitDirectory {
    fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    fn stations(&self) -> Box<dyn Iterator<Item = &Station> + '_> {
        Box::new(self.stations.values())
    }

    fn travel_minutes(&self, from: &StationId, to: &StationId) -> Option<u32> {
        if from == to {
            return Some(0);
        }

        self.travel_times
            .get(&(from.clone(), to.clone()))
            .or_else(|| self.travel_times.get(&(to.clone(), from.clone())))
            .copied()
    }
}

impl RouteDirectory for TransitDirectory {
    fn routes(&self) -> Box<dyn Iterator<Item = &Route> + '_> {
        Box::new(self.routes.iter())
    }
}

impl CarrierDirectory for TransitDirectory {
    fn carrier(&self, id: &CarrierId) -> Option<&CarrierProfile> {
        self.carriers.get(id)
    }
}
