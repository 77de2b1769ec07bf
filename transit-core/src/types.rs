//! Core types for the transit graph and delivery requests

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Station identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(String);

impl StationId {
    /// Create new station ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier, shared by requesters and carriers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Carrier (Giller) identifier
pub type CarrierId = UserId;

/// WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create new point
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Station facility flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilities {
    /// Elevator available
    pub elevator: bool,
    /// Escalator available
    pub escalator: bool,
    /// Restroom available
    pub restroom: bool,
}

impl Facilities {
    /// All facilities present
    pub fn all() -> Self {
        Self {
            elevator: true,
            escalator: true,
            restroom: true,
        }
    }

    /// Number of facilities present
    pub fn count(&self) -> u32 {
        [self.elevator, self.escalator, self.restroom]
            .iter()
            .filter(|present| **present)
            .count() as u32
    }
}

/// Transit station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station ID
    pub id: StationId,

    /// Display name
    pub name: String,

    /// Line codes serving this station
    pub lines: BTreeSet<String>,

    /// Location
    pub location: GeoPoint,

    /// Facilities
    #[serde(default)]
    pub facilities: Facilities,

    /// Time needed to change lines here, if surveyed
    #[serde(default)]
    pub transfer_dwell_minutes: Option<u32>,
}

impl Station {
    /// Create new station on the given lines
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, lines: I, location: GeoPoint) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: StationId::new(id),
            name: name.into(),
            lines: lines.into_iter().map(Into::into).collect(),
            location,
            facilities: Facilities::default(),
            transfer_dwell_minutes: None,
        }
    }

    /// Set facilities
    pub fn with_facilities(mut self, facilities: Facilities) -> Self {
        self.facilities = facilities;
        self
    }

    /// Set transfer dwell time
    pub fn with_dwell_minutes(mut self, minutes: u32) -> Self {
        self.transfer_dwell_minutes = Some(minutes);
        self
    }

    /// Served by two or more lines
    pub fn is_transfer_station(&self) -> bool {
        self.lines.len() >= 2
    }

    /// Shares at least one line with `other`
    pub fn shares_line_with(&self, other: &Station) -> bool {
        !self.lines.is_disjoint(&other.lines)
    }
}

/// Carrier-declared recurring route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route ID
    pub id: String,

    /// Owning carrier
    pub carrier_id: CarrierId,

    /// Stations passed through, in travel order
    pub stations: Vec<StationId>,

    /// Days the route runs. Empty means every day.
    #[serde(default)]
    pub days: Vec<Weekday>,

    /// Usual departure time
    pub departure_time: NaiveTime,

    /// Active flag
    pub active: bool,
}

impl Route {
    /// Index of `station` in the route sequence
    pub fn position(&self, station: &StationId) -> Option<usize> {
        self.stations.iter().position(|s| s == station)
    }

    /// Route runs on the given weekday
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }

    /// Route runs on the date of `at`
    pub fn runs_at(&self, at: NaiveDateTime) -> bool {
        self.runs_on(at.weekday())
    }
}

/// Carrier classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarrierTier {
    /// Regular carrier
    #[default]
    Regular,
    /// Professional carrier
    Professional,
    /// Master carrier
    Master,
}

impl fmt::Display for CarrierTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarrierTier::Regular => write!(f, "REGULAR"),
            CarrierTier::Professional => write!(f, "PROFESSIONAL"),
            CarrierTier::Master => write!(f, "MASTER"),
        }
    }
}

/// Carrier profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierProfile {
    /// Carrier ID
    pub carrier_id: CarrierId,

    /// Average rating (0.0 - 5.0)
    pub rating: f64,

    /// Average time to respond to a match offer
    pub avg_response_minutes: f64,

    /// Tier
    pub tier: CarrierTier,
}

/// Delivery urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    /// No rush
    #[default]
    Normal,
    /// Urgent
    Urgent,
    /// Very urgent
    VeryUrgent,
}

/// Package size class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSize {
    /// Fits in a pocket or small bag
    #[default]
    Small,
    /// Shoebox sized
    Medium,
    /// Needs both hands
    Large,
}

/// Package description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Size class
    pub size: PackageSize,

    /// Weight in kilograms
    pub weight_kg: f64,
}

/// Matching mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Match against carriers' declared recurring routes
    #[default]
    ScheduledRoute,
    /// Match from the requester's current location
    OneTime,
}

/// Delivery request from a Gler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    /// Request ID
    pub id: Uuid,

    /// Requester
    pub requester_id: UserId,

    /// Pickup station. Resolved from `current_location` in one-time mode.
    pub pickup_station: Option<StationId>,

    /// Drop-off station
    pub dropoff_station: StationId,

    /// Package
    pub package: Package,

    /// Urgency
    pub urgency: UrgencyLevel,

    /// Requester's location, required for one-time mode
    pub current_location: Option<GeoPoint>,

    /// Transfer station the requester would like to use
    pub preferred_transfer_station: Option<StationId>,

    /// Matching mode
    pub mode: MatchingMode,

    /// When the package should leave
    pub desired_departure: Option<NaiveDateTime>,
}

impl DeliveryRequest {
    /// New scheduled-route request between two stations
    pub fn between(
        requester_id: UserId,
        pickup: StationId,
        dropoff: StationId,
        package: Package,
        urgency: UrgencyLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester_id,
            pickup_station: Some(pickup),
            dropoff_station: dropoff,
            package,
            urgency,
            current_location: None,
            preferred_transfer_station: None,
            mode: MatchingMode::ScheduledRoute,
            desired_departure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seoul() -> Station {
        Station::new("seoul", "Seoul Station", ["1", "4"], GeoPoint::new(37.5547, 126.9707))
    }

    #[test]
    fn test_transfer_station() {
        let station = seoul();
        assert!(station.is_transfer_station());

        let single = Station::new("hoehyeon", "Hoehyeon", ["4"], GeoPoint::new(37.5585, 126.9782));
        assert!(!single.is_transfer_station());
        assert!(station.shares_line_with(&single));
    }

    #[test]
    fn test_facility_count() {
        assert_eq!(Facilities::default().count(), 0);
        assert_eq!(Facilities::all().count(), 3);

        let partial = Facilities {
            elevator: true,
            ..Default::default()
        };
        assert_eq!(partial.count(), 1);
    }

    #[test]
    fn test_route_schedule() {
        let route = Route {
            id: "r1".to_string(),
            carrier_id: UserId::new("giller-1"),
            stations: vec![StationId::new("a"), StationId::new("b")],
            days: vec![Weekday::Mon, Weekday::Tue],
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            active: true,
        };

        assert!(route.runs_on(Weekday::Mon));
        assert!(!route.runs_on(Weekday::Sun));
        assert_eq!(route.position(&StationId::new("b")), Some(1));
        assert_eq!(route.position(&StationId::new("c")), None);

        let every_day = Route { days: vec![], ..route };
        assert!(every_day.runs_on(Weekday::Sun));
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&UrgencyLevel::VeryUrgent).unwrap();
        assert_eq!(json, "\"VERY_URGENT\"");

        let tier: CarrierTier = serde_json::from_str("\"MASTER\"").unwrap();
        assert_eq!(tier, CarrierTier::Master);
    }
}
