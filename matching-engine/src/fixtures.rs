//! Small Seoul network shared by unit tests
//!
//! ```text
//! line 1:  seoul ── city_hall ── jonggak
//! line 2:           city_hall ── euljiro ── gangnam ── sadang
//! line 4:  seoul ──────────────────────────────────── sadang
//! ```

use chrono::NaiveTime;
use transit_core::*;
use uuid::Uuid;

pub fn station(id: &str) -> StationId {
    StationId::new(id)
}

pub fn route(id: &str, carrier: &str, stations: &[&str]) -> Route {
    Route {
        id: id.to_string(),
        carrier_id: UserId::new(carrier),
        stations: stations.iter().map(|s| StationId::new(*s)).collect(),
        days: vec![],
        departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        active: true,
    }
}

pub fn carrier(id: &str, rating: f64, avg_response_minutes: f64) -> CarrierProfile {
    CarrierProfile {
        carrier_id: UserId::new(id),
        rating,
        avg_response_minutes,
        tier: CarrierTier::Regular,
    }
}

/// Stations and travel times without any routes
pub fn seoul_stations() -> TransitDirectory {
    let mut graph = TransitDirectory::new();
    graph
        .add_station(Station::new("seoul", "Seoul Station", ["1", "4"], GeoPoint::new(37.5547, 126.9707)))
        .add_station(
            Station::new("city_hall", "City Hall", ["1", "2"], GeoPoint::new(37.5657, 126.9769))
                .with_facilities(Facilities::all())
                .with_dwell_minutes(4),
        )
        .add_station(Station::new("jonggak", "Jonggak", ["1"], GeoPoint::new(37.5702, 126.9831)))
        .add_station(Station::new("euljiro", "Euljiro 1-ga", ["2"], GeoPoint::new(37.5660, 126.9826)))
        .add_station(Station::new("gangnam", "Gangnam", ["2"], GeoPoint::new(37.4979, 127.0276)))
        .add_station(
            Station::new("sadang", "Sadang", ["2", "4"], GeoPoint::new(37.4765, 126.9816)).with_facilities(
                Facilities {
                    elevator: true,
                    ..Default::default()
                },
            ),
        )
        .set_travel_time("seoul", "city_hall", 3)
        .set_travel_time("city_hall", "euljiro", 2)
        .set_travel_time("euljiro", "gangnam", 25)
        .set_travel_time("city_hall", "gangnam", 27)
        .set_travel_time("seoul", "sadang", 18)
        .set_travel_time("sadang", "gangnam", 12);
    graph
}

/// Network with one direct Seoul Station → Gangnam carrier
pub fn seoul_network() -> TransitDirectory {
    let mut graph = seoul_stations();
    graph
        .add_route(route("r-a", "giller-a", &["seoul", "city_hall", "euljiro", "gangnam"]))
        .add_route(route("r-b", "giller-b", &["seoul", "city_hall"]))
        .add_route(Route {
            active: false,
            ..route("r-x", "giller-x", &["seoul", "gangnam"])
        })
        .add_carrier(carrier("giller-a", 4.5, 2.0))
        .add_carrier(carrier("giller-b", 4.0, 1.0))
        .add_carrier(carrier("giller-x", 5.0, 0.5));
    graph
}

/// Network where Seoul Station → Gangnam needs a hand-off
pub fn transfer_network() -> TransitDirectory {
    let mut graph = seoul_stations();
    graph
        .add_route(route("r-b", "giller-b", &["seoul", "city_hall"]))
        .add_route(route("r-c", "giller-c", &["city_hall", "euljiro", "gangnam"]))
        .add_route(route("r-d", "giller-d", &["seoul", "sadang"]))
        .add_route(route("r-e", "giller-e", &["sadang", "gangnam"]))
        .add_carrier(carrier("giller-b", 4.0, 1.0))
        .add_carrier(carrier("giller-c", 4.8, 3.0))
        .add_carrier(carrier("giller-d", 4.2, 2.0))
        .add_carrier(carrier("giller-e", 3.9, 4.0));
    graph
}

pub fn request(pickup: &str, dropoff: &str) -> DeliveryRequest {
    DeliveryRequest {
        id: Uuid::nil(),
        ..DeliveryRequest::between(
            UserId::new("gler-1"),
            station(pickup),
            station(dropoff),
            Package {
                size: PackageSize::Small,
                weight_kg: 1.0,
            },
            UrgencyLevel::Normal,
        )
    }
}
