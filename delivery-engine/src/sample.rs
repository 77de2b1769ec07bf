//! Sample transit network around central Seoul
//!
//! Used by the demo binary and the integration tests.

use chrono::NaiveTime;
use transit_core::{
    CarrierProfile, CarrierTier, Facilities, GeoPoint, Route, Station, StationId,
    TransitDirectory, UserId,
};

/// Seoul Station, City Hall, Jonggak, Euljiro 1-ga, Sadang and Gangnam with
/// four carriers. Seoul Station and Gangnam share the `SB` express line.
///
/// | Route | Carrier | Path | Departs |
/// |---|---|---|---|
/// | `r-kim` | giller-kim (Professional) | Seoul → Gangnam (express) | 08:00 |
/// | `r-lee` | giller-lee (Regular) | Seoul → City Hall | 08:30 |
/// | `r-park` | giller-park (Master) | City Hall → Euljiro → Gangnam | 18:10 |
/// | `r-choi` | giller-choi (Regular) | Sadang → Gangnam | 07:40 |
pub fn seoul_network() -> TransitDirectory {
    let mut graph = TransitDirectory::new();

    graph
        .add_station(Station::new("seoul", "Seoul Station", ["1", "4", "SB"], GeoPoint::new(37.5547, 126.9707)))
        .add_station(
            Station::new("city_hall", "City Hall", ["1", "2"], GeoPoint::new(37.5657, 126.9769))
                .with_facilities(Facilities::all())
                .with_dwell_minutes(4),
        )
        .add_station(Station::new("jonggak", "Jonggak", ["1"], GeoPoint::new(37.5702, 126.9831)))
        .add_station(Station::new("euljiro", "Euljiro 1-ga", ["2"], GeoPoint::new(37.5660, 126.9826)))
        .add_station(
            Station::new("sadang", "Sadang", ["2", "4"], GeoPoint::new(37.4765, 126.9816))
                .with_facilities(Facilities {
                    elevator: true,
                    ..Default::default()
                }),
        )
        .add_station(Station::new("gangnam", "Gangnam", ["2", "SB"], GeoPoint::new(37.4979, 127.0276)));

    graph
        .set_travel_time("seoul", "gangnam", 22)
        .set_travel_time("seoul", "city_hall", 3)
        .set_travel_time("jonggak", "city_hall", 2)
        .set_travel_time("city_hall", "euljiro", 2)
        .set_travel_time("euljiro", "gangnam", 25)
        .set_travel_time("city_hall", "gangnam", 27)
        .set_travel_time("seoul", "sadang", 18)
        .set_travel_time("sadang", "gangnam", 12);

    graph
        .add_route(route("r-kim", "giller-kim", &["seoul", "gangnam"], (8, 0)))
        .add_route(route("r-lee", "giller-lee", &["seoul", "city_hall"], (8, 30)))
        .add_route(route("r-park", "giller-park", &["city_hall", "euljiro", "gangnam"], (18, 10)))
        .add_route(route("r-choi", "giller-choi", &["sadang", "gangnam"], (7, 40)));

    graph
        .add_carrier(carrier("giller-kim", 4.8, 1.5, CarrierTier::Professional))
        .add_carrier(carrier("giller-lee", 4.2, 3.0, CarrierTier::Regular))
        .add_carrier(carrier("giller-park", 4.9, 0.5, CarrierTier::Master))
        .add_carrier(carrier("giller-choi", 3.9, 2.0, CarrierTier::Regular));

    graph
}

fn route(id: &str, carrier: &str, stations: &[&str], (hour, minute): (u32, u32)) -> Route {
    Route {
        id: id.to_string(),
        carrier_id: UserId::new(carrier),
        stations: stations.iter().map(|s| StationId::new(*s)).collect(),
        days: Vec::new(),
        departure_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
        active: true,
    }
}

fn carrier(id: &str, rating: f64, avg_response_minutes: f64, tier: CarrierTier) -> CarrierProfile {
    CarrierProfile {
        carrier_id: UserId::new(id),
        rating,
        avg_response_minutes,
        tier,
    }
}
