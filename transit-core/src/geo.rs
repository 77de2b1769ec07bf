//! Great-circle distance and nearest-station lookup

use crate::types::{GeoPoint, Station};

const N_DEG_TO_RAD: f64 = 0.017_453_292_38;
const EARTH_RADIUS_IN_KM: f64 = 6_372.797_560_856;

/// Haversine distance between two points, in kilometers
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let longitude_arc = (from.lon - to.lon) * N_DEG_TO_RAD;
    let latitude_arc = (from.lat - to.lat) * N_DEG_TO_RAD;
    let latitude_h = (latitude_arc * 0.5).sin();
    let latitude_h = latitude_h * latitude_h;
    let longitude_h = (longitude_arc * 0.5).sin();
    let longitude_h = longitude_h * longitude_h;
    let tmp = (from.lat * N_DEG_TO_RAD).cos() * (to.lat * N_DEG_TO_RAD).cos();
    EARTH_RADIUS_IN_KM * 2.0 * (latitude_h + tmp * longitude_h).sqrt().asin()
}

/// Closest station to `point` together with its distance in km.
///
/// Equal distances resolve to the lower station id.
pub fn nearest_station<'a, I>(point: &GeoPoint, stations: I) -> Option<(&'a Station, f64)>
where
    I: IntoIterator<Item = &'a Station>,
{
    stations
        .into_iter()
        .map(|station| (station, haversine_km(point, &station.location)))
        .min_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)))
}
