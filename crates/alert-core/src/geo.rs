//! Pure geographic predicates: bounding-box containment, great-circle
//! distance, radius containment.

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Bounding box of the reference deployment's country (Thailand).
const REGION_NORTH: f64 = 20.5;
const REGION_SOUTH: f64 = 5.6;
const REGION_EAST: f64 = 105.7;
const REGION_WEST: f64 = 97.3;

/// Whether a point lies inside the fixed regional bounding box.
pub fn is_within_region(latitude: f64, longitude: f64) -> bool {
    latitude <= REGION_NORTH
        && latitude >= REGION_SOUTH
        && longitude <= REGION_EAST
        && longitude >= REGION_WEST
}

/// Great-circle distance between two WGS84 points in kilometers, using the
/// standard haversine formula with the mean Earth radius.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Whether two points lie within `radius_km` of each other.
///
/// A negative radius is a caller contract violation and matches nothing;
/// a zero radius matches only zero-distance pairs.
pub fn is_within_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_km: f64) -> bool {
    if radius_km < 0.0 {
        return false;
    }
    haversine_km(lat1, lon1, lat2, lon2) <= radius_km
}
