//! Great-circle math on a spherical Earth
//!
//! All distances are in nautical miles and all angles in degrees. Positions use
//! `geo::Point` with `x` = longitude and `y` = latitude.

use geo::Point;

/// Mean Earth radius in nautical miles
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Valid latitude range in degrees
pub const MAX_LATITUDE: f64 = 90.0;

/// Valid longitude range in degrees
pub const MAX_LONGITUDE: f64 = 180.0;

/// Haversine distance between two (lat, lon) pairs in nautical miles
#[inline]
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards against a > 1.0 from rounding on antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_NM * c
}

/// Haversine distance between two points in nautical miles
#[inline]
pub fn distance_nm(from: Point<f64>, to: Point<f64>) -> f64 {
    haversine_nm(from.y(), from.x(), to.y(), to.x())
}

/// Initial great-circle bearing from one (lat, lon) pair to another
///
/// # Returns
/// True bearing in degrees, normalized to `[0, 360)`
#[inline]
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    normalize_heading(y.atan2(x).to_degrees())
}

/// Initial great-circle bearing between two points
#[inline]
pub fn bearing_deg(from: Point<f64>, to: Point<f64>) -> f64 {
    initial_bearing_deg(from.y(), from.x(), to.y(), to.x())
}

/// Convert a true bearing to a magnetic heading
///
/// `variation_deg` is positive for easterly variation (magnetic = true - east).
#[inline]
pub fn true_to_magnetic(true_bearing_deg: f64, variation_deg: f64) -> f64 {
    normalize_heading(true_bearing_deg - variation_deg)
}

/// Normalize any angle in degrees to `[0, 360)`
#[inline]
pub fn normalize_heading(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Flight time in minutes for a distance at a ground speed
///
/// Returns 0 when the ground speed is not positive.
#[inline]
pub fn flight_time_minutes(distance_nm: f64, ground_speed_kt: f64) -> f64 {
    if ground_speed_kt <= 0.0 {
        return 0.0;
    }
    distance_nm / ground_speed_kt * 60.0
}

/// Check that a latitude/longitude pair lies within the valid WGS84 ranges
#[inline]
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat)
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lon)
}
