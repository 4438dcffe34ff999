// ===========================================================================
// Web Mercator Coordinate Conversion
// ===========================================================================
use geo::{Coord, Euclidean, Length, LineString};

pub const EARTH_RADIUS: f64 = 6378137.0;

/// Web Mercator is undefined at the poles; latitudes are clamped here first.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Convert lat/lng (EPSG:4326) to Web Mercator (EPSG:3857)
/// Input: (longitude, latitude) in degrees
/// Output: (x, y) in meters
pub fn lat_lng_to_web_merc(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * ((std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan()).ln();
    (x, y)
}

/// Convert Web Mercator (EPSG:3857) to lat/lng (EPSG:4326)
/// Input: (x, y) in meters
/// Output: (longitude, latitude) in degrees
pub fn web_merc_to_lat_lng(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

pub fn coord_to_web_merc(coord: Coord) -> Coord {
    let (x, y) = lat_lng_to_web_merc(coord.x, coord.y);
    Coord { x, y }
}

pub fn coord_to_lat_lng(coord: Coord) -> Coord {
    let (x, y) = web_merc_to_lat_lng(coord.x, coord.y);
    Coord { x, y }
}

/// Project a lon/lat polyline into Web Mercator meters
pub fn line_to_web_merc(line: &LineString) -> LineString {
    line.coords().map(|c| coord_to_web_merc(*c)).collect()
}

pub fn line_to_lat_lng(line: &LineString) -> LineString {
    line.coords().map(|c| coord_to_lat_lng(*c)).collect()
}

/// Planar length of a polyline, in the units of its coordinates.
pub fn planar_length(line: &LineString) -> f64 {
    Euclidean.length(line)
}

/// Length of a lon/lat polyline measured in Web Mercator, in kilometers.
pub fn web_merc_length_km(line: &LineString) -> f64 {
    planar_length(&line_to_web_merc(line)) / 1000.0
}
