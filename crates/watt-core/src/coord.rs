//! Fixed-point geographic coordinates.
//!
//! Coordinates are stored as `i32` degrees at scale 1e6 (~0.1 m at the
//! equator) to halve memory against `f64` pairs and to make exact equality
//! well-defined for the on-disk format.

use std::fmt;

const DEGREE_TO_RAD: f64 = 0.017_453_292_519_943_295;
const RAD_TO_DEGREE: f64 = 1.0 / DEGREE_TO_RAD;

/// A WGS-84 coordinate at fixed-point scale 1e6.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Coordinate {
    pub lon: i32,
    pub lat: i32,
}

impl Coordinate {
    /// Divide by this to get the floating point encoding.
    pub const PRECISION: f64 = 1e6;

    pub const INVALID: Coordinate = Coordinate { lon: i32::MAX, lat: i32::MAX };

    pub fn from_floating(lon: f64, lat: f64) -> Coordinate {
        Coordinate {
            lon: (lon * Self::PRECISION) as i32,
            lat: (lat * Self::PRECISION) as i32,
        }
    }

    pub fn to_floating(self) -> (f64, f64) {
        (self.lon as f64 / Self::PRECISION, self.lat as f64 / Self::PRECISION)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lon, lat) = self.to_floating();
        write!(f, "{{{lon},{lat}}}")
    }
}

/// Squared euclidean distance in fixed-point degree space.
///
/// Not a metric distance — only usable for nearest-neighbour comparisons
/// over city-scale extents.
#[inline]
pub fn euclid_squared_distance(lhs: Coordinate, rhs: Coordinate) -> i64 {
    let dlat = (lhs.lat - rhs.lat) as i64;
    let dlon = (lhs.lon - rhs.lon) as i64;
    dlat * dlat + dlon * dlon
}

/// Initial bearing from `lhs` to `rhs` in degrees, normalised to `[0, 360)`.
pub fn bearing(lhs: Coordinate, rhs: Coordinate) -> f64 {
    let (lhs_lon, lhs_lat) = lhs.to_floating();
    let (rhs_lon, rhs_lat) = rhs.to_floating();
    let lon_delta = DEGREE_TO_RAD * (rhs_lon - lhs_lon);
    let lat1 = DEGREE_TO_RAD * lhs_lat;
    let lat2 = DEGREE_TO_RAD * rhs_lat;
    let y = lon_delta.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * lon_delta.cos();
    let mut result = RAD_TO_DEGREE * y.atan2(x);

    while result < 0.0 {
        result += 360.0;
    }
    while result >= 360.0 {
        result -= 360.0;
    }

    result
}

/// Haversine great-circle distance in metres.
pub fn haversine_distance(lhs: Coordinate, rhs: Coordinate) -> f64 {
    const EARTH_RADIUS: f64 = 6_372_797.560_856;

    let (ln1, lt1) = lhs.to_floating();
    let (ln2, lt2) = rhs.to_floating();

    let dlat1 = lt1 * DEGREE_TO_RAD;
    let dlong1 = ln1 * DEGREE_TO_RAD;
    let dlat2 = lt2 * DEGREE_TO_RAD;
    let dlong2 = ln2 * DEGREE_TO_RAD;

    let dlong = dlong1 - dlong2;
    let dlat = dlat1 - dlat2;

    let aharv = (dlat / 2.0).sin().powi(2)
        + dlat1.cos() * dlat2.cos() * (dlong / 2.0).sin().powi(2);
    let charv = 2.0 * aharv.sqrt().atan2((1.0 - aharv).sqrt());
    EARTH_RADIUS * charv
}
