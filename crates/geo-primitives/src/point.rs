//! The geographic point type shared by every layer of the planner.

use serde::{Deserialize, Serialize};

/// Sentinel below which an altitude reading is considered "missing".
pub const ALT_MISSING_SENTINEL: f64 = -32767.0;

/// A longitude/latitude/altitude triple.
///
/// Two points are considered identical when their longitude and latitude
/// match exactly; altitude does not participate in equality, since the same
/// geographic cell can be queried with slightly different representative
/// altitudes across overlapping grids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lla {
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
}

impl Lla {
    pub fn new(lon: f64, lat: f64, alt: f64) -> Self {
        Self { lon, lat, alt }
    }
}

impl PartialEq for Lla {
    fn eq(&self, other: &Self) -> bool {
        self.lon == other.lon && self.lat == other.lat
    }
}

/// `true` iff `lon` falls within `[-180, 180]`.
pub fn lon_is_valid(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// `true` iff `lat` falls within `[-90, 90]`.
pub fn lat_is_valid(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// `true` iff `alt` is above the missing-data sentinel.
pub fn alt_is_valid(alt: f64) -> bool {
    alt > ALT_MISSING_SENTINEL
}
