//! Great-circle distance and a simplified quadrant projection.
//!
//! These primitives intentionally stay spherical-earth and axis-aligned:
//! the planner only ever needs (a) a distance metric to rank candidate
//! cells and (b) the sign of an east/north offset to pick a search
//! direction. Neither requires a full ellipsoidal or tangent-plane model.

use crate::point::Lla;

/// Mean earth radius in kilometers, matching the original source.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two lon/lat points, in kilometers, via the
/// haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// Symmetric, zero iff the two points coincide, and monotone in the
/// underlying great-circle separation.
pub fn distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1, lon2, lat2) = (
        lon1.to_radians(),
        lat1.to_radians(),
        lon2.to_radians(),
        lat2.to_radians(),
    );
    let dlon = lon2 - lon1;
    let dlat = lat2 - lat1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// An axis-aligned east/north decomposition, scaled in the same units as
/// [`distance`]. Only the *sign* of each component is meaningful; this is
/// not a true local-tangent-plane (NED) projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ned {
    pub x: f64,
    pub y: f64,
}

/// Decomposes the offset from `origin` to `terminus` into signed east (`x`)
/// and north (`y`) magnitudes, each computed via [`distance`] along a single
/// axis and signed according to which side of `origin` the `terminus` falls.
///
/// Used only to pick a search quadrant when relocating an unreachable
/// terminus — never for metric path cost.
pub fn lla_to_ned(origin: &Lla, terminus: &Lla) -> Ned {
    let mut x = distance(origin.lon, origin.lat, terminus.lon, origin.lat);
    if terminus.lon < origin.lon {
        x = -x;
    }
    let mut y = distance(origin.lon, origin.lat, origin.lon, terminus.lat);
    if terminus.lat < origin.lat {
        y = -y;
    }
    Ned { x, y }
}
