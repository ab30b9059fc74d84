//! Geodesy primitives shared across the grid, search and planner crates.
//!
//! Kept deliberately small: a point type, a haversine distance, and the
//! quadrant projection the search layer uses to pick a relocation
//! direction for an unreachable terminus.

pub mod geodesy;
pub mod point;

pub use geodesy::{distance, lla_to_ned, Ned, EARTH_RADIUS_KM};
pub use point::{alt_is_valid, lat_is_valid, lon_is_valid, Lla, ALT_MISSING_SENTINEL};
