//! Octile heuristics, in index space (scaled by the grid's cell gaps) and
//! directly on [`Lla`] coordinates via [`distance`].

use elevation_grid::RawIndex;
use geo_primitives::{distance, Lla};

/// `sqrt(2) - 2`, the diagonal-vs-orthogonal cost difference an octile
/// heuristic folds into the shorter of the two axis spans.
const OCTILE_DIAGONAL: f64 = std::f64::consts::SQRT_2 - 2.0;

/// 8-connected admissible heuristic between two cell indices, scaled by
/// `gap_lon`/`gap_lat` so it's comparable to [`crate::astar::path_plan`]'s
/// step costs (which use the same scaling).
pub fn heuristic8d_idx(gap_lon: f64, gap_lat: f64, a: RawIndex, b: RawIndex) -> f64 {
    let len_lon = (a.0 - b.0).unsigned_abs() as f64 * gap_lon;
    let len_lat = (a.1 - b.1).unsigned_abs() as f64 * gap_lat;
    OCTILE_DIAGONAL * len_lon.min(len_lat) + len_lon + len_lat
}

/// 8-connected heuristic between two geographic points, each axis projected
/// through [`distance`] rather than a flat degree scale.
pub fn heuristic8d_lla(a: &Lla, b: &Lla) -> f64 {
    let len_lon = distance(a.lon, a.lat, b.lon, a.lat);
    let len_lat = distance(a.lon, a.lat, a.lon, b.lat);
    OCTILE_DIAGONAL * len_lon.min(len_lat) + len_lon + len_lat
}

/// 4-connected (Manhattan-on-the-sphere) heuristic between two geographic
/// points. Unused by the search itself; kept as a cheaper alternative for
/// callers that only need a lower bound and not octile tightness.
pub fn heuristic4d_lla(a: &Lla, b: &Lla) -> f64 {
    let len_lon = distance(a.lon, a.lat, b.lon, a.lat);
    let len_lat = distance(a.lon, a.lat, a.lon, b.lat);
    len_lon + len_lat
}
