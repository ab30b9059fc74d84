//! Straight-line visibility check used to shortcut a leg when the origin
//! and terminus see each other without needing a full A* search.

use elevation_grid::{Grid, RawIndex};
use geo_primitives::Lla;

/// Samples the `origin -> terminus` segment and reports whether every
/// sampled cell is moveable. Sample count scales with the index-space
/// Manhattan distance between `ori_idx` and `ter_idx`, floored at 20 so
/// short hops still get enough samples to catch a thin obstacle.
pub fn straight_check(grid: &Grid, origin: &Lla, terminus: &Lla, ori_idx: RawIndex, ter_idx: RawIndex) -> bool {
    let diff_lon = terminus.lon - origin.lon;
    let diff_lat = terminus.lat - origin.lat;
    let sample_num = ((ori_idx.0 - ter_idx.0).abs() + (ori_idx.1 - ter_idx.1).abs()).max(20);
    let step_lon = diff_lon / sample_num as f64;
    let step_lat = diff_lat / sample_num as f64;

    for k in 1..=sample_num {
        let sample = Lla::new(origin.lon + step_lon * k as f64, origin.lat + step_lat * k as f64, 0.0);
        let idx = grid.get_index_clamped(&sample);
        if !grid.moveable(idx) {
            return false;
        }
    }
    true
}
