//! Terminus relocation and boundary-candidate generation for legs whose
//! endpoint isn't directly reachable inside the current grid.

use elevation_grid::{CellIndex, Grid};
use geo_primitives::{lla_to_ned, Lla};

use crate::heuristic::heuristic8d_idx;

/// Maps `terminus` to a cell index and, if that cell isn't moveable, walks
/// the grid edge the offset from `origin` points toward to find the nearest
/// moveable cell on that edge.
///
/// Returns `(idx, true)` when a moveable cell was found (the original
/// terminus cell itself, or a relocated one), `(idx, false)` otherwise, in
/// which case `idx` is just the unclamped terminus projection.
///
/// Tries the two boundary directions the offset sign suggests first, then
/// retries both directions reversed — mirroring the reference planner's
/// two-pass fallback exactly, including that its second pass can revisit
/// the same edge the first pass already walked.
pub fn terminal_reset(grid: &Grid, origin: &Lla, terminus: &Lla, change_direct: bool) -> (CellIndex, bool) {
    let ned = lla_to_ned(origin, terminus);
    let mut top = ned.x > 0.0;
    let mut right = ned.y > 0.0;
    if change_direct {
        top = !top;
        right = !right;
    }

    let real_ter_idx = grid.get_index_clamped(terminus);
    let mut ter_idx = real_ter_idx;
    let mut min_dist = i64::MAX;
    let mut flag = grid.moveable(ter_idx);

    let (x0, y0) = real_ter_idx;
    let num_lon = grid.num_lon;
    let num_lat = grid.num_lat;

    if !flag {
        scan_lon_edge(grid, x0, y0, num_lat, right, &mut ter_idx, &mut min_dist, &mut flag);
        if !flag {
            scan_lat_edge(grid, x0, y0, num_lon, top, &mut ter_idx, &mut min_dist, &mut flag);
        }
    }

    if !flag {
        scan_lon_edge(grid, x0, y0, num_lat, !right, &mut ter_idx, &mut min_dist, &mut flag);
        if !flag {
            scan_lat_edge(grid, x0, y0, num_lon, !top, &mut ter_idx, &mut min_dist, &mut flag);
        }
    }

    (ter_idx, flag)
}

/// Scans the row `y0` for the nearest moveable cell, only if `y0` is on the
/// top or bottom edge. `ascending` picks whether lon indices increase or
/// decrease from `x0`.
#[allow(clippy::too_many_arguments)]
fn scan_lon_edge(
    grid: &Grid,
    x0: usize,
    y0: usize,
    num_lat: usize,
    ascending: bool,
    ter_idx: &mut CellIndex,
    min_dist: &mut i64,
    flag: &mut bool,
) {
    if y0 != 0 && y0 != num_lat - 1 {
        return;
    }
    let candidates: Box<dyn Iterator<Item = usize>> = if ascending {
        Box::new(x0..grid.num_lon)
    } else {
        Box::new((0..=x0).rev())
    };
    for i in candidates {
        if grid.moveable((i, y0)) {
            let dist = (i as i64 - x0 as i64).abs();
            if dist < *min_dist {
                *ter_idx = (i, y0);
                *min_dist = dist;
                *flag = true;
            }
            break;
        }
    }
}

/// Scans the column `x0` for the nearest moveable cell, only if `x0` is on
/// the left or right edge. `ascending` picks whether lat indices increase or
/// decrease from `y0`.
#[allow(clippy::too_many_arguments)]
fn scan_lat_edge(
    grid: &Grid,
    x0: usize,
    y0: usize,
    num_lon: usize,
    ascending: bool,
    ter_idx: &mut CellIndex,
    min_dist: &mut i64,
    flag: &mut bool,
) {
    if x0 != 0 && x0 != num_lon - 1 {
        return;
    }
    let candidates: Box<dyn Iterator<Item = usize>> = if ascending {
        Box::new(y0..grid.num_lat)
    } else {
        Box::new((0..=y0).rev())
    };
    for j in candidates {
        if grid.moveable((x0, j)) {
            let dist = (j as i64 - y0 as i64).abs();
            if dist < *min_dist {
                *ter_idx = (x0, j);
                *min_dist = dist;
                *flag = true;
            }
            break;
        }
    }
}

struct Candidate {
    f: f64,
    pos: CellIndex,
}

fn push_candidate(
    grid: &Grid,
    ori_idx: (i64, i64),
    ter_idx_unclamped: (i64, i64),
    pos: CellIndex,
    candidates: &mut Vec<Candidate>,
) {
    if !grid.moveable(pos) {
        return;
    }
    let pos_raw = (pos.0 as i64, pos.1 as i64);
    let g = heuristic8d_idx(grid.gap_lon, grid.gap_lat, ori_idx, pos_raw);
    let h = heuristic8d_idx(grid.gap_lon, grid.gap_lat, ter_idx_unclamped, pos_raw);
    candidates.push(Candidate { f: g + h, pos });
}

/// Generates candidate grid-edge cells to retarget a leg toward, ordered by
/// `origin -> candidate -> terminus` cost (direct terminus first, if it
/// falls inside the grid at all), and with runs of contiguous moveable edge
/// cells collapsed to their first member so the caller doesn't re-plan
/// toward near-duplicate boundary points.
pub fn get_terminal_bound(grid: &Grid, origin: &Lla, terminus: &Lla) -> Vec<CellIndex> {
    let ori_idx = grid.get_index(origin, true);
    let ter_idx_clamped = grid.get_index(terminus, true);
    let ter_idx_unclamped = grid.get_index(terminus, false);

    let mut candidates: Vec<Candidate> = Vec::new();

    if grid.is_in_grid(terminus) {
        let f = heuristic8d_idx(grid.gap_lon, grid.gap_lat, ori_idx, ter_idx_clamped);
        candidates.push(Candidate {
            f,
            pos: (ter_idx_clamped.0 as usize, ter_idx_clamped.1 as usize),
        });
    }

    for lon in 0..grid.num_lon {
        push_candidate(grid, ori_idx, ter_idx_unclamped, (lon, 0), &mut candidates);
    }
    for lon in 0..grid.num_lon {
        push_candidate(grid, ori_idx, ter_idx_unclamped, (lon, grid.num_lat - 1), &mut candidates);
    }
    for lat in 1..grid.num_lat.saturating_sub(1) {
        push_candidate(grid, ori_idx, ter_idx_unclamped, (0, lat), &mut candidates);
    }
    for lat in 1..grid.num_lat.saturating_sub(1) {
        push_candidate(grid, ori_idx, ter_idx_unclamped, (grid.num_lon - 1, lat), &mut candidates);
    }

    candidates.sort_by(|a, b| {
        a.f.partial_cmp(&b.f)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.pos.cmp(&b.pos))
    });

    let mut visited: std::collections::HashSet<CellIndex> = std::collections::HashSet::new();
    let mut result = Vec::new();
    for candidate in candidates {
        let pos = candidate.pos;
        if visited.contains(&pos) {
            continue;
        }
        let (lon, lat) = pos;
        visited.insert(pos);

        if lon == 0 || lon == grid.num_lon - 1 {
            for l_lat in (0..lat).rev() {
                let next = (lon, l_lat);
                if grid.moveable(next) && !visited.contains(&next) {
                    visited.insert(next);
                } else {
                    break;
                }
            }
            for r_lat in (lat + 1)..grid.num_lat {
                let next = (lon, r_lat);
                if grid.moveable(next) && !visited.contains(&next) {
                    visited.insert(next);
                } else {
                    break;
                }
            }
        }

        if lat == 0 || lat == grid.num_lat - 1 {
            for l_lon in (0..lon).rev() {
                let next = (l_lon, lat);
                if grid.moveable(next) && !visited.contains(&next) {
                    visited.insert(next);
                } else {
                    break;
                }
            }
            for r_lon in (lon + 1)..grid.num_lon {
                let next = (r_lon, lat);
                if grid.moveable(next) && !visited.contains(&next) {
                    visited.insert(next);
                } else {
                    break;
                }
            }
        }

        result.push(pos);
    }
    result
}
