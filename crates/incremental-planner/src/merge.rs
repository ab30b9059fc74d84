//! Trajectory post-processing: stitching segments and collapsing
//! duplicate-adjacent or colinear vertices.

use geo_primitives::{distance, Lla};

/// Default geodesic duplicate-adjacency tolerance for [`merge_trajectories_smart`].
pub const SMART_MERGE_TOL_KM: f64 = 1e-4;
/// Default geodesic duplicate-adjacency tolerance for [`merge_trajectory`].
pub const PER_SEGMENT_DIST_THRESH_KM: f64 = 1e-5;
/// Colinearity tolerance on the lon/lat cross product.
const COLINEAR_TOL: f64 = 1e-6;

/// `true` iff `p1, p2, p3` are colinear in lon/lat space within `tol`.
pub fn is_colinear(p1: &Lla, p2: &Lla, p3: &Lla, tol: f64) -> bool {
    let (dx1, dy1) = (p2.lon - p1.lon, p2.lat - p1.lat);
    let (dx2, dy2) = (p3.lon - p2.lon, p3.lat - p2.lat);
    let cross = dx1 * dy2 - dy1 * dx2;
    cross.abs() < tol
}

/// Concatenates `segments` (stitching adjacent tail/head duplicates),
/// drops near-duplicate successors within `tol`, then drops every
/// interior vertex colinear with its neighbors. Preserves the first and
/// last point.
pub fn merge_trajectories_smart(segments: &[Vec<Lla>], tol: f64) -> Vec<Lla> {
    let mut merged: Vec<Lla> = Vec::new();
    for seg in segments {
        if seg.is_empty() {
            continue;
        }
        if merged.is_empty() {
            merged.extend(seg.iter().copied());
        } else if merged.last() == seg.first() {
            merged.extend(seg.iter().skip(1).copied());
        } else {
            merged.extend(seg.iter().copied());
        }
    }
    if merged.is_empty() {
        return merged;
    }

    let mut filtered = vec![merged[0]];
    for p in &merged[1..] {
        let last = filtered.last().unwrap();
        if distance(last.lon, last.lat, p.lon, p.lat) < tol {
            continue;
        }
        filtered.push(*p);
    }

    if filtered.len() == 1 {
        // A single surviving point still becomes a first+last pair in the
        // reference implementation's `[filtered[0], ..., filtered[-1]]`
        // construction, which duplicates the lone point rather than
        // returning a 1-element trajectory.
        return vec![filtered[0], filtered[0]];
    }
    if filtered.len() == 2 {
        return filtered;
    }
    let mut result = vec![filtered[0]];
    for i in 1..filtered.len() - 1 {
        if is_colinear(&filtered[i - 1], &filtered[i], &filtered[i + 1], COLINEAR_TOL) {
            continue;
        }
        result.push(filtered[i]);
    }
    result.push(*filtered.last().unwrap());
    result
}

/// Filters each segment independently (dropping near-duplicates by
/// `dist_thresh` and colinear interior vertices), then stitches
/// consecutive filtered segments whose tail-head geodesic gap is below
/// `dist_thresh`. Returns the resulting list of disjoint trajectories —
/// segments produced by a contiguous greedy walk always stitch into one.
pub fn merge_trajectory(segments: &[Vec<Lla>], dist_thresh: f64) -> Vec<Vec<Lla>> {
    let mut filtered_segments: Vec<Vec<Lla>> = Vec::new();

    for seg in segments {
        if seg.is_empty() {
            continue;
        }
        let mut new_traj = vec![seg[0]];
        for i in 1..seg.len().saturating_sub(1) {
            let prev = *new_traj.last().unwrap();
            let curr = seg[i];
            let next = seg[i + 1];
            if distance(prev.lon, prev.lat, curr.lon, curr.lat) < dist_thresh {
                continue;
            }
            if is_colinear(&prev, &curr, &next, COLINEAR_TOL) {
                continue;
            }
            new_traj.push(curr);
        }
        new_traj.push(*seg.last().unwrap());
        filtered_segments.push(new_traj);
    }

    let mut final_traj: Vec<Vec<Lla>> = Vec::new();
    for traj in filtered_segments {
        match final_traj.last_mut() {
            Some(last) => {
                let tail = *last.last().unwrap();
                let head = traj[0];
                if distance(tail.lon, tail.lat, head.lon, head.lat) < dist_thresh {
                    last.extend(traj.into_iter().skip(1));
                } else {
                    final_traj.push(traj);
                }
            }
            None => final_traj.push(traj),
        }
    }
    final_traj
}

/// Clamps each point's altitude into `[threshold, 0]` in place — output
/// altitude never exceeds sea level nor drops below the obstacle threshold.
pub fn clamp_altitudes(path: &mut [Lla], threshold: f64) {
    for p in path.iter_mut() {
        p.alt = p.alt.max(threshold).min(0.0);
    }
}
