//! 8-connected A* search over an [`elevation_grid::Grid`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use elevation_grid::{CellIndex, Grid};

use crate::heuristic::heuristic8d_idx;

/// The 8 neighbor offsets, walked in the same order the reference planner
/// uses so that equal-cost ties expand in the same sequence.
pub const DIR_8: [(i64, i64); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

fn pack(idx: CellIndex, num_lat: usize) -> usize {
    idx.0 * num_lat + idx.1
}

fn unpack(packed: usize, num_lat: usize) -> CellIndex {
    (packed / num_lat, packed % num_lat)
}

/// An open-set entry ordered by `f`, then by insertion order (FIFO) on ties
/// — matching `heapq`'s behavior when pushing `(f, counter, x, y)` tuples.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    counter: u64,
    pos: CellIndex,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.counter == other.counter
    }
}
impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest (f, counter)
        // pair is popped first.
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.counter.cmp(&self.counter))
    }
}

/// Runs A* from `grid.start` to `grid.end`, returning the index path
/// (inclusive of both ends) and whether it reaches the terminus.
///
/// Returns `([], false)` immediately if the grid hasn't been ingested yet.
pub fn path_plan(grid: &Grid) -> (Vec<CellIndex>, bool) {
    if grid.altitude.is_empty() {
        return (vec![], false);
    }

    let start = grid.start;
    let end = grid.end;
    let num_lat = grid.num_lat;

    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut counter: u64 = 0;

    let start_idx = pack(start, num_lat);
    let mut g_costs: HashMap<usize, f64> = HashMap::new();
    g_costs.insert(start_idx, 0.0);
    let mut parent: HashMap<usize, usize> = HashMap::new();
    parent.insert(start_idx, start_idx);

    let start_raw = (start.0 as i64, start.1 as i64);
    let end_raw = (end.0 as i64, end.1 as i64);
    let start_f = heuristic8d_idx(grid.gap_lon, grid.gap_lat, start_raw, end_raw);
    open.push(OpenEntry {
        f: start_f,
        counter,
        pos: start,
    });
    counter += 1;

    let mut closed: HashSet<usize> = HashSet::new();

    while let Some(OpenEntry { pos: (cx, cy), .. }) = open.pop() {
        let cur_idx = pack((cx, cy), num_lat);
        if closed.contains(&cur_idx) {
            continue;
        }
        if (cx, cy) == end {
            break;
        }
        closed.insert(cur_idx);

        for &(dx, dy) in DIR_8.iter() {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if !grid.is_valid_raw((nx, ny)) {
                continue;
            }
            let next = (nx as usize, ny as usize);
            let n_idx = pack(next, num_lat);
            if closed.contains(&n_idx) {
                continue;
            }
            if !grid.moveable(next) {
                continue;
            }

            let step_cost = heuristic8d_idx(grid.gap_lon, grid.gap_lat, (cx as i64, cy as i64), (nx, ny));
            let tentative_g = g_costs.get(&cur_idx).copied().unwrap_or(f64::INFINITY) + step_cost;

            if tentative_g < g_costs.get(&n_idx).copied().unwrap_or(f64::INFINITY) {
                g_costs.insert(n_idx, tentative_g);
                parent.insert(n_idx, cur_idx);
                let h = heuristic8d_idx(grid.gap_lon, grid.gap_lat, (nx, ny), end_raw);
                open.push(OpenEntry {
                    f: tentative_g + h,
                    counter,
                    pos: next,
                });
                counter += 1;
            }
        }
    }

    let end_idx = pack(end, num_lat);
    if !parent.contains_key(&end_idx) {
        return (vec![], false);
    }

    let mut path = Vec::new();
    let mut cur = end_idx;
    loop {
        path.push(unpack(cur, num_lat));
        if cur == parent[&cur] {
            break;
        }
        cur = parent[&cur];
        if path.len() > grid.num_lon * grid.num_lat + 5 {
            // guards against a cycle in `parent`; shouldn't happen since
            // every insertion strictly improves g, but the reference
            // planner carries the same backstop.
            return (vec![], false);
        }
    }
    path.reverse();
    let ok = path.len() > 1;
    (path, ok)
}
