//! The incremental planner: repeated local grid construction and A*
//! invocations, stitched together until the terminus is reached.

use std::collections::HashSet;

use geo_primitives::Lla;
use path_search::AStar;

use crate::error::{PlanError, Result};
use crate::merge::{clamp_altitudes, merge_trajectories_smart, merge_trajectory, PER_SEGMENT_DIST_THRESH_KM, SMART_MERGE_TOL_KM};
use crate::source::ElevationSource;

/// Which ingestion rasterizer [`PathPlanner`] uses when (re)building its
/// local grid. Both are part of the contract; callers select by policy —
/// their divergence on ambiguous inputs is intentionally not unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterStrategy {
    Walking,
    BlockHash,
}

fn origin_key(p: &Lla) -> (u64, u64) {
    fn norm(x: f64) -> u64 {
        if x == 0.0 {
            0.0f64.to_bits()
        } else {
            x.to_bits()
        }
    }
    (norm(p.lon), norm(p.lat))
}

/// Greedy incremental planner. Owns a reusable A* instance and the set of
/// previously visited grid-recentering origins (which persists across
/// calls to [`Self::plan_paired_checked`] on the same instance, exactly
/// like the source planner — calling it twice with the same arguments is
/// expected to fail deterministically on the second call via loop
/// detection).
pub struct PathPlanner<S> {
    astar: AStar,
    source: S,
    visited_origins: HashSet<(u64, u64)>,
    strategy: RasterStrategy,
}

impl<S: ElevationSource> PathPlanner<S> {
    pub fn new(source: S) -> Self {
        Self::with_strategy(source, RasterStrategy::Walking)
    }

    pub fn with_strategy(source: S, strategy: RasterStrategy) -> Self {
        Self {
            astar: AStar::new(-10.0),
            source,
            visited_origins: HashSet::new(),
            strategy,
        }
    }

    /// Re-centers the local grid around `lla` by querying the elevation
    /// source and ingesting the result. `false` means "no data": fatal for
    /// the caller.
    async fn update_grid(&mut self, lla: &Lla) -> bool {
        let Some(data) = self.source.query(lla.lon, lla.lat, 3).await else {
            return false;
        };
        if data.is_empty() {
            return false;
        }
        let ingested = match self.strategy {
            RasterStrategy::Walking => self.astar.grid.init(&data),
            RasterStrategy::BlockHash => self.astar.grid.init2(&data),
        };
        ingested.is_ok()
    }

    fn origin_obstacle_error(&self) -> PlanError {
        PlanError::OriginBlocked {
            altitude: self.astar.grid.altitude_at(self.astar.grid.start),
        }
    }

    /// Builds a grid around `start`, points A* at `start`/`end`, then tries
    /// [`AStar::get_terminal_bound`] candidates in order until one yields a
    /// successful search. Returns the segment and its tail point.
    async fn local_search(&mut self, start: &Lla, end: &Lla) -> Result<(Vec<Lla>, Lla)> {
        if !self.update_grid(start).await {
            return Err(PlanError::NoElevationDataOrigin);
        }
        self.astar.set_start(start);
        self.astar.set_end(end);
        if !self.astar.grid.moveable(self.astar.grid.start) {
            return Err(self.origin_obstacle_error());
        }

        for candidate in self.astar.get_terminal_bound(start, end) {
            self.astar
                .set_end_idx((candidate.0 as i64, candidate.1 as i64));
            let (path, ok) = self.astar.search();
            if ok && !path.is_empty() {
                let next_point = *path.last().expect("non-empty path has a last point");
                return Ok((path, next_point));
            }
        }
        Err(PlanError::Unreachable)
    }

    /// Single-grid path: re-centers only when the terminus is outside the
    /// current grid, relocating the terminus with [`AStar::terminal_reset`]
    /// rather than trying boundary candidates. Tuple form of
    /// [`Self::plan_simple_checked`] for parity with the reference API.
    pub async fn plan_simple(&mut self, origin: &Lla, terminus: &Lla, threshold: f64) -> (Vec<Lla>, bool) {
        match self.plan_simple_checked(origin, terminus, threshold).await {
            Ok(path) => (path, true),
            Err(_) => (vec![], false),
        }
    }

    pub async fn plan_simple_checked(&mut self, origin: &Lla, terminus: &Lla, threshold: f64) -> Result<Vec<Lla>> {
        if origin == terminus {
            return Ok(vec![*origin]);
        }
        self.astar.grid.threshold = threshold;
        let mut cur_ori = *origin;

        if !self.update_grid(&cur_ori).await {
            return Err(PlanError::NoElevationDataOrigin);
        }
        self.astar.set_start(&cur_ori);
        self.astar.set_end(terminus);
        if !self.astar.grid.moveable(self.astar.grid.start) {
            return Err(self.origin_obstacle_error());
        }
        let (new_ter_idx, _) = self.astar.terminal_reset(&cur_ori, terminus, false);
        self.astar.set_end_idx((new_ter_idx.0 as i64, new_ter_idx.1 as i64));

        let mut segments: Vec<Vec<Lla>> = Vec::new();
        let (path, ok) = self.astar.search();
        if !ok {
            return Err(PlanError::Unreachable);
        }
        cur_ori = *path.last().expect("ok path is non-empty");
        segments.push(path);

        while !self.astar.grid.is_in_grid(terminus) {
            if !self.update_grid(&cur_ori).await {
                return Err(PlanError::NoElevationDataOrigin);
            }
            self.astar.set_start(&cur_ori);
            self.astar.set_end(terminus);
            if !self.astar.grid.moveable(self.astar.grid.start) {
                return Err(self.origin_obstacle_error());
            }
            let (new_ter_idx, _) = self.astar.terminal_reset(&cur_ori, terminus, false);
            self.astar.set_end_idx((new_ter_idx.0 as i64, new_ter_idx.1 as i64));

            let (path, ok) = self.astar.search();
            if !ok {
                return Err(PlanError::Unreachable);
            }
            cur_ori = *path.last().expect("ok path is non-empty");
            segments.push(path);
        }

        // `merge_trajectory` returns one trajectory per disjoint run; since
        // every segment here starts exactly where the previous one ended,
        // they always stitch into a single trajectory.
        let trajectories = merge_trajectory(&segments, PER_SEGMENT_DIST_THRESH_KM);
        Ok(trajectories.into_iter().next().unwrap_or_default())
    }

    /// Greedy boundary-stitched path: the default planning strategy for
    /// external callers. Tuple form of [`Self::plan_paired_checked`].
    pub async fn plan_paired(&mut self, origin: &Lla, terminus: &Lla, threshold: f64) -> (Vec<Lla>, bool) {
        match self.plan_paired_checked(origin, terminus, threshold).await {
            Ok(path) => (path, true),
            Err(PlanError::PartialStitch { path, .. }) => (path, false),
            Err(_) => (vec![], false),
        }
    }

    pub async fn plan_paired_checked(&mut self, origin: &Lla, terminus: &Lla, threshold: f64) -> Result<Vec<Lla>> {
        if origin == terminus {
            return Ok(vec![*origin]);
        }
        self.astar.grid.threshold = threshold;

        let mut cur_ori = *origin;
        self.visited_origins.insert(origin_key(&cur_ori));

        let (first_path, next) = self.local_search(&cur_ori, terminus).await?;
        let mut segments = vec![first_path];
        cur_ori = next;

        // A later `local_search` failure stops the walk but does not
        // discard the segments already stitched, matching the reference
        // planner: only a first-call failure returns empty-handed.
        let mut stall: Option<PlanError> = None;

        loop {
            let key = origin_key(&cur_ori);
            if self.visited_origins.contains(&key) {
                return Err(PlanError::GreedyLoopDetected {
                    lon: cur_ori.lon,
                    lat: cur_ori.lat,
                });
            }
            self.visited_origins.insert(key);

            if self.astar.grid.get_index(&cur_ori, false) == self.astar.grid.get_index(terminus, false) {
                break;
            }

            match self.local_search(&cur_ori, terminus).await {
                Ok((path, next)) => {
                    segments.push(path);
                    cur_ori = next;
                }
                Err(e) => {
                    stall = Some(e);
                    break;
                }
            }

            if self.astar.grid.get_index(&cur_ori, false) == self.astar.grid.get_index(terminus, false) {
                break;
            }
        }

        let mut merged = merge_trajectories_smart(&segments, SMART_MERGE_TOL_KM);
        clamp_altitudes(&mut merged, threshold);

        match stall {
            Some(reason) => Err(PlanError::PartialStitch { path: merged, reason: Box::new(reason) }),
            None => Ok(merged),
        }
    }
}
