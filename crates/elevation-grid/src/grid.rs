//! The regular lon/lat elevation grid.

use geo_primitives::Lla;

use crate::error::{GridError, Result};
use crate::ingest::{self, Gaps};

/// A grid cell index, `(x, y)` with `x` the longitude axis and `y` the
/// latitude axis. Not necessarily in-bounds — callers compare raw indices
/// (e.g. to check whether an origin has reached its terminus cell) before
/// clamping them for array access.
pub type RawIndex = (i64, i64);

/// An in-bounds cell index, safe to use for [`Grid::altitude_at`] and
/// friends.
pub type CellIndex = (usize, usize);

fn clamp_i64(x: i64, low: i64, high: i64) -> i64 {
    x.max(low).min(high)
}

/// A regularly-spaced 2D elevation field built from irregular samples.
///
/// Reinitialized (ingestion + allocation) every time the planner re-centers
/// around a new origin; `start`/`end` are set per search and `threshold`
/// determines which cells are obstacles.
#[derive(Debug, Clone)]
pub struct Grid {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub num_lon: usize,
    pub num_lat: usize,
    pub gap_lon: f64,
    pub gap_lat: f64,
    pub altitude: Vec<Vec<f64>>,
    pub threshold: f64,
    pub start: CellIndex,
    pub end: CellIndex,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            num_lon: 0,
            num_lat: 0,
            gap_lon: 0.0,
            gap_lat: 0.0,
            altitude: Vec::new(),
            threshold: -10.0,
            start: (0, 0),
            end: (0, 0),
        }
    }
}

impl Grid {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Ingests `data` using the walking-cursor rasterizer. Fails only when
    /// `data` is empty, leaving `self` untouched.
    pub fn init(&mut self, data: &[Lla]) -> Result<()> {
        if data.is_empty() {
            return Err(GridError::EmptySamples);
        }
        let sanitized = ingest::sanitize(data);
        self.set_bounds_and_shape(data.len(), &sanitized);
        let gaps = Gaps {
            gap_lon: self.gap_lon,
            gap_lat: self.gap_lat,
        };
        self.altitude = ingest::rasterize_walking(
            &sanitized.samples,
            self.min_lon,
            self.max_lon,
            self.min_lat,
            self.max_lat,
            &gaps,
            self.num_lon,
            self.num_lat,
        );
        tracing::debug!(
            num_lon = self.num_lon,
            num_lat = self.num_lat,
            "ingested grid via walking cursor"
        );
        Ok(())
    }

    /// Ingests `data` using the block-hash rasterizer (default block size
    /// 5). Fails only when `data` is empty, leaving `self` untouched.
    pub fn init2(&mut self, data: &[Lla]) -> Result<()> {
        self.init2_with_block_size(data, 5)
    }

    pub fn init2_with_block_size(&mut self, data: &[Lla], block_size: usize) -> Result<()> {
        if data.is_empty() {
            return Err(GridError::EmptySamples);
        }
        let sanitized = ingest::sanitize(data);
        self.set_bounds_and_shape(data.len(), &sanitized);
        let gaps = Gaps {
            gap_lon: self.gap_lon,
            gap_lat: self.gap_lat,
        };
        self.altitude = ingest::rasterize_block_hash(
            data,
            self.min_lon,
            self.min_lat,
            &gaps,
            self.num_lon,
            self.num_lat,
            block_size,
        );
        tracing::debug!(
            num_lon = self.num_lon,
            num_lat = self.num_lat,
            "ingested grid via block hash"
        );
        Ok(())
    }

    fn set_bounds_and_shape(&mut self, n: usize, sanitized: &ingest::Sanitized) {
        self.min_lon = sanitized.min_lon;
        self.max_lon = sanitized.max_lon;
        self.min_lat = sanitized.min_lat;
        self.max_lat = sanitized.max_lat;
        self.num_lon = (n as f64).sqrt().ceil() as usize;
        self.num_lat = self.num_lon;
        let gaps = ingest::compute_gaps(
            self.min_lon,
            self.max_lon,
            self.min_lat,
            self.max_lat,
            self.num_lon,
            self.num_lat,
        );
        self.gap_lon = gaps.gap_lon;
        self.gap_lat = gaps.gap_lat;
    }

    /// Maps a geographic point to a cell index. When `clamp` is `false`,
    /// the raw (possibly out-of-range) index is returned, letting callers
    /// compare positions against a terminus that may sit outside the grid.
    pub fn get_index(&self, lla: &Lla, clamp: bool) -> RawIndex {
        let x = if self.gap_lon != 0.0 {
            ((lla.lon - self.min_lon) / self.gap_lon).round() as i64
        } else {
            0
        };
        let y = if self.gap_lat != 0.0 {
            ((lla.lat - self.min_lat) / self.gap_lat).round() as i64
        } else {
            0
        };
        if clamp {
            (
                clamp_i64(x, 0, self.num_lon as i64 - 1),
                clamp_i64(y, 0, self.num_lat as i64 - 1),
            )
        } else {
            (x, y)
        }
    }

    /// Like [`Grid::get_index`] with `clamp = true`, returned as an
    /// in-bounds [`CellIndex`] suitable for array access.
    pub fn get_index_clamped(&self, lla: &Lla) -> CellIndex {
        let (x, y) = self.get_index(lla, true);
        (x as usize, y as usize)
    }

    /// Reconstructs the cell center and stored altitude for `idx`, clamping
    /// out-of-range components into the grid first.
    pub fn index_to_lla(&self, idx: RawIndex) -> Lla {
        let x = clamp_i64(idx.0, 0, self.num_lon as i64 - 1) as usize;
        let y = clamp_i64(idx.1, 0, self.num_lat as i64 - 1) as usize;
        Lla::new(
            x as f64 * self.gap_lon + self.min_lon,
            y as f64 * self.gap_lat + self.min_lat,
            self.altitude[x][y],
        )
    }

    pub fn altitude_at(&self, idx: CellIndex) -> f64 {
        self.altitude[idx.0][idx.1]
    }

    /// `true` iff `(x, y)` falls within the allocated grid.
    pub fn is_valid_raw(&self, idx: RawIndex) -> bool {
        idx.0 >= 0 && idx.0 < self.num_lon as i64 && idx.1 >= 0 && idx.1 < self.num_lat as i64
    }

    pub fn is_obstacle(&self, idx: CellIndex) -> bool {
        self.altitude_at(idx) > self.threshold
    }

    /// `true` iff `idx` is in-bounds and not an obstacle.
    pub fn moveable(&self, idx: CellIndex) -> bool {
        idx.0 < self.num_lon && idx.1 < self.num_lat && !self.is_obstacle(idx)
    }

    /// `true` iff `idx` is in-bounds (accepting a signed index, e.g. one
    /// produced while scanning neighbors) and not an obstacle.
    pub fn moveable_raw(&self, idx: RawIndex) -> bool {
        self.is_valid_raw(idx) && self.moveable((idx.0 as usize, idx.1 as usize))
    }

    /// `true` iff `lla` falls within the grid's geographic bounding box.
    pub fn is_in_grid(&self, lla: &Lla) -> bool {
        self.min_lon <= lla.lon
            && lla.lon <= self.max_lon
            && self.min_lat <= lla.lat
            && lla.lat <= self.max_lat
    }

    pub fn set_start_idx(&mut self, idx: RawIndex) {
        self.start = self.clamp_to_grid(idx);
    }

    pub fn set_start(&mut self, lla: &Lla) {
        self.start = self.get_index_clamped(lla);
    }

    pub fn set_end_idx(&mut self, idx: RawIndex) {
        self.end = self.clamp_to_grid(idx);
    }

    pub fn set_end(&mut self, lla: &Lla) {
        self.end = self.get_index_clamped(lla);
    }

    fn clamp_to_grid(&self, idx: RawIndex) -> CellIndex {
        let x = clamp_i64(idx.0, 0, (self.num_lon as i64 - 1).max(0));
        let y = clamp_i64(idx.1, 0, (self.num_lat as i64 - 1).max(0));
        (x as usize, y as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid(n: usize) -> (Vec<Lla>, Grid) {
        let data: Vec<Lla> = (0..n)
            .map(|i| Lla::new(100.0 + i as f64 * 0.01, 30.0 + i as f64 * 0.01, i as f64))
            .collect();
        let mut grid = Grid::new(5.0);
        grid.init(&data).unwrap();
        (data, grid)
    }

    #[test]
    fn altitude_comes_from_some_input_sample() {
        let (data, grid) = sample_grid(8);
        let alts: Vec<f64> = data.iter().map(|p| p.alt).collect();
        for i in 0..grid.num_lon {
            for j in 0..grid.num_lat {
                assert!(alts.contains(&grid.altitude[i][j]));
            }
        }
    }

    #[test]
    fn index_round_trip() {
        let (_, grid) = sample_grid(9);
        for x in 0..grid.num_lon {
            for y in 0..grid.num_lat {
                let lla = grid.index_to_lla((x as i64, y as i64));
                assert_eq!(grid.get_index_clamped(&lla), (x, y));
            }
        }
    }

    #[test]
    fn single_sample_grid_has_zero_gaps() {
        let data = vec![Lla::new(12.0, 34.0, 1.0)];
        let mut grid = Grid::new(5.0);
        grid.init(&data).unwrap();
        assert_eq!(grid.num_lon, 1);
        assert_eq!(grid.num_lat, 1);
        assert_eq!(grid.gap_lon, 0.0);
        assert_eq!(grid.gap_lat, 0.0);
    }

    #[test]
    fn empty_ingestion_fails_without_mutating() {
        let mut grid = Grid::new(5.0);
        let before = grid.clone();
        let err = grid.init(&[]).unwrap_err();
        assert!(matches!(err, GridError::EmptySamples));
        assert_eq!(grid.num_lon, before.num_lon);
        assert_eq!(grid.num_lat, before.num_lat);
    }

    #[test]
    fn bounding_box_matches_input_span() {
        let (_, grid) = sample_grid(16);
        assert!((grid.max_lon - grid.min_lon - 0.15).abs() < 1e-9);
        assert!((grid.max_lat - grid.min_lat - 0.15).abs() < 1e-9);
    }

    #[test]
    fn init2_produces_same_shape_as_init() {
        let data: Vec<Lla> = (0..20)
            .map(|i| Lla::new(50.0 + i as f64 * 0.02, 10.0 + i as f64 * 0.015, i as f64 % 6.0))
            .collect();
        let mut a = Grid::new(3.0);
        a.init(&data).unwrap();
        let mut b = Grid::new(3.0);
        b.init2(&data).unwrap();
        assert_eq!(a.num_lon, b.num_lon);
        assert_eq!(a.num_lat, b.num_lat);
    }
}
