//! 8-connected A* search, terminus relocation and boundary candidate
//! generation over an [`elevation_grid::Grid`].

pub mod astar;
pub mod error;
pub mod heuristic;
pub mod terminal;
pub mod visibility;

pub use error::{Result, SearchError};

use elevation_grid::{CellIndex, Grid, RawIndex};
use geo_primitives::Lla;

/// Search facade over a [`Grid`]. Composition rather than inheritance: the
/// reference planner subclasses `Grid` directly, but Rust has no
/// implementation inheritance, so the grid is held by value and the search
/// operations are free functions taking `&Grid` underneath.
#[derive(Debug, Clone)]
pub struct AStar {
    pub grid: Grid,
}

impl AStar {
    pub fn new(threshold: f64) -> Self {
        Self {
            grid: Grid::new(threshold),
        }
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn set_start(&mut self, lla: &Lla) {
        self.grid.set_start(lla);
    }

    pub fn set_start_idx(&mut self, idx: RawIndex) {
        self.grid.set_start_idx(idx);
    }

    pub fn set_end(&mut self, lla: &Lla) {
        self.grid.set_end(lla);
    }

    pub fn set_end_idx(&mut self, idx: RawIndex) {
        self.grid.set_end_idx(idx);
    }

    /// Runs A* from `grid.start` to `grid.end`; see [`astar::path_plan`].
    pub fn path_plan(&self) -> (Vec<CellIndex>, bool) {
        astar::path_plan(&self.grid)
    }

    /// Like [`Self::path_plan`], but surfaces an un-ingested grid as
    /// [`SearchError::EmptyGrid`] instead of a silent `([], false)`.
    pub fn path_plan_checked(&self) -> Result<(Vec<CellIndex>, bool)> {
        if self.grid.altitude.is_empty() {
            return Err(SearchError::EmptyGrid);
        }
        Ok(self.path_plan())
    }

    /// [`Self::path_plan`], translated back into geographic coordinates.
    pub fn search(&self) -> (Vec<Lla>, bool) {
        let (path_idx, ok) = self.path_plan();
        if !ok {
            return (vec![], false);
        }
        let path = path_idx
            .into_iter()
            .map(|idx| self.grid.index_to_lla((idx.0 as i64, idx.1 as i64)))
            .collect();
        (path, true)
    }

    pub fn terminal_reset(&self, origin: &Lla, terminus: &Lla, change_direct: bool) -> (CellIndex, bool) {
        terminal::terminal_reset(&self.grid, origin, terminus, change_direct)
    }

    pub fn get_terminal_bound(&self, origin: &Lla, terminus: &Lla) -> Vec<CellIndex> {
        terminal::get_terminal_bound(&self.grid, origin, terminus)
    }

    pub fn straight_check(&self, origin: &Lla, terminus: &Lla, ori_idx: RawIndex, ter_idx: RawIndex) -> bool {
        visibility::straight_check(&self.grid, origin, terminus, ori_idx, ter_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_reaches_a_reachable_terminus() {
        let data: Vec<Lla> = (0..36)
            .map(|i| {
                let x = (i / 6) as f64;
                let y = (i % 6) as f64;
                Lla::new(100.0 + x * 0.01, 30.0 + y * 0.01, 0.0)
            })
            .collect();
        let mut astar = AStar::new(5.0);
        astar.grid.init(&data).unwrap();
        astar.set_start_idx((0, 0));
        astar.set_end_idx((5, 5));
        let (path, ok) = astar.search();
        assert!(ok);
        assert_eq!(path.len(), astar.path_plan().0.len());
    }
}
