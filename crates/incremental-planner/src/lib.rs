//! Greedy incremental path planner: local grid construction plus A* search,
//! repeated and stitched together until a geodetic terminus is reached.

pub mod cache;
pub mod error;
pub mod merge;
pub mod planner;
pub mod source;

pub use cache::{CacheStats, ElevationCache};
pub use error::{PlanError, Result};
pub use planner::{PathPlanner, RasterStrategy};
pub use source::ElevationSource;
