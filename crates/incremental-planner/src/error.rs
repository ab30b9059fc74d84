//! The planner's error taxonomy, matching the external request-layer tags
//! the host surface reports.

use geo_primitives::Lla;
use thiserror::Error;

/// Failure kinds the planner can surface. `tag()` maps each one onto the
/// fixed set of external diagnostic tags the request surface reports;
/// several internal-only kinds collapse onto `"unreachable"` there since
/// the host doesn't distinguish the reason a greedy walk gave up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("origin-terminus distance exceeds the request cap")]
    DistanceTooLong,

    #[error("no elevation data available at the origin")]
    NoElevationDataOrigin,

    #[error("no elevation data available at the terminus")]
    NoElevationDataTarget,

    #[error("origin cell is an obstacle (altitude {altitude})")]
    OriginBlocked { altitude: f64 },

    #[error("no traversable path reaches the terminus")]
    Unreachable,

    #[error("greedy stitching re-entered a visited origin ({lon}, {lat})")]
    GreedyLoopDetected { lon: f64, lat: f64 },

    #[error("path reconstruction exceeded the cycle guard")]
    ReconstructionOverflow,

    #[error("{0}")]
    Exception(String),

    /// Greedy stitching could not continue past `path`: the grid around the
    /// last reached origin yielded no further local search. Carries the
    /// trajectory stitched so far, matching the source planner's behavior
    /// of returning its partial `merge_trajectories_smart` result alongside
    /// `ok=False` rather than discarding the walk entirely.
    #[error("greedy stitching stopped before reaching the terminus: {reason}")]
    PartialStitch { path: Vec<Lla>, reason: Box<PlanError> },
}

impl PlanError {
    /// The external diagnostic tag this error reports as, per the request
    /// surface's fixed vocabulary.
    pub fn tag(&self) -> &'static str {
        match self {
            PlanError::InvalidParameters(_) => "invalid_parameters",
            PlanError::DistanceTooLong => "distance_too_long",
            PlanError::NoElevationDataOrigin => "no_elevation_data_origin",
            PlanError::NoElevationDataTarget => "no_elevation_data_target",
            PlanError::OriginBlocked { .. } => "origin_blocked",
            PlanError::Unreachable => "unreachable",
            PlanError::GreedyLoopDetected { .. } => "unreachable",
            PlanError::ReconstructionOverflow => "unreachable",
            PlanError::Exception(_) => "exception",
            PlanError::PartialStitch { reason, .. } => reason.tag(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
