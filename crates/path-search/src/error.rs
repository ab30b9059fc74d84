//! Errors surfaced by the search layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// [`crate::AStar::path_plan`] was called before the grid was ingested.
    #[error("cannot search an uninitialized grid")]
    EmptyGrid,
}

pub type Result<T> = std::result::Result<T, SearchError>;
