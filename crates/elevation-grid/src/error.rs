//! Errors that can occur while ingesting or querying a [`crate::Grid`].

use thiserror::Error;

/// Errors surfaced by grid ingestion and lookup.
#[derive(Error, Debug)]
pub enum GridError {
    /// Ingestion was attempted with no input samples.
    #[error("cannot ingest an empty sample set")]
    EmptySamples,
}

pub type Result<T> = std::result::Result<T, GridError>;
