//! Error types for world tree ingestion and construction.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by [`WorldTree`](crate::WorldTree) operations.
#[derive(Debug, Error)]
pub enum WorldTreeError {
    /// The pending triangle buffer could not grow.
    #[error("out of memory growing the triangle buffer by {requested} triangles")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// The tree was already built; call `clear` first.
    #[error("world tree is already built; clear it before ingesting or building again")]
    AlreadyBuilt,

    /// A zero-area or non-finite triangle was rejected at ingestion.
    #[error("degenerate triangle at index {index} of the ingested slice")]
    DegenerateTriangle { index: usize },

    /// The configuration cannot produce a tree.
    #[error("invalid world tree configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for world tree operations.
pub type Result<T> = std::result::Result<T, WorldTreeError>;
