//! Error types for the clustering crate.
//!
//! Configuration problems are caught before any work starts, point-storage
//! failures abort the whole clustering call, and cancellation is reported
//! separately so callers can tell it apart from a real failure.

use std::collections::TryReserveError;

/// Rejected clustering parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `max-distance` was zero, negative, NaN, or infinite.
    #[error("max-distance must be a positive finite number, got {0}")]
    MaxDistance(f64),

    #[error("min-points-per-segment must be positive")]
    MinPointsPerSegment,

    #[error("min-points-per-cluster must be positive")]
    MinPointsPerCluster,

    /// The JSON document could not be decoded into a configuration.
    #[error("malformed cluster config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while inserting into a [`PointSet`](crate::point::PointSet).
#[derive(Debug, thiserror::Error)]
pub enum PointSetError {
    /// Coordinates must be finite to be keyed and bucketed.
    #[error("non-finite coordinate ({x}, {y}, {z})")]
    NonFiniteCoordinate { x: f64, y: f64, z: f64 },

    /// Backing storage could not grow.
    #[error("point storage exhausted: {0}")]
    CapacityExhausted(#[from] TryReserveError),
}

/// Primary error type returned by the clustering entry points.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A point could not be inserted while bucketing or merging. Fatal for
    /// the whole call; no partial cluster list is produced.
    #[error("point insertion failed: {0}")]
    Insert(#[from] PointSetError),

    /// The point's grid cell index is too large to tell neighbouring cells
    /// apart (`|coord / max_distance|` above 2^53).
    #[error("point ({x}, {y}, {z}) has no exact grid cell for max-distance {max_distance}")]
    CellOutOfRange {
        x: f64,
        y: f64,
        z: f64,
        max_distance: f64,
    },

    /// The caller's cancel token fired between merge passes.
    #[error("clustering cancelled after {passes} merge passes")]
    Cancelled { passes: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
