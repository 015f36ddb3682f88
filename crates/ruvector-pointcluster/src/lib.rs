//! # ruvector-pointcluster
//!
//! Spatial clustering of 3-D point clouds into the "objects" a manipulation
//! stack reasons about.
//!
//! Points are bucketed into a uniform grid whose cell edge equals the
//! adjacency threshold, sufficiently populated cells become octree-indexed
//! segments, adjacent segments are merged until nothing changes, and merged
//! segments above a size floor are returned as clusters.
//!
//! ## Modules
//!
//! - [`point`]: `Point3D`, the payload-carrying `PointSet`, and its metadata
//! - [`octree`]: bulk-built octree used for adjacency probes
//! - [`clustering`]: bucketing, segments, merge loop, and the `Clusterer`
//! - [`config`]: per-call parameters with JSON loading and validation
//! - [`cancel`]: cooperative cancellation between merge passes
//! - [`error`]: error types
//!
//! ## Quick Start
//!
//! ```rust
//! use ruvector_pointcluster::{cluster, Point3D, PointSet};
//!
//! // Two 25-point patches 1000 units apart, coloured red and blue.
//! let mut cloud = PointSet::new();
//! for i in 0..25 {
//!     let (dx, dy) = ((i % 5) as f64 * 0.5, (i / 5) as f64 * 0.5);
//!     cloud.set(Point3D::new(-dx, -dy, 0.0), [255u8, 0, 0])?;
//!     cloud.set(Point3D::new(1000.0 - dx, -dy, 0.0), [0u8, 0, 255])?;
//! }
//!
//! let clusters = cluster(&cloud, 30.0, 20, 10)?;
//! assert_eq!(clusters.len(), 2);
//! assert!(clusters.iter().all(|c| c.len() == 25));
//! # Ok::<(), ruvector_pointcluster::ClusterError>(())
//! ```

pub mod cancel;
pub mod clustering;
pub mod config;
pub mod error;
pub mod octree;
pub mod point;

pub use cancel::CancelToken;
pub use clustering::{
    bucket_key, bucket_points, cluster, merge_until_quiescent, BucketKey, Cluster, ClusterReport,
    ClusterStats, Clusterer, MergeOutcome, Segment,
};
pub use config::ClusterConfig;
pub use error::{ClusterError, ConfigError, PointSetError, Result};
pub use octree::Octree;
pub use point::{Point3D, PointSet, PointSetMetadata};
