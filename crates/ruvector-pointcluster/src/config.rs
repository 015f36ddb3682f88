//! Clustering parameters.
//!
//! The same three knobs are passed on every call; nothing is global. JSON
//! documents use kebab-case keys:
//!
//! ```json
//! { "max-distance": 30.0, "min-points-per-segment": 20, "min-points-per-cluster": 100 }
//! ```

use crate::error::ConfigError;

use serde::{Deserialize, Serialize};

/// Tuning parameters for [`Clusterer`](crate::clustering::Clusterer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterConfig {
    /// Adjacency threshold. Also the edge length of the bucketing grid.
    pub max_distance: f64,
    /// Buckets with fewer points are dropped before merging.
    pub min_points_per_segment: usize,
    /// Merged segments must hold strictly more points than this to be
    /// reported as clusters.
    pub min_points_per_cluster: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_distance: 30.0,
            min_points_per_segment: 20,
            min_points_per_cluster: 100,
        }
    }
}

impl ClusterConfig {
    pub fn new(
        max_distance: f64,
        min_points_per_segment: usize,
        min_points_per_cluster: usize,
    ) -> Self {
        Self {
            max_distance,
            min_points_per_segment,
            min_points_per_cluster,
        }
    }

    /// Check every parameter, reporting the first one that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(ConfigError::MaxDistance(self.max_distance));
        }
        if self.min_points_per_segment == 0 {
            return Err(ConfigError::MinPointsPerSegment);
        }
        if self.min_points_per_cluster == 0 {
            return Err(ConfigError::MinPointsPerCluster);
        }
        Ok(())
    }

    /// Parse a JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
