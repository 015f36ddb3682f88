//! Grid-bucketed point clustering with iterative segment merging.
//!
//! The engine runs four stages:
//!
//! 1. **Bucketing.** Every point goes into the grid cell
//!    `(ceil(x/d), ceil(y/d), ceil(z/d))` where `d` is `max_distance`. Two
//!    points closer than `d` always land in the same or neighbouring cells.
//! 2. **Segments.** Each cell holding at least `min_points_per_segment`
//!    points becomes a [`Segment`] (an octree-indexed point set); smaller
//!    cells are dropped.
//! 3. **Merge loop.** Pairs of adjacent segments (some pair of points closer
//!    than `d`) are merged and re-indexed. Passes repeat until one full pass
//!    merges nothing.
//! 4. **Filter.** Segments holding more than `min_points_per_cluster` points
//!    are returned as clusters.
//!
//! Output membership is deterministic: buckets are visited in key order, and
//! the parallel segment build preserves that order.

use crate::cancel::CancelToken;
use crate::config::ClusterConfig;
use crate::error::{ClusterError, ConfigError, Result};
use crate::octree::Octree;
use crate::point::{Point3D, PointSet, PointSetMetadata};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, trace, warn};

/// Bucket count at which segment indexes are built on the rayon pool.
const PARALLEL_BUILD_THRESHOLD: usize = 32;

/// Largest cell index magnitude at which every integer is an exact `f64`.
const MAX_CELL_INDEX: f64 = 9_007_199_254_740_992.0;

/// Integer grid cell identifier.
pub type BucketKey = (i64, i64, i64);

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

/// Grid cell of `p` for a cell edge of `max_distance`.
///
/// Fails with [`ClusterError::CellOutOfRange`] when a cell index exceeds
/// 2^53 in magnitude; past that, distinct cells collapse onto one key.
pub fn bucket_key(p: &Point3D, max_distance: f64) -> Result<BucketKey> {
    let cell = |v: f64| {
        let c = (v / max_distance).ceil();
        (c.abs() <= MAX_CELL_INDEX).then_some(c as i64)
    };
    match (cell(p.x), cell(p.y), cell(p.z)) {
        (Some(x), Some(y), Some(z)) => Ok((x, y, z)),
        _ => Err(ClusterError::CellOutOfRange {
            x: p.x,
            y: p.y,
            z: p.z,
            max_distance,
        }),
    }
}

/// Partition `cloud` into grid cells. No point is dropped here.
pub fn bucket_points<D: Clone>(
    cloud: &PointSet<D>,
    max_distance: f64,
) -> Result<BTreeMap<BucketKey, PointSet<D>>> {
    if !(max_distance.is_finite() && max_distance > 0.0) {
        return Err(ConfigError::MaxDistance(max_distance).into());
    }

    let mut buckets: BTreeMap<BucketKey, PointSet<D>> = BTreeMap::new();
    for (p, d) in cloud.iter() {
        buckets
            .entry(bucket_key(p, max_distance)?)
            .or_default()
            .set(*p, d.clone())?;
    }
    Ok(buckets)
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A point set paired with an octree built over it.
///
/// The index is built once; merging produces a new segment with a new index.
#[derive(Debug, Clone)]
pub struct Segment<D> {
    points: PointSet<D>,
    index: Octree,
}

/// A segment that survived the final size filter.
pub type Cluster<D> = Segment<D>;

impl<D> Segment<D> {
    pub fn build(points: PointSet<D>) -> Self {
        let index = Octree::build(&points);
        Self { points, index }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &PointSet<D> {
        &self.points
    }

    pub fn index(&self) -> &Octree {
        &self.index
    }

    /// Centroid, bounding-sphere radius, and bounds cached by the index.
    pub fn metadata(&self) -> &PointSetMetadata {
        self.index.metadata()
    }

    pub fn into_points(self) -> PointSet<D> {
        self.points
    }

    /// `true` iff some point of `self` is strictly closer than `threshold` to
    /// some point of `other`.
    ///
    /// Segments whose bounding spheres are more than `threshold` apart are
    /// rejected without touching a single point. Otherwise the smaller
    /// segment's points probe the larger segment's octree, stopping at the
    /// first hit.
    pub fn is_within(&self, other: &Segment<D>, threshold: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        let a = self.metadata();
        let b = other.metadata();
        let gap = a.centroid.distance_to(&b.centroid);
        if gap > a.max_extent + b.max_extent + threshold {
            return false;
        }

        let (probe, target) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        probe
            .points
            .points()
            .any(|p| target.index.any_within(p, threshold))
    }

    /// Union of both segments, re-indexed. On shared coordinates the payload
    /// from `other` is kept.
    pub fn merge(self, other: Segment<D>) -> Result<Segment<D>> {
        let mut points = self.points;
        points.absorb(other.points)?;
        Ok(Segment::build(points))
    }
}

fn build_segments<D: Send>(buckets: Vec<PointSet<D>>) -> Vec<Segment<D>> {
    if buckets.len() >= PARALLEL_BUILD_THRESHOLD {
        buckets.into_par_iter().map(Segment::build).collect()
    } else {
        buckets.into_iter().map(Segment::build).collect()
    }
}

// ---------------------------------------------------------------------------
// Merge loop
// ---------------------------------------------------------------------------

/// Result of [`merge_until_quiescent`].
#[derive(Debug)]
pub struct MergeOutcome<D> {
    /// Surviving segments; no two of them are adjacent.
    pub segments: Vec<Segment<D>>,
    /// Full passes executed, including the final pass that merged nothing.
    pub passes: usize,
    /// Total pairwise merges performed.
    pub merges: usize,
}

/// Merge adjacent segments until a full pass finds nothing to merge.
///
/// Segments sit in index-stable slots. Within a pass, slot `x` is compared
/// with every later live slot `y`; on a hit the merged segment replaces `x`,
/// slot `y` is tombstoned, and the scan continues with `y + 1` against the
/// merged segment. Tombstones are compacted between passes, preserving
/// order. `k` input segments need at most `k` passes.
///
/// `cancel` is polled before each pass, never during one.
#[instrument(level = "debug", skip_all, fields(segments = segments.len(), threshold = threshold))]
pub fn merge_until_quiescent<D>(
    segments: Vec<Segment<D>>,
    threshold: f64,
    cancel: Option<&CancelToken>,
) -> Result<MergeOutcome<D>> {
    let mut slots: Vec<Option<Segment<D>>> = segments.into_iter().map(Some).collect();
    let mut passes = 0;
    let mut merges = 0;

    while slots.len() > 1 {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            warn!(passes, remaining = slots.len(), "merge loop cancelled");
            return Err(ClusterError::Cancelled { passes });
        }

        passes += 1;
        let merged = merge_pass(&mut slots, threshold)?;
        merges += merged;
        slots.retain(Option::is_some);
        debug!(pass = passes, merged, remaining = slots.len(), "merge pass complete");

        if merged == 0 {
            break;
        }
    }

    debug_assert!(passes <= merges + 1, "every pass but the last must merge");

    Ok(MergeOutcome {
        segments: slots.into_iter().flatten().collect(),
        passes,
        merges,
    })
}

/// One scan over all live slot pairs. Returns the number of merges.
fn merge_pass<D>(slots: &mut [Option<Segment<D>>], threshold: f64) -> Result<usize> {
    let mut merged = 0;

    for x in 0..slots.len() {
        if slots[x].is_none() {
            continue;
        }
        for y in (x + 1)..slots.len() {
            let adjacent = match (&slots[x], &slots[y]) {
                (Some(a), Some(b)) => a.is_within(b, threshold),
                _ => false,
            };
            if !adjacent {
                continue;
            }
            match (slots[x].take(), slots[y].take()) {
                (Some(a), Some(b)) => {
                    trace!(x, y, left = a.len(), right = b.len(), "merging adjacent segments");
                    slots[x] = Some(a.merge(b)?);
                    merged += 1;
                }
                (left, right) => {
                    debug_assert!(false, "adjacent slots {x} and {y} must both be live");
                    slots[x] = left;
                    slots[y] = right;
                }
            }
        }
    }

    Ok(merged)
}

// ---------------------------------------------------------------------------
// Clusterer
// ---------------------------------------------------------------------------

/// Counters describing one clustering run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStats {
    pub input_points: usize,
    pub buckets: usize,
    /// Segments that entered the merge loop.
    pub segments: usize,
    /// Points in buckets below `min_points_per_segment`.
    pub points_below_segment_minimum: usize,
    pub passes: usize,
    pub merges: usize,
    /// Merged segments discarded by the `min_points_per_cluster` filter.
    pub segments_below_cluster_minimum: usize,
    pub points_below_cluster_minimum: usize,
    pub clusters: usize,
}

/// Clusters plus the counters of the run that produced them.
#[derive(Debug)]
pub struct ClusterReport<D> {
    pub clusters: Vec<Cluster<D>>,
    pub stats: ClusterStats,
}

/// Validated clustering parameters, reusable across calls.
///
/// Each call works on its own buckets and segments, so one `Clusterer` can
/// serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Clusterer {
    config: ClusterConfig,
}

impl Clusterer {
    pub fn new(config: ClusterConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Partition `cloud` into clusters. Cluster order is unspecified.
    pub fn cluster<D: Clone + Send>(&self, cloud: &PointSet<D>) -> Result<Vec<Cluster<D>>> {
        Ok(self.cluster_with_report(cloud, None)?.clusters)
    }

    /// Like [`cluster`](Self::cluster), also returning run counters and
    /// honouring `cancel` between merge passes.
    #[instrument(
        skip_all,
        fields(points = cloud.len(), max_distance = self.config.max_distance)
    )]
    pub fn cluster_with_report<D: Clone + Send>(
        &self,
        cloud: &PointSet<D>,
        cancel: Option<&CancelToken>,
    ) -> Result<ClusterReport<D>> {
        let cfg = &self.config;
        let mut stats = ClusterStats {
            input_points: cloud.len(),
            ..ClusterStats::default()
        };

        let buckets = bucket_points(cloud, cfg.max_distance)?;
        stats.buckets = buckets.len();

        let (kept, dropped): (Vec<_>, Vec<_>) = buckets
            .into_values()
            .partition(|b| b.len() >= cfg.min_points_per_segment);
        stats.points_below_segment_minimum = dropped.iter().map(PointSet::len).sum();

        let segments = build_segments(kept);
        stats.segments = segments.len();
        debug!(
            buckets = stats.buckets,
            segments = stats.segments,
            dropped_points = stats.points_below_segment_minimum,
            "built segments"
        );

        let outcome = merge_until_quiescent(segments, cfg.max_distance, cancel)?;
        stats.passes = outcome.passes;
        stats.merges = outcome.merges;

        let (clusters, discarded): (Vec<_>, Vec<_>) = outcome
            .segments
            .into_iter()
            .partition(|s| s.len() > cfg.min_points_per_cluster);
        stats.segments_below_cluster_minimum = discarded.len();
        stats.points_below_cluster_minimum = discarded.iter().map(Segment::len).sum();
        stats.clusters = clusters.len();

        info!(
            clusters = stats.clusters,
            passes = stats.passes,
            merges = stats.merges,
            "clustering complete"
        );

        Ok(ClusterReport { clusters, stats })
    }
}

/// Cluster `cloud` in one call.
///
/// Fails before doing any work if a parameter is out of range, and fails as
/// a whole if a point cannot be stored. Cluster order is unspecified.
pub fn cluster<D: Clone + Send>(
    cloud: &PointSet<D>,
    max_distance: f64,
    min_points_per_segment: usize,
    min_points_per_cluster: usize,
) -> Result<Vec<Cluster<D>>> {
    let clusterer = Clusterer::new(ClusterConfig::new(
        max_distance,
        min_points_per_segment,
        min_points_per_cluster,
    ))?;
    clusterer.cluster(cloud)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` points on a 0.5-spaced 5-wide grid ending at `(cx, 0, 0)` and
    /// extending towards negative x and y, so the whole group shares one
    /// bucket for any cell edge >= 2.5.
    fn group(cx: f64, n: usize, tag: u32) -> Vec<(Point3D, u32)> {
        (0..n)
            .map(|i| {
                (
                    Point3D::new(cx - (i % 5) as f64 * 0.5, -((i / 5) as f64) * 0.5, 0.0),
                    tag,
                )
            })
            .collect()
    }

    fn segment(cx: f64, n: usize, tag: u32) -> Segment<u32> {
        Segment::build(PointSet::try_from_entries(group(cx, n, tag)).unwrap())
    }

    fn single(x: f64) -> Segment<()> {
        Segment::build(PointSet::try_from_entries([(Point3D::new(x, 0.0, 0.0), ())]).unwrap())
    }

    // -- bucketing ----------------------------------------------------------

    #[test]
    fn test_bucket_key_uses_ceil() {
        let key = |x, y, z| bucket_key(&Point3D::new(x, y, z), 30.0).unwrap();
        assert_eq!(key(0.0, 0.0, 0.0), (0, 0, 0));
        assert_eq!(key(30.0, 0.0, 0.0), (1, 0, 0));
        assert_eq!(key(30.001, 0.0, 0.0), (2, 0, 0));
        assert_eq!(key(0.1, -0.1, -30.0), (1, 0, -1));
        assert_eq!(key(-30.1, 0.0, 0.0), (-1, 0, 0));
    }

    #[test]
    fn test_bucket_key_rejects_cells_beyond_exact_range() {
        for x in [1e9, -1e9, 2e9] {
            let err = bucket_key(&Point3D::new(x, 0.0, 0.0), 1e-10).unwrap_err();
            assert!(matches!(err, ClusterError::CellOutOfRange { .. }));
        }
        // 2^53 itself is still exact.
        let key = bucket_key(&Point3D::new(MAX_CELL_INDEX, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(key.0, 9_007_199_254_740_992);
    }

    #[test]
    fn test_far_points_never_share_a_saturated_bucket() {
        let cloud = PointSet::try_from_entries([
            (Point3D::new(1e9, 0.0, 0.0), 0u32),
            (Point3D::new(2e9, 0.0, 0.0), 1u32),
        ])
        .unwrap();
        let err = cluster(&cloud, 1e-10, 1, 1).unwrap_err();
        assert!(matches!(err, ClusterError::CellOutOfRange { .. }));
        assert!(bucket_points(&cloud, 1e-10).is_err());
    }

    #[test]
    fn test_bucket_points_keeps_every_point() {
        let mut entries = group(0.0, 25, 0);
        entries.extend(group(25.0, 25, 1));
        entries.push((Point3D::new(500.0, 500.0, 500.0), 2));
        let cloud = PointSet::try_from_entries(entries).unwrap();

        let buckets = bucket_points(&cloud, 30.0).unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets.values().map(PointSet::len).sum::<usize>(), 51);
        assert_eq!(buckets[&(17, 17, 17)].len(), 1);
    }

    #[test]
    fn test_bucket_points_rejects_bad_distance() {
        let cloud: PointSet<()> = PointSet::new();
        for d in [0.0, -2.0, f64::NAN] {
            let err = bucket_points(&cloud, d).unwrap_err();
            assert!(matches!(err, ClusterError::Config(ConfigError::MaxDistance(_))));
        }
    }

    #[test]
    fn test_bucket_points_carries_payload() {
        let cloud = PointSet::try_from_entries(group(0.0, 5, 7)).unwrap();
        let buckets = bucket_points(&cloud, 10.0).unwrap();
        let only = buckets.values().next().unwrap();
        assert!(only.iter().all(|(_, d)| *d == 7));
    }

    // -- adjacency ----------------------------------------------------------

    #[test]
    fn test_within_adjacent_groups() {
        let a = segment(0.0, 25, 0);
        let b = segment(25.0, 25, 1);
        assert!(a.is_within(&b, 30.0));
        assert!(b.is_within(&a, 30.0));
    }

    #[test]
    fn test_within_far_groups() {
        let a = segment(0.0, 25, 0);
        let b = segment(50.0, 25, 1);
        assert!(!a.is_within(&b, 30.0));
        assert!(!b.is_within(&a, 30.0));
    }

    #[test]
    fn test_within_is_strict() {
        assert!(!single(0.0).is_within(&single(1.0), 1.0));
        assert!(single(0.0).is_within(&single(0.99), 1.0));
    }

    #[test]
    fn test_within_overlapping_spheres_without_close_pair() {
        // Bounding spheres coincide, but the closest pair is ~14.1 apart.
        let ring_a = PointSet::try_from_entries([
            (Point3D::new(-10.0, 0.0, 0.0), ()),
            (Point3D::new(10.0, 0.0, 0.0), ()),
        ])
        .unwrap();
        let ring_b = PointSet::try_from_entries([
            (Point3D::new(0.0, -10.0, 0.0), ()),
            (Point3D::new(0.0, 10.0, 0.0), ()),
        ])
        .unwrap();
        let a = Segment::build(ring_a);
        let b = Segment::build(ring_b);
        assert!(!a.is_within(&b, 2.0));
        assert!(a.is_within(&b, 15.0));
    }

    #[test]
    fn test_within_empty_segment() {
        let empty: Segment<()> = Segment::build(PointSet::new());
        assert!(!empty.is_within(&single(0.0), 100.0));
    }

    // -- merge --------------------------------------------------------------

    #[test]
    fn test_merge_unions_and_reindexes() {
        let a = segment(0.0, 25, 0);
        let b = segment(25.0, 25, 1);
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.len(), 50);
        assert_eq!(merged.index().len(), 50);
        assert_eq!(merged.metadata().count, 50);
        assert_eq!(merged.points().get(&Point3D::new(25.0, 0.0, 0.0)), Some(&1));
        assert_eq!(merged.points().get(&Point3D::new(0.0, 0.0, 0.0)), Some(&0));
    }

    #[test]
    fn test_merge_duplicate_takes_second_payload() {
        let a = segment(0.0, 5, 0);
        let b = segment(0.0, 5, 9);
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.len(), 5);
        assert!(merged.points().iter().all(|(_, d)| *d == 9));
    }

    // -- merge loop ---------------------------------------------------------

    #[test]
    fn test_merge_loop_empty_and_single() {
        let none: MergeOutcome<u32> = merge_until_quiescent(Vec::new(), 1.0, None).unwrap();
        assert!(none.segments.is_empty());
        assert_eq!(none.passes, 0);

        let one = merge_until_quiescent(vec![segment(0.0, 5, 0)], 1.0, None).unwrap();
        assert_eq!(one.segments.len(), 1);
        assert_eq!(one.passes, 0);
        assert_eq!(one.merges, 0);
    }

    #[test]
    fn test_merge_loop_quiescent_first_pass() {
        let out = merge_until_quiescent(
            vec![segment(0.0, 25, 0), segment(1000.0, 25, 1)],
            30.0,
            None,
        )
        .unwrap();
        assert_eq!(out.segments.len(), 2);
        assert_eq!(out.passes, 1);
        assert_eq!(out.merges, 0);
    }

    #[test]
    fn test_merge_loop_chains_within_one_pass() {
        let out = merge_until_quiescent(
            vec![segment(0.0, 25, 0), segment(25.0, 25, 1), segment(50.0, 25, 2)],
            30.0,
            None,
        )
        .unwrap();
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].len(), 75);
        assert_eq!(out.passes, 1);
        assert_eq!(out.merges, 2);
    }

    #[test]
    fn test_merge_loop_needs_second_pass_for_transitive_merge() {
        // The two ends come first; they only join once the middle group has
        // been merged into the first one.
        let out = merge_until_quiescent(
            vec![segment(0.0, 25, 0), segment(50.0, 25, 2), segment(25.0, 25, 1)],
            30.0,
            None,
        )
        .unwrap();
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].len(), 75);
        assert_eq!(out.passes, 2);
        assert_eq!(out.merges, 2);
    }

    #[test]
    fn test_merge_loop_keeps_order_of_survivors() {
        let out = merge_until_quiescent(
            vec![
                segment(0.0, 10, 0),
                segment(500.0, 10, 1),
                segment(20.0, 10, 2),
                segment(1000.0, 10, 3),
            ],
            30.0,
            None,
        )
        .unwrap();
        let lens: Vec<usize> = out.segments.iter().map(Segment::len).collect();
        assert_eq!(lens, vec![20, 10, 10]);
        assert_eq!(out.segments[1].points().iter().next().map(|(_, d)| *d), Some(1));
        assert_eq!(out.segments[2].points().iter().next().map(|(_, d)| *d), Some(3));
    }

    #[test]
    fn test_merge_pass_skips_tombstones_and_keeps_points() {
        let mut slots = vec![
            Some(segment(0.0, 25, 0)),
            None,
            Some(segment(25.0, 25, 1)),
            None,
            Some(segment(1000.0, 25, 2)),
        ];
        let merged = merge_pass(&mut slots, 30.0).unwrap();
        assert_eq!(merged, 1);
        let lens: Vec<Option<usize>> = slots.iter().map(|s| s.as_ref().map(Segment::len)).collect();
        assert_eq!(lens, vec![Some(50), None, None, None, Some(25)]);
    }

    #[test]
    fn test_merge_loop_cancelled_before_first_pass() {
        let token = CancelToken::new();
        token.cancel();
        let err = merge_until_quiescent(
            vec![segment(0.0, 25, 0), segment(25.0, 25, 1)],
            30.0,
            Some(&token),
        )
        .unwrap_err();
        assert!(matches!(err, ClusterError::Cancelled { passes: 0 }));
    }

    #[test]
    fn test_merge_loop_live_token_does_not_interfere() {
        let token = CancelToken::new();
        let out = merge_until_quiescent(
            vec![segment(0.0, 25, 0), segment(25.0, 25, 1)],
            30.0,
            Some(&token),
        )
        .unwrap();
        assert_eq!(out.segments.len(), 1);
    }

    // -- clusterer ----------------------------------------------------------

    #[test]
    fn test_clusterer_rejects_invalid_config() {
        assert!(Clusterer::new(ClusterConfig::new(0.0, 1, 1)).is_err());
        assert!(Clusterer::new(ClusterConfig::new(1.0, 0, 1)).is_err());
        assert!(Clusterer::new(ClusterConfig::new(1.0, 1, 0)).is_err());
    }

    #[test]
    fn test_clusterer_report_counts() {
        let mut entries = group(0.0, 25, 0);
        entries.extend(group(25.0, 25, 1));
        entries.extend(group(1000.0, 15, 2));
        entries.extend(group(-500.0, 21, 3));
        let cloud = PointSet::try_from_entries(entries).unwrap();

        let clusterer = Clusterer::new(ClusterConfig::new(30.0, 20, 30)).unwrap();
        let report = clusterer.cluster_with_report(&cloud, None).unwrap();

        assert_eq!(report.stats.input_points, 86);
        assert_eq!(report.stats.buckets, 4);
        assert_eq!(report.stats.segments, 3);
        assert_eq!(report.stats.points_below_segment_minimum, 15);
        assert_eq!(report.stats.merges, 1);
        assert_eq!(report.stats.segments_below_cluster_minimum, 1);
        assert_eq!(report.stats.points_below_cluster_minimum, 21);
        assert_eq!(report.stats.clusters, 1);
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.clusters[0].len(), 50);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        // 40 well separated groups crosses the parallel threshold.
        let entries: Vec<(Point3D, u32)> = (0..40)
            .flat_map(|g| group(g as f64 * 100.0, 25, g))
            .collect();
        let cloud = PointSet::try_from_entries(entries).unwrap();
        let clusters = cluster(&cloud, 30.0, 20, 10).unwrap();
        assert_eq!(clusters.len(), 40);
        for c in &clusters {
            assert_eq!(c.len(), 25);
            let tag = *c.points().iter().next().unwrap().1;
            assert!(c.points().iter().all(|(_, d)| *d == tag));
        }
    }

    #[test]
    fn test_cluster_size_filter_is_strict() {
        let cloud = PointSet::try_from_entries(group(0.0, 25, 0)).unwrap();
        assert_eq!(cluster(&cloud, 30.0, 20, 24).unwrap().len(), 1);
        assert!(cluster(&cloud, 30.0, 20, 25).unwrap().is_empty());
    }
}
