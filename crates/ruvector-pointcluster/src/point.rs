//! Point and point-set types shared by the index and the clustering engine.
//!
//! A [`PointSet`] maps 3-D coordinates to an opaque payload (colour,
//! intensity, a source index, ...). The clustering engine carries payloads
//! through bucketing and merging but never inspects them.

use crate::error::PointSetError;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Point3D
// ---------------------------------------------------------------------------

/// 3D point used in point sets and spatial operations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Point3D) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Point3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

/// Hashable identity of a coordinate. `-0.0` is folded onto `0.0` so both
/// spellings address the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordKey([u64; 3]);

impl CoordKey {
    fn of(p: &Point3D) -> Self {
        fn bits(v: f64) -> u64 {
            if v == 0.0 {
                0
            } else {
                v.to_bits()
            }
        }
        Self([bits(p.x), bits(p.y), bits(p.z)])
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Aggregate summary of a set of points.
///
/// `max_extent` is the largest distance from `centroid` to any member, i.e.
/// the radius of a centroid-anchored bounding sphere. An empty set reports
/// the all-zero sentinel returned by [`PointSetMetadata::default`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSetMetadata {
    pub count: usize,
    pub centroid: Point3D,
    pub max_extent: f64,
    pub min: Point3D,
    pub max: Point3D,
}

impl PointSetMetadata {
    /// Compute the summary in two passes over `points`.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: Iterator<Item = &'a Point3D> + Clone,
    {
        let mut count = 0usize;
        let (mut sx, mut sy, mut sz) = (0.0_f64, 0.0_f64, 0.0_f64);
        let mut min = Point3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

        for p in points.clone() {
            count += 1;
            sx += p.x;
            sy += p.y;
            sz += p.z;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        let centroid = Point3D::new(sx / n, sy / n, sz / n);
        let max_extent = points
            .map(|p| p.distance_to(&centroid))
            .fold(0.0_f64, f64::max);

        Self {
            count,
            centroid,
            max_extent,
            min,
            max,
        }
    }

    /// Longest side of the axis-aligned bounds.
    pub fn max_side_length(&self) -> f64 {
        (self.max.x - self.min.x)
            .max(self.max.y - self.min.y)
            .max(self.max.z - self.min.z)
    }
}

// ---------------------------------------------------------------------------
// PointSet
// ---------------------------------------------------------------------------

/// A set of unique coordinates, each carrying a payload of type `D`.
///
/// Setting a coordinate that is already present replaces its payload; the
/// point is never duplicated. Iteration order is insertion order, which
/// callers must treat as unspecified.
#[derive(Debug, Clone)]
pub struct PointSet<D> {
    entries: Vec<(Point3D, D)>,
    lookup: HashMap<CoordKey, usize>,
}

impl<D> Default for PointSet<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> PointSet<D> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Build a set from `(point, payload)` pairs. Later duplicates win.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, PointSetError>
    where
        I: IntoIterator<Item = (Point3D, D)>,
    {
        let iter = entries.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        for (p, d) in iter {
            set.set(p, d)?;
        }
        Ok(set)
    }

    /// Insert `point` with `data`, or replace the payload if `point` is
    /// already present.
    pub fn set(&mut self, point: Point3D, data: D) -> Result<(), PointSetError> {
        if !point.is_finite() {
            return Err(PointSetError::NonFiniteCoordinate {
                x: point.x,
                y: point.y,
                z: point.z,
            });
        }

        let key = CoordKey::of(&point);
        if let Some(&slot) = self.lookup.get(&key) {
            self.entries[slot].1 = data;
            return Ok(());
        }

        self.entries.try_reserve(1)?;
        self.lookup.try_reserve(1)?;
        self.lookup.insert(key, self.entries.len());
        self.entries.push((point, data));
        Ok(())
    }

    pub fn get(&self, point: &Point3D) -> Option<&D> {
        self.lookup
            .get(&CoordKey::of(point))
            .map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, point: &Point3D) -> bool {
        self.lookup.contains_key(&CoordKey::of(point))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lazily visit every point exactly once. Stop early with the usual
    /// iterator adapters (`any`, `find`, `take_while`, ...).
    pub fn iter(&self) -> impl Iterator<Item = (&Point3D, &D)> + Clone + '_ {
        self.entries.iter().map(|(p, d)| (p, d))
    }

    pub fn points(&self) -> impl Iterator<Item = &Point3D> + Clone + '_ {
        self.entries.iter().map(|(p, _)| p)
    }

    pub fn metadata(&self) -> PointSetMetadata {
        PointSetMetadata::from_points(self.points())
    }

    /// Move every entry of `other` into `self`. Payloads from `other` win on
    /// shared coordinates.
    pub fn absorb(&mut self, other: PointSet<D>) -> Result<(), PointSetError> {
        self.entries.try_reserve(other.len())?;
        self.lookup.try_reserve(other.len())?;
        for (p, d) in other.entries {
            self.set(p, d)?;
        }
        Ok(())
    }

    pub fn into_entries(self) -> Vec<(Point3D, D)> {
        self.entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
