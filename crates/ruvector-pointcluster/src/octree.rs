//! Bulk-built octree over the coordinates of a [`PointSet`].
//!
//! The tree is built once from a complete set and never mutated; a segment
//! that changes membership gets a fresh tree. Nodes live in a flat arena and
//! leaves reference contiguous runs of a reordered point buffer, so a probe
//! walks the arena with an explicit stack instead of recursing.

use crate::point::{Point3D, PointSet, PointSetMetadata};

/// Maximum number of points stored in a leaf before it is split.
const LEAF_CAPACITY: usize = 16;

/// Hard cap on subdivision depth.
const MAX_DEPTH: usize = 21;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Tight axis-aligned bounds of the points under a node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Aabb {
    min: Point3D,
    max: Point3D,
}

impl Aabb {
    fn enclosing(points: &[Point3D]) -> Self {
        let mut min = Point3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Self { min, max }
    }

    fn center(&self) -> Point3D {
        Point3D::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Squared distance from `p` to the closest point of the box (zero when
    /// `p` is inside). Never larger than the squared distance from `p` to any
    /// point the box encloses.
    fn distance_squared_to(&self, p: &Point3D) -> f64 {
        let closest = Point3D::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        );
        p.distance_squared_to(&closest)
    }
}

fn octant(p: &Point3D, center: &Point3D) -> u8 {
    (p.x >= center.x) as u8 | ((p.y >= center.y) as u8) << 1 | ((p.z >= center.z) as u8) << 2
}

// ---------------------------------------------------------------------------
// Octree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Children {
    /// Half-open range into the reordered point buffer.
    Leaf { start: usize, end: usize },
    Branch(Vec<usize>),
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    children: Children,
}

/// Immutable octree with a cached bounding-sphere summary.
#[derive(Debug, Clone)]
pub struct Octree {
    points: Vec<Point3D>,
    nodes: Vec<Node>,
    metadata: PointSetMetadata,
    depth: usize,
}

impl Octree {
    /// Build a tree over every coordinate in `set`.
    pub fn build<D>(set: &PointSet<D>) -> Self {
        let mut points: Vec<Point3D> = set.points().copied().collect();
        let metadata = PointSetMetadata::from_points(points.iter());
        let mut nodes = Vec::new();
        let mut depth = 0;

        if !points.is_empty() {
            Self::build_node(&mut nodes, &mut points, 0, 0, &mut depth);
        }

        Self {
            points,
            nodes,
            metadata,
            depth,
        }
    }

    fn build_node(
        nodes: &mut Vec<Node>,
        points: &mut [Point3D],
        offset: usize,
        depth: usize,
        max_depth_seen: &mut usize,
    ) -> usize {
        let bounds = Aabb::enclosing(points);
        let id = nodes.len();
        nodes.push(Node {
            bounds,
            children: Children::Leaf {
                start: offset,
                end: offset + points.len(),
            },
        });
        *max_depth_seen = (*max_depth_seen).max(depth);

        if points.len() <= LEAF_CAPACITY || depth >= MAX_DEPTH || bounds.is_degenerate() {
            return id;
        }

        let center = bounds.center();
        points.sort_unstable_by_key(|p| octant(p, &center));

        let mut children = Vec::with_capacity(8);
        let mut start = 0;
        while start < points.len() {
            let oct = octant(&points[start], &center);
            let run = points[start..]
                .iter()
                .take_while(|p| octant(p, &center) == oct)
                .count();
            let child = Self::build_node(
                nodes,
                &mut points[start..start + run],
                offset + start,
                depth + 1,
                max_depth_seen,
            );
            children.push(child);
            start += run;
        }

        nodes[id].children = Children::Branch(children);
        id
    }

    /// `true` iff some indexed point lies strictly closer than `radius` to
    /// `query`.
    pub fn any_within(&self, query: &Point3D, radius: f64) -> bool {
        if self.nodes.is_empty() || radius <= 0.0 {
            return false;
        }
        let r2 = radius * radius;

        let mut stack = vec![0usize];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.bounds.distance_squared_to(query) >= r2 {
                continue;
            }
            match &node.children {
                Children::Leaf { start, end } => {
                    if self.points[*start..*end]
                        .iter()
                        .any(|p| p.distance_squared_to(query) < r2)
                    {
                        return true;
                    }
                }
                Children::Branch(children) => stack.extend(children.iter().copied()),
            }
        }
        false
    }

    /// Centroid, bounding-sphere radius, and bounds of the indexed points.
    pub fn metadata(&self) -> &PointSetMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node (the root is depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Indexed coordinates in tree order.
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
