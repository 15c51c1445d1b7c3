//! Open polylines and closed oriented loops.
//!
//! A [`Polyline`] is an ordered sequence of at least two points; the engine
//! emits all extrusion as polylines. A [`Loop`] is a closed polygon stored
//! as its vertex ring; consecutive vertices (and the last/first pair) form
//! its edges. Loops are oriented: material lies to the left of travel, so
//! solid outlines are counter-clockwise and holes clockwise.

use crate::error::{Error, Result};
use crate::point::{distance, distance_squared, same_same, Point2};
use crate::robust::{orient2d, Orientation};
use crate::segment::Segment2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An open, ordered path of two or more points.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polyline {
    points: Vec<Point2>,
}

impl Polyline {
    /// Creates a polyline from a point sequence.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Creates a polyline from a single segment.
    pub fn from_segment(seg: &Segment2) -> Self {
        Self {
            points: vec![seg.a, seg.b],
        }
    }

    /// The point sequence.
    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the polyline holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point, if any.
    #[inline]
    pub fn first(&self) -> Option<&Point2> {
        self.points.first()
    }

    /// Last point, if any.
    #[inline]
    pub fn last(&self) -> Option<&Point2> {
        self.points.last()
    }

    /// Appends a point.
    pub fn push(&mut self, p: Point2) {
        self.points.push(p);
    }

    /// Appends all points of `other`.
    pub fn extend_from(&mut self, other: &Polyline) {
        self.points.extend_from_slice(&other.points);
    }

    /// Reverses the traversal direction in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Total length along the path.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| distance(&w[0], &w[1]))
            .sum()
    }

    /// A point used to dispatch this path into a containment hierarchy.
    ///
    /// The middle vertex is used rather than an endpoint: endpoints of
    /// infill and support paths frequently touch the loops they are bounded
    /// by, where a winding test is ambiguous.
    pub fn representative_point(&self) -> Option<Point2> {
        self.points.get(self.points.len() / 2).copied()
    }

    /// Iterates the edges of the path.
    pub fn segments(&self) -> impl Iterator<Item = Segment2> + '_ {
        self.points
            .windows(2)
            .map(|w| Segment2::new(w[0], w[1]))
    }
}

/// A closed oriented polygon.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Loop {
    vertices: Vec<Point2>,
}

impl Loop {
    /// Creates a loop from a vertex ring.
    ///
    /// The ring is implicitly closed; a duplicated closing vertex equal to
    /// the first (within `f64` equality) is dropped.
    pub fn new(mut vertices: Vec<Point2>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    /// Builds a loop from consecutive segments, validating closure.
    ///
    /// Each segment's end must coincide with the next segment's start within
    /// `tolerance`, cyclically. Returns [`Error::OpenPolygon`] on the first
    /// adjacency violation and [`Error::TooFewSegments`] for fewer than two
    /// segments.
    pub fn from_segments(segments: &[Segment2], tolerance: f64) -> Result<Self> {
        if segments.len() < 2 {
            return Err(Error::TooFewSegments(segments.len()));
        }
        for (i, seg) in segments.iter().enumerate() {
            let next = &segments[(i + 1) % segments.len()];
            if !same_same(&seg.b, &next.a, tolerance) {
                return Err(Error::OpenPolygon {
                    index: i,
                    gap: distance(&seg.b, &next.a),
                });
            }
        }
        Ok(Self {
            vertices: segments.iter().map(|s| s.a).collect(),
        })
    }

    /// The vertex ring (no duplicated closing vertex).
    #[inline]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Number of vertices (equals the number of edges).
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the loop has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates the edges of the loop, cyclically.
    pub fn segments(&self) -> impl Iterator<Item = Segment2> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment2::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Collects the edges into a vector (the inset engine's input form).
    pub fn to_segments(&self) -> Vec<Segment2> {
        self.segments().collect()
    }

    /// Total edge length.
    pub fn perimeter(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Twice-signed area via the shoelace formula. Positive for
    /// counter-clockwise loops.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = &self.vertices[i];
            let b = &self.vertices[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Loop orientation from the signed area.
    pub fn orientation(&self) -> Orientation {
        let area = self.signed_area();
        if area > 0.0 {
            Orientation::CounterClockwise
        } else if area < 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::Collinear
        }
    }

    /// Point-in-polygon test by ray-crossing parity.
    ///
    /// A ray is cast toward +x; each edge straddling the ray's height is
    /// classified with the exact orientation predicate, so the result is
    /// stable even for points nearly on an edge. Orientation of the loop
    /// does not matter.
    pub fn contains(&self, p: &Point2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        for i in 0..n {
            let a = &self.vertices[i];
            let b = &self.vertices[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let side = orient2d(a, b, p);
                let crossing = if b.y > a.y {
                    side.is_ccw()
                } else {
                    side.is_cw()
                };
                if crossing {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Vertex average. Interior only for convex loops; see
    /// [`representative_point`](Self::representative_point).
    pub fn centroid(&self) -> Point2 {
        let n = self.vertices.len().max(1) as f64;
        let sum = self
            .vertices
            .iter()
            .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / n)
    }

    /// A point in the interior of the loop.
    ///
    /// Tries the centroid first, then midpoints of the short diagonals
    /// skipping one vertex. Falls back to the first vertex for degenerate
    /// rings, which callers treat as best-effort.
    pub fn representative_point(&self) -> Point2 {
        let c = self.centroid();
        if self.contains(&c) {
            return c;
        }
        let n = self.vertices.len();
        for i in 0..n {
            let m = nalgebra::center(&self.vertices[i], &self.vertices[(i + 2) % n]);
            if self.contains(&m) {
                return m;
            }
        }
        self.vertices[0]
    }

    /// Squared distance from `p` to the nearest vertex.
    pub fn nearest_vertex_distance_squared(&self, p: &Point2) -> f64 {
        self.vertices
            .iter()
            .map(|v| distance_squared(v, p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Index of the vertex nearest to `p`. Ties resolve to the lowest index.
    pub fn nearest_vertex(&self, p: &Point2) -> usize {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (i, v) in self.vertices.iter().enumerate() {
            let d = distance_squared(v, p);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    ///
    /// Empty loops produce an inverted box that intersects nothing.
    pub fn aabb(&self) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for v in &self.vertices {
            min[0] = min[0].min(v.x);
            min[1] = min[1].min(v.y);
            max[0] = max[0].max(v.x);
            max[1] = max[1].max(v.y);
        }
        (min, max)
    }

    /// Opens the loop into a polyline starting at vertex `start`, walking
    /// the full ring and repeating the start point at the end.
    pub fn to_polyline_from(&self, start: usize) -> Polyline {
        let n = self.vertices.len();
        let mut points = Vec::with_capacity(n + 1);
        for k in 0..n {
            points.push(self.vertices[(start + k) % n]);
        }
        if n > 0 {
            points.push(self.vertices[start % n]);
        }
        Polyline::new(points)
    }
}
