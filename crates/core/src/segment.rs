//! Directed 2D line segments.

use crate::point::{distance, same_same, Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A directed line segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment2 {
    /// Start point.
    pub a: Point2,
    /// End point.
    pub b: Point2,
}

impl Segment2 {
    /// Creates a segment from `a` to `b`.
    #[inline]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        distance(&self.a, &self.b)
    }

    /// Squared length of the segment.
    #[inline]
    pub fn squared_length(&self) -> f64 {
        nalgebra::distance_squared(&self.a, &self.b)
    }

    /// Displacement vector `b - a`.
    #[inline]
    pub fn direction(&self) -> Vector2 {
        self.b - self.a
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.a, &self.b)
    }

    /// The same segment traversed in the opposite direction.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Tests whether both endpoints coincide with `other`'s within
    /// `tolerance`.
    pub fn same_same(&self, other: &Self, tolerance: f64) -> bool {
        same_same(&self.a, &other.a, tolerance) && same_same(&self.b, &other.b, tolerance)
    }

    /// Returns a copy extended by `dist` beyond the chosen endpoints, along
    /// the segment direction.
    ///
    /// Zero-length segments are returned unchanged since they have no
    /// direction to extend along.
    pub fn elongated(&self, dist: f64, from_start: bool, from_end: bool) -> Self {
        let mut out = *self;
        if let Some(dir) = self.direction().try_normalize(f64::EPSILON) {
            let step = dir * dist;
            if from_end {
                out.b += step;
            }
            if from_start {
                out.a -= step;
            }
        }
        out
    }

    /// Intersection point of two segments, or `None` when they are parallel
    /// or meet outside either segment's extent.
    ///
    /// Endpoint contact counts as an intersection; the parameter range is
    /// widened by a small relative slack so that joints produced by earlier
    /// floating-point arithmetic still register.
    pub fn intersection(&self, other: &Self) -> Option<Point2> {
        const SLACK: f64 = 1e-9;

        let d1 = self.direction();
        let d2 = other.direction();
        let denom = d1.perp(&d2);
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let offset = other.a - self.a;
        let t = offset.perp(&d2) / denom;
        let u = offset.perp(&d1) / denom;
        if (-SLACK..=1.0 + SLACK).contains(&t) && (-SLACK..=1.0 + SLACK).contains(&u) {
            Some(self.a + d1 * t)
        } else {
            None
        }
    }

    /// Intersection of the infinite lines through two segments, or `None`
    /// when they are parallel.
    ///
    /// Unlike [`intersection`](Self::intersection) the crossing may lie
    /// anywhere along either line, beyond both segments' extents.
    pub fn line_intersection(&self, other: &Self) -> Option<Point2> {
        let d1 = self.direction();
        let d2 = other.direction();
        let denom = d1.perp(&d2);
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let offset = other.a - self.a;
        let t = offset.perp(&d2) / denom;
        Some(self.a + d1 * t)
    }

    /// Tests whether two segments properly cross, with contact closer than
    /// `tolerance` to either of `self`'s endpoints ignored.
    pub fn crosses(&self, other: &Self, tolerance: f64) -> bool {
        match self.intersection(other) {
            Some(p) => {
                !same_same(&p, &self.a, tolerance) && !same_same(&p, &self.b, tolerance)
            }
            None => false,
        }
    }
}
