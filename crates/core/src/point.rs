//! 2D point and vector types with tolerance helpers.

use nalgebra as na;

/// A 2D point in layer coordinates.
pub type Point2 = na::Point2<f64>;

/// A 2D displacement vector.
pub type Vector2 = na::Vector2<f64>;

/// Shorthand constructor for a [`Point2`].
#[inline]
pub fn point2(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    na::distance(a, b)
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_squared(a: &Point2, b: &Point2) -> f64 {
    na::distance_squared(a, b)
}

/// Tests whether two points coincide within `tolerance`.
///
/// The comparison is done on squared distance, so `tolerance` must be
/// non-negative.
#[inline]
pub fn same_same(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    na::distance_squared(a, b) <= tolerance * tolerance
}
