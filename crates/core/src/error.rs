//! Error types for the toolpath engine.

use thiserror::Error;

/// Errors raised by the inset engine and the hierarchical planner.
///
/// Inset failures are scoped to the single loop being inset; callers
/// typically log them and continue with the rest of the layer. Containment
/// violations indicate a broken caller contract and should propagate.
#[derive(Debug, Error)]
pub enum Error {
    /// Consecutive segments of a supposedly closed polygon do not share a
    /// vertex within tolerance.
    #[error("polygon not closed at segment {index}: gap of {gap}")]
    OpenPolygon {
        /// Index of the segment whose end is disconnected.
        index: usize,
        /// Distance between the disconnected endpoints.
        gap: f64,
    },

    /// Fewer than two segments can never form a closed polygon.
    #[error("{0} segment(s) cannot form a closed polygon")]
    TooFewSegments(usize),

    /// Every segment collapsed at the requested inset distance.
    #[error("polygon fully collapsed at the requested inset distance")]
    CollapsedPolygon,

    /// A hierarchy insertion was attempted where neither tree contains the
    /// other.
    #[error("containment violated: {0}")]
    Containment(&'static str),

    /// Debug-dump I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the engine.
pub type Result<T> = std::result::Result<T, Error>;
