//! Configuration for the planning engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerances and policies shared by the inset engine and the planner.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// General geometric comparison tolerance, in model units.
    pub tolerance: f64,

    /// Tolerance for the closed-polygon adjacency probe: consecutive
    /// segments whose shared vertex is farther apart than this fail the
    /// inset with an open-polygon error.
    pub coincidence_tolerance: f64,

    /// Inset output segments shorter than this are merged into their
    /// successor.
    pub short_segment_cutoff: f64,

    /// Miter rays are elongated by this multiple of the inset distance to
    /// guarantee an intersection for nearly parallel edges.
    pub elongation_factor: f64,

    /// Where the extruder starts the layer; seeds the planner's history
    /// point.
    pub home_position: (f64, f64),
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            coincidence_tolerance: 1e-4,
            short_segment_cutoff: 0.01,
            elongation_factor: 100.0,
            home_position: (0.0, 0.0),
        }
    }
}

impl PlannerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the geometric comparison tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the closed-polygon adjacency tolerance.
    pub fn with_coincidence_tolerance(mut self, tolerance: f64) -> Self {
        self.coincidence_tolerance = tolerance;
        self
    }

    /// Sets the short-segment merge cutoff.
    pub fn with_short_segment_cutoff(mut self, cutoff: f64) -> Self {
        self.short_segment_cutoff = cutoff;
        self
    }

    /// Sets the ray elongation factor.
    pub fn with_elongation_factor(mut self, factor: f64) -> Self {
        self.elongation_factor = factor;
        self
    }

    /// Sets the extruder home position.
    pub fn with_home_position(mut self, x: f64, y: f64) -> Self {
        self.home_position = (x, y);
        self
    }
}
