//! Path labels and emission ordering.
//!
//! Every path handed to the planner carries a [`PathLabel`]: the role the
//! path plays in the layer plus a priority used to order emission. The
//! planner only ever compares labels through a caller-supplied comparator
//! so that front ends can impose their own total order;
//! [`default_label_order`] emits higher priorities first.

use std::cmp::Ordering;

use crate::polygon::Polyline;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The role a path plays within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathRole {
    /// A slice outline: a boundary that is never crossed, not an extrusion.
    Outline,
    /// Perimeter inset at the given depth (0 = outermost shell).
    Inset(u32),
    /// Sparse or solid infill.
    Infill,
    /// Support material.
    Support,
    /// Bridged extrusion over air.
    Bridge,
    /// Raft/bed-adhesion material.
    Raft,
}

impl PathRole {
    /// Returns true for [`PathRole::Outline`].
    #[inline]
    pub fn is_outline(&self) -> bool {
        matches!(self, PathRole::Outline)
    }

    /// Returns true for any [`PathRole::Inset`] depth.
    #[inline]
    pub fn is_inset(&self) -> bool {
        matches!(self, PathRole::Inset(_))
    }
}

/// Classification of a path: its role and emission priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathLabel {
    /// What the path is.
    pub role: PathRole,
    /// Emission priority; larger values are emitted earlier under the
    /// default order.
    pub priority: i32,
}

impl PathLabel {
    /// Creates a label.
    #[inline]
    pub fn new(role: PathRole, priority: i32) -> Self {
        Self { role, priority }
    }

    /// Convenience constructor for an outline label.
    #[inline]
    pub fn outline(priority: i32) -> Self {
        Self::new(PathRole::Outline, priority)
    }

    /// Convenience constructor for an inset label at `depth`.
    #[inline]
    pub fn inset(depth: u32, priority: i32) -> Self {
        Self::new(PathRole::Inset(depth), priority)
    }

    /// Returns true for outline labels.
    #[inline]
    pub fn is_outline(&self) -> bool {
        self.role.is_outline()
    }

    /// Returns true for inset labels.
    #[inline]
    pub fn is_inset(&self) -> bool {
        self.role.is_inset()
    }
}

impl Default for PathLabel {
    fn default() -> Self {
        Self::new(PathRole::Infill, 0)
    }
}

/// The planner's output: extrusion paths in emission order, each with the
/// label of the material it extrudes.
pub type LabeledOpenPaths = Vec<(Polyline, PathLabel)>;

/// Default emission order: higher priority first; equal priorities compare
/// equal regardless of role, leaving the tie to entry-point distance.
pub fn default_label_order(a: &PathLabel, b: &PathLabel) -> Ordering {
    b.priority.cmp(&a.priority)
}
