//! # Toolpath Planner
//!
//! Hierarchical path planning for one layer of an FDM print.
//!
//! The planner consumes a layer's outline loops, inset loops and other
//! labeled paths, organizes them into nested containment trees, and emits
//! every extrusion as an ordered [`LabeledOpenPaths`] sequence that:
//!
//! - groups work by region, finishing each outline island before moving on,
//! - orders path classes by label priority,
//! - breaks remaining ties by travel distance from the last emitted point,
//! - and only chains paths together when the connecting move stays inside
//!   the region's boundaries.
//!
//! ## Structure
//!
//! [`ContainmentTree`] is the generic spatial tree; [`OutlineTree`] nests
//! outline islands, each holding an [`InsetTree`] of its perimeter shells.
//! Paths that are neither outlines nor insets live in [`SpatialGraph`]s
//! attached to the deepest enclosing node. Traversal is destructive: the
//! trees drain themselves while emitting, bounding peak memory on large
//! layers.
//!
//! [`LayerPlanner`] is the public entry point:
//!
//! ```
//! use toolpath_core::{point::point2, Loop, PathLabel, PlannerConfig};
//! use toolpath_planner::LayerPlanner;
//!
//! let mut planner = LayerPlanner::new(PlannerConfig::default());
//! let outline = Loop::new(vec![
//!     point2(0.0, 0.0),
//!     point2(10.0, 0.0),
//!     point2(10.0, 10.0),
//!     point2(0.0, 10.0),
//! ]);
//! let shell = Loop::new(vec![
//!     point2(1.0, 1.0),
//!     point2(9.0, 1.0),
//!     point2(9.0, 9.0),
//!     point2(1.0, 9.0),
//! ]);
//! planner.add_boundary_loop(outline).unwrap();
//! planner.add_loop(shell, PathLabel::inset(0, 10)).unwrap();
//!
//! let mut result = Vec::new();
//! planner.optimize(&mut result);
//! assert_eq!(result.len(), 1);
//! ```
//!
//! [`LabeledOpenPaths`]: toolpath_core::LabeledOpenPaths

pub mod boundary;
pub mod graph;
pub mod inset_tree;
pub mod outline_tree;
pub mod planner;
pub mod tree;

pub use boundary::BoundarySet;
pub use graph::SpatialGraph;
pub use inset_tree::{InsetNode, InsetTree};
pub use outline_tree::{OutlineNode, OutlineTree};
pub use planner::LayerPlanner;
pub use tree::ContainmentTree;
