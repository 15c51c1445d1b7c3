//! # Toolpath Core
//!
//! Core geometry primitives and shared types for the toolpath planning engine.
//!
//! This crate provides the foundation that the inset engine
//! (`toolpath-inset`) and the hierarchical path planner (`toolpath-planner`)
//! are built on:
//!
//! - **2D primitives**: [`Point2`], [`Vector2`], [`Segment2`]
//! - **Polygonal paths**: [`Polyline`] (open) and [`Loop`] (closed, oriented)
//! - **Robust predicates**: [`orient2d`], [`area_sign`] backed by Shewchuk's
//!   adaptive arithmetic
//! - **Path classification**: [`PathLabel`], [`PathRole`], [`LabeledOpenPaths`]
//! - **Configuration**: [`PlannerConfig`]
//! - **Errors**: [`Error`], [`Result`]
//!
//! ## Conventions
//!
//! All coordinates are `f64` in model units (millimeters for FDM printers).
//! Closed loops are oriented so that extrudable material lies to the *left*
//! of the direction of travel: solid outlines run counter-clockwise, hole
//! outlines run clockwise. Every geometric comparison is tolerant; the
//! tolerances live in [`PlannerConfig`].
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for labels and configs

pub mod config;
pub mod error;
pub mod label;
pub mod point;
pub mod polygon;
pub mod robust;
pub mod segment;

// Re-exports
pub use config::PlannerConfig;
pub use error::{Error, Result};
pub use label::{default_label_order, LabeledOpenPaths, PathLabel, PathRole};
pub use point::{distance, distance_squared, same_same, Point2, Vector2};
pub use polygon::{Loop, Polyline};
pub use robust::{area_sign, is_convex_vertex, orient2d, Orientation};
pub use segment::Segment2;
