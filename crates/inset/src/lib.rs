//! # Toolpath Inset
//!
//! Single-step inward polygon offset for perimeter shell generation.
//!
//! Given the closed outline of a layer region as oriented segments, the
//! engine produces the polygon inset inward by a distance `d`:
//!
//! 1. Build the inward bisector at every vertex.
//! 2. Drop segments that collapse before reaching depth `d` (the altitude
//!    of the triangle spanned by the segment and the crossing of its two
//!    bisector lines is below `d`).
//! 3. Translate the survivors inward by `d` along their normals.
//! 4. Re-join the ring: convex vertices are mitered by trimming the
//!    adjacent offsets to their intersection, reflex vertices are closed
//!    with a straight bridging segment between the untrimmed offset
//!    endpoints.
//! 5. Merge segments shorter than the caller's cutoff into their
//!    successors.
//!
//! The one-shot entry point is [`inset`]; [`Insetter`] carries state across
//! repeated calls and can trace every pipeline stage to an OpenSCAD file
//! for visual debugging (see [`ScadDump`]).
//!
//! ```
//! use toolpath_core::{point::point2, Loop};
//! use toolpath_inset::inset;
//!
//! let square = Loop::new(vec![
//!     point2(0.0, 0.0),
//!     point2(10.0, 0.0),
//!     point2(10.0, 10.0),
//!     point2(0.0, 10.0),
//! ]);
//! let shell = inset(&square.to_segments(), 1.0, 0.01).unwrap();
//! assert_eq!(shell.len(), 4);
//! ```

pub mod engine;
pub mod scad;

pub use engine::{inset, Insetter};
pub use scad::ScadDump;
