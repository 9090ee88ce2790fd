//! Planar slicing of triangle meshes.
//!
//! A mesh is cut by horizontal planes one layer height apart. Each plane
//! yields a bag of line segments, one per crossing triangle, which the linker
//! chains into closed contours.
//!
//! - [`intersect_edge`] / [`intersect_triangle`]: plane crossings
//! - [`LayerPlan`]: where the planes go
//! - [`LayerSlicer`]: lazy or parallel per-layer segments
//! - [`link_segments`]: greedy chaining into [`Contour`]s
//!
//! Triangles that do not cut a plane cleanly and chains that never close are
//! skipped, not reported as errors; [`Layer::discarded`] counts the latter.
//!
//! # Example
//!
//! ```
//! use mesh_types::cube;
//! use mesh_slice::{LayerSlicer, SliceParams};
//!
//! let mesh = cube(10.0);
//! let slicer = LayerSlicer::new(&mesh, &SliceParams::default()).unwrap();
//!
//! for segments in slicer.layers().take(3) {
//!     let layer = slicer.link(&segments);
//!     assert_eq!(layer.contours.len(), 1);
//! }
//! ```
//!
//! # Coordinate System
//!
//! Z is the print direction. Meshes are expected to be in printer space
//! already (see `mesh-prepare`).

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod intersect;
mod layer;
mod link;
mod params;
mod slicer;

pub use error::{SliceError, SliceResult};
pub use intersect::{intersect_edge, intersect_triangle};
pub use layer::{planar_distance, Contour, Layer, LayerSegments, Segment};
pub use link::{link_segments, LinkOutcome};
pub use params::{LinkParams, SliceParams};
pub use slicer::{slice_layers, LayerPlan, LayerSlicer};
