//! Mesh preparation for printing.
//!
//! Takes a mesh in whatever units and orientation it was generated in and
//! places it in printer space:
//!
//! - Y-up sources rotated Z-up
//! - Tiny meshes upscaled, oversized meshes shrunk to fit the bed
//! - Centered on the bed with its lowest point on the build plate
//!
//! The applied [`Transform3D`] is returned alongside the new mesh.
//!
//! # Example
//!
//! ```
//! use mesh_prepare::{prepare_mesh, PrepareParams, UpAxis};
//! use mesh_types::cube;
//!
//! let params = PrepareParams::default().with_up_axis(UpAxis::Y);
//! let prepared = prepare_mesh(&cube(20.0), &params).unwrap();
//!
//! assert!((prepared.bounds.center().x - 110.0).abs() < 1e-9);
//! assert!(prepared.bounds.min.z.abs() < 1e-9);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod params;
mod prepare;
mod transform;

pub use error::{PrepareError, PrepareResult};
pub use params::{PrepareParams, UpAxis};
pub use prepare::{prepare_mesh, PreparedMesh};
pub use transform::Transform3D;
