//! Core mesh types for the toy slicer.
//!
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh, either indexed or built from a triangle soup
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! Coordinates are `f64`. Once a mesh has been prepared for printing, all
//! downstream crates assume millimeters in bed space.
//!
//! # Coordinate System
//!
//! Printer space is **right-handed and Z-up**:
//! - X: bed width (left/right)
//! - Y: bed depth (front/back)
//! - Z: height above the build plate
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology};
//!
//! // Three vertices, implicit triangulation
//! let soup = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0];
//! let mesh = IndexedMesh::from_triangle_soup(&soup);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{IndexedMesh, cube, unit_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
