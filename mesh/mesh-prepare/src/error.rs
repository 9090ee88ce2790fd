//! Error types for mesh preparation.

use thiserror::Error;

/// Result type for preparation operations.
pub type PrepareResult<T> = Result<T, PrepareError>;

/// Errors that stop a mesh from being placed on the bed.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// Mesh has no vertices or no faces.
    #[error("mesh is empty: {vertices} vertices, {faces} faces")]
    EmptyMesh {
        /// Vertex count.
        vertices: usize,
        /// Face count.
        faces: usize,
    },

    /// A face refers to a vertex that does not exist.
    #[error("face {face} refers to vertex {index}, mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        /// Offending face.
        face: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Offending vertex.
        index: usize,
    },

    /// Bed dimensions leave no room once the margin is removed.
    #[error("printable envelope is {envelope} mm, bed and margin leave no room")]
    InvalidEnvelope {
        /// Computed envelope edge length.
        envelope: f64,
    },
}
