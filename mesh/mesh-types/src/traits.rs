//! Traits for mesh types.

use crate::{Aabb, Triangle};

/// Minimal read-only view of a triangle mesh.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of faces (triangles).
    fn face_count(&self) -> usize;

    /// A mesh is empty when it has no vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Triangle for a face index with resolved vertex positions.
    ///
    /// Returns `None` if the face index, or any vertex index it refers to, is
    /// out of bounds.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all triangles with resolved vertex positions.
    ///
    /// Faces referring to out-of-range vertices are skipped.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types that can compute an axis-aligned bounding box.
pub trait MeshBounds {
    /// Compute the bounding box. Empty if there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Compute the bounding box, returning `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }
}
