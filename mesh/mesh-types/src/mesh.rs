//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use nalgebra::Vector3;

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing vertices
/// by index. Meshes decoded without an index buffer are built with
/// [`IndexedMesh::from_triangle_soup`], which gives every triangle its own
/// three vertices.
///
/// Degenerate faces (zero area, repeated indices) are allowed; consumers skip
/// them. Out-of-range indices are not, see [`IndexedMesh::first_invalid_face`].
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from a flat position buffer and a flat index buffer.
    ///
    /// * `positions` - `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - `[a0, b0, c0, a1, b1, c1, ...]`
    ///
    /// Trailing values that do not form a full vertex or face are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Create a mesh from an unindexed triangle soup.
    ///
    /// Every three consecutive vertices form one triangle, the layout of a
    /// non-indexed position buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let soup = [
    ///     0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
    ///     0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0,
    /// ];
    /// let mesh = IndexedMesh::from_triangle_soup(&soup);
    /// assert_eq!(mesh.vertex_count(), 6);
    /// assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    pub fn from_triangle_soup(positions: &[f64]) -> Self {
        let vertices: Vec<Vertex> = positions
            .chunks_exact(9)
            .flat_map(|c| c.chunks_exact(3))
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = (0..vertices.len() / 3)
            .map(|t| {
                let base = (t * 3) as u32;
                [base, base + 1, base + 2]
            })
            .collect();

        Self { vertices, faces }
    }

    /// Find the first face referring to a vertex index that does not exist.
    ///
    /// Returns `(face_index, bad_vertex_index)`.
    #[must_use]
    pub fn first_invalid_face(&self) -> Option<(usize, u32)> {
        let count = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(face_index, face)| {
            face.iter()
                .find(|&&i| i as usize >= count)
                .map(|&i| (face_index, i))
        })
    }

    /// Translate the mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale the mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Append another mesh, offsetting its face indices.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces
            .extend(other.faces.iter().map(|f| f.map(|i| i + offset)));
    }

    fn resolve(&self, [i0, i1, i2]: [u32; 3]) -> Option<Triangle> {
        Some(Triangle {
            v0: self.vertices.get(i0 as usize)?.position,
            v1: self.vertices.get(i1 as usize)?.position,
            v2: self.vertices.get(i2 as usize)?.position,
        })
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces
            .get(face_index)
            .and_then(|&face| self.resolve(face))
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().filter_map(|&face| self.resolve(face))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Axis-aligned cube from the origin to `(size, size, size)`.
///
/// Eight shared vertices, twelve triangles, counter-clockwise winding seen
/// from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{cube, MeshBounds, MeshTopology};
///
/// let c = cube(10.0);
/// assert_eq!(c.face_count(), 12);
/// assert_eq!(c.bounds().max_extent(), 10.0);
/// ```
#[must_use]
pub fn cube(size: f64) -> IndexedMesh {
    let s = size;
    let vertices = vec![
        Vertex::from_coords(0.0, 0.0, 0.0),
        Vertex::from_coords(s, 0.0, 0.0),
        Vertex::from_coords(s, s, 0.0),
        Vertex::from_coords(0.0, s, 0.0),
        Vertex::from_coords(0.0, 0.0, s),
        Vertex::from_coords(s, 0.0, s),
        Vertex::from_coords(s, s, s),
        Vertex::from_coords(0.0, s, s),
    ];

    let faces = vec![
        // Bottom (-Z)
        [0, 2, 1],
        [0, 3, 2],
        // Top (+Z)
        [4, 5, 6],
        [4, 6, 7],
        // Front (-Y)
        [0, 1, 5],
        [0, 5, 4],
        // Back (+Y)
        [3, 7, 6],
        [3, 6, 2],
        // Left (-X)
        [0, 4, 7],
        [0, 7, 3],
        // Right (+X)
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(vertices, faces)
}

/// Cube from (0,0,0) to (1,1,1).
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    cube(1.0)
}
