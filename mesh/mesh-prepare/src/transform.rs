//! 3D transformation matrix operations.

use mesh_types::{IndexedMesh, Point3};
use nalgebra::{Matrix4, Vector3};

/// A 3D transformation represented as a 4x4 matrix.
///
/// Preparation composes orientation, scaling and placement into one of these
/// so callers can see exactly what was applied to their mesh.
///
/// # Example
///
/// ```
/// use mesh_prepare::Transform3D;
/// use mesh_types::Point3;
///
/// let translate = Transform3D::translation(1.0, 2.0, 3.0);
/// let scale = Transform3D::uniform_scale(2.0);
/// let combined = scale.then(&translate);
///
/// let p = combined.transform_point(&Point3::new(1.0, 1.0, 1.0));
/// assert_eq!(p, Point3::new(3.0, 4.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create a new transformation from a 4x4 matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// The identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// A translation.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::from_translation(Vector3::new(tx, ty, tz))
    }

    /// A translation from a vector.
    #[must_use]
    pub fn from_translation(v: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&v),
        }
    }

    /// A uniform scaling about the origin.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix4::new_scaling(factor),
        }
    }

    /// A rotation around the X axis by `angle` radians.
    #[must_use]
    pub fn rotation_x(angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            1.0,   0.0,    0.0, 0.0,
            0.0, cos_a, -sin_a, 0.0,
            0.0, sin_a,  cos_a, 0.0,
            0.0,   0.0,    0.0, 1.0,
        );
        Self { matrix }
    }

    /// Quarter turn about X taking a Y-up model into Z-up printer space.
    ///
    /// Maps `(x, y, z)` to `(x, -z, y)`: the source up direction becomes +Z
    /// and the source front (+Z) faces -Y. Entries are exact, unlike
    /// `rotation_x(FRAC_PI_2)`.
    #[must_use]
    pub fn y_up_to_z_up() -> Self {
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            1.0, 0.0,  0.0, 0.0,
            0.0, 0.0, -1.0, 0.0,
            0.0, 1.0,  0.0, 0.0,
            0.0, 0.0,  0.0, 1.0,
        );
        Self { matrix }
    }

    /// The underlying 4x4 matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Compose this transformation with another.
    ///
    /// The result applies `self` first, then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Whether every matrix entry is within `epsilon` of the identity.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.matrix - Matrix4::identity()).amax() <= epsilon
    }

    /// Transform a point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Apply this transformation to every vertex, returning a new mesh.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &IndexedMesh) -> IndexedMesh {
        let mut result = mesh.clone();
        for vertex in &mut result.vertices {
            vertex.position = self.transform_point(&vertex.position);
        }
        result
    }
}
