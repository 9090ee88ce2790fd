//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

/// A triangle with concrete vertex positions.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Create a triangle from coordinate arrays.
    #[inline]
    #[must_use]
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Point3::from(v0),
            v1: Point3::from(v1),
            v2: Point3::from(v2),
        }
    }

    /// The three edges in winding order: `v0→v1`, `v1→v2`, `v2→v0`.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Unnormalized face normal (cross product of two edges).
    ///
    /// Its magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Triangle area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Lowest and highest Z of the three vertices.
    #[inline]
    #[must_use]
    pub fn z_range(&self) -> (f64, f64) {
        let min = self.v0.z.min(self.v1.z).min(self.v2.z);
        let max = self.v0.z.max(self.v1.z).max(self.v2.z);
        (min, max)
    }

    /// Check if the triangle is degenerate (area at or below `epsilon`).
    ///
    /// Collinear and repeated-vertex triangles are degenerate.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.area() <= epsilon
    }
}
