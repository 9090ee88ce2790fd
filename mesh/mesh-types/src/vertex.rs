//! Mesh vertex.

use nalgebra::Point3;

/// A mesh vertex.
///
/// Generated toy models carry no per-vertex attributes the slicer uses, so a
/// vertex is just its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model (or bed) space.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a vertex at the given position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.position.z, 3.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Whether every coordinate is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_array() {
        let v = Vertex::from([1.0, 2.0, 3.0]);
        assert_eq!(v, Vertex::from_coords(1.0, 2.0, 3.0));
    }

    #[test]
    fn non_finite_detected() {
        assert!(Vertex::from_coords(0.0, 1.0, 2.0).is_finite());
        assert!(!Vertex::from_coords(f64::NAN, 1.0, 2.0).is_finite());
        assert!(!Vertex::from_coords(0.0, f64::INFINITY, 2.0).is_finite());
    }
}
