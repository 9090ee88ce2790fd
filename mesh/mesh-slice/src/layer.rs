//! Layer types for sliced meshes.

use mesh_types::Point3;

/// A straight cut through one triangle, lying in a single Z plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub start: Point3<f64>,
    /// Second endpoint.
    pub end: Point3<f64>,
}

impl Segment {
    /// Create a segment.
    #[must_use]
    pub const fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Length in the XY plane.
    #[must_use]
    pub fn length(&self) -> f64 {
        planar_distance(&self.start, &self.end)
    }
}

/// Distance between two points ignoring Z.
#[inline]
#[must_use]
pub fn planar_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// A closed loop of points at one layer height.
///
/// The last point repeats the first (exactly after collinear merging, within
/// the link tolerance otherwise).
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Points in travel order, first and last coincide.
    pub points: Vec<Point3<f64>>,
}

impl Contour {
    /// Wrap an already-closed point list.
    #[must_use]
    pub const fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Number of stored points, closing point included.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of distinct corners (the closing point is not counted).
    ///
    /// A merged square has four.
    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Whether first and last point are within `tolerance` of each other.
    #[must_use]
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => {
                planar_distance(first, last) < tolerance
            }
            _ => false,
        }
    }

    /// Total length of the loop.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| planar_distance(&w[0], &w[1]))
            .sum()
    }

    /// Signed shoelace area, positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let twice: f64 = self
            .points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum();
        twice / 2.0
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

/// Raw intersection segments of one layer, before linking.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSegments {
    /// Layer index, 0 is the lowest.
    pub index: usize,
    /// Plane height.
    pub z: f64,
    /// Segments in mesh face order.
    pub segments: Vec<Segment>,
}

/// A linked layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer index, 0 is the lowest.
    pub index: usize,
    /// Plane height.
    pub z: f64,
    /// Closed contours in discovery order.
    pub contours: Vec<Contour>,
    /// Open chains the linker dropped.
    pub discarded: usize,
}

impl Layer {
    /// True when no contour survived linking.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Number of contours.
    #[must_use]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Sum of all contour perimeters.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.contours.iter().map(Contour::perimeter).sum()
    }
}
