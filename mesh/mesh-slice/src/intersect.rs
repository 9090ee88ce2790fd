//! Plane intersection of edges and triangles.

use mesh_types::{Point3, Triangle};

use crate::layer::{planar_distance, Segment};

/// Hits closer than this on one triangle are the same point (a vertex on the plane).
const COINCIDENT_EPS: f64 = 1e-9;

/// Intersect the edge `p0 → p1` with the horizontal plane at `plane_z`.
///
/// Endpoints on the plane count as crossing. Edges with both endpoints at
/// exactly the same height never intersect, even when they lie in the plane.
///
/// # Example
///
/// ```
/// use mesh_slice::intersect_edge;
/// use mesh_types::Point3;
///
/// let p = intersect_edge(&Point3::new(0.0, 0.0, 0.0), &Point3::new(4.0, 0.0, 2.0), 1.0);
/// assert_eq!(p, Some(Point3::new(2.0, 0.0, 1.0)));
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
// Exact comparison: only perfectly flat edges are excluded
pub fn intersect_edge(p0: &Point3<f64>, p1: &Point3<f64>, plane_z: f64) -> Option<Point3<f64>> {
    let (z0, z1) = (p0.z, p1.z);
    let straddles = (z0 <= plane_z && plane_z <= z1) || (z1 <= plane_z && plane_z <= z0);
    if !straddles || z0 == z1 {
        return None;
    }

    let t = (plane_z - z0) / (z1 - z0);
    let mut hit = p0 + (p1 - p0) * t;
    hit.z = plane_z;
    Some(hit)
}

/// Intersect a triangle with the horizontal plane at `plane_z`.
///
/// Returns a segment only when the plane cuts the triangle in exactly two
/// distinct points. Triangles entirely above or below, lying in the plane,
/// or touching it at a single vertex yield `None`.
///
/// An edge lying in the plane is reported only by a triangle whose third
/// vertex is below the plane, so the edge shared by two wall triangles
/// yields one segment, not two.
///
/// Segment direction follows the triangle's edge order.
#[must_use]
#[allow(clippy::float_cmp)]
// Exact comparison: matches the flat-edge test in `intersect_edge`
pub fn intersect_triangle(triangle: &Triangle, plane_z: f64) -> Option<Segment> {
    let (lo, hi) = triangle.z_range();
    if lo > plane_z || hi < plane_z {
        return None;
    }

    let on_plane = [triangle.v0.z, triangle.v1.z, triangle.v2.z]
        .iter()
        .filter(|&&z| z == plane_z)
        .count();
    if on_plane == 2 && hi > plane_z {
        return None;
    }

    let mut hits = [Point3::origin(); 3];
    let mut count = 0;
    for (a, b) in triangle.edges() {
        let Some(p) = intersect_edge(&a, &b, plane_z) else {
            continue;
        };
        if hits[..count]
            .iter()
            .any(|q| planar_distance(q, &p) <= COINCIDENT_EPS)
        {
            continue;
        }
        hits[count] = p;
        count += 1;
    }

    (count == 2).then(|| Segment::new(hits[0], hits[1]))
}
