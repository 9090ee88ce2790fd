//! Orientation, auto-scaling and bed placement.

use mesh_types::{Aabb, IndexedMesh, MeshBounds};
use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::error::{PrepareError, PrepareResult};
use crate::params::{PrepareParams, UpAxis};
use crate::transform::Transform3D;

/// A mesh placed in printer space.
#[derive(Debug, Clone)]
pub struct PreparedMesh {
    /// The transformed copy, Z-up, min Z at zero, centered on the bed.
    pub mesh: IndexedMesh,
    /// Everything applied to the source mesh, in order.
    pub transform: Transform3D,
    /// Uniform scale applied, 1.0 when the mesh already fit.
    pub scale_factor: f64,
    /// Bounds of [`PreparedMesh::mesh`].
    pub bounds: Aabb,
}

/// Orient, scale and place a mesh on the bed.
///
/// The source mesh is not modified. Steps:
///
/// 1. Reject meshes with no vertices or faces, out-of-range indices, or
///    non-finite coordinates.
/// 2. Rotate Y-up sources so +Y becomes +Z.
/// 3. Upscale tiny meshes to `target_size`, downscale meshes larger than the
///    envelope to fit it. Scaling is always uniform.
/// 4. Center XY on the bed and drop min Z to the build plate.
///
/// # Errors
///
/// Returns [`PrepareError`] for empty or malformed meshes and for bed
/// settings that leave no printable envelope.
///
/// # Example
///
/// ```
/// use mesh_prepare::{prepare_mesh, PrepareParams};
/// use mesh_types::unit_cube;
///
/// let prepared = prepare_mesh(&unit_cube(), &PrepareParams::default()).unwrap();
/// assert!((prepared.scale_factor - 60.0).abs() < 1e-9);
/// assert!(prepared.bounds.min.z.abs() < 1e-9);
/// ```
pub fn prepare_mesh(mesh: &IndexedMesh, params: &PrepareParams) -> PrepareResult<PreparedMesh> {
    check_mesh(mesh)?;

    let envelope = params.envelope();
    if envelope.is_nan() || envelope <= 0.0 {
        return Err(PrepareError::InvalidEnvelope { envelope });
    }

    let mut transform = match params.up_axis {
        UpAxis::Y => Transform3D::y_up_to_z_up(),
        UpAxis::Z => Transform3D::identity(),
    };
    let mut working = transform.apply_to_mesh(mesh);

    let extent = working.bounds().max_extent();
    let scale_factor = match auto_scale(extent, envelope, params) {
        Some(factor) => {
            info!(extent, factor, "Rescaling mesh");
            let scale = Transform3D::uniform_scale(factor);
            working = scale.apply_to_mesh(&working);
            transform = transform.then(&scale);
            factor
        }
        None => 1.0,
    };

    let bounds = working.bounds();
    let center = bounds.center();
    let placement = Transform3D::from_translation(Vector3::new(
        params.bed_width / 2.0 - center.x,
        params.bed_depth / 2.0 - center.y,
        -bounds.min.z,
    ));
    working = placement.apply_to_mesh(&working);
    transform = transform.then(&placement);

    let mut bounds = working.bounds();
    if bounds.min.z < 0.0 {
        warn!(min_z = bounds.min.z, "Mesh below build plate after placement, lifting");
        let lift = Transform3D::translation(0.0, 0.0, -bounds.min.z);
        working = lift.apply_to_mesh(&working);
        transform = transform.then(&lift);
        bounds = working.bounds();
    }

    debug!(
        min = ?bounds.min,
        max = ?bounds.max,
        scale_factor,
        "Prepared mesh"
    );

    Ok(PreparedMesh {
        mesh: working,
        transform,
        scale_factor,
        bounds,
    })
}

fn check_mesh(mesh: &IndexedMesh) -> PrepareResult<()> {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return Err(PrepareError::EmptyMesh {
            vertices: mesh.vertices.len(),
            faces: mesh.faces.len(),
        });
    }

    if let Some((face, index)) = mesh.first_invalid_face() {
        return Err(PrepareError::IndexOutOfBounds {
            face,
            index,
            vertex_count: mesh.vertices.len(),
        });
    }

    if let Some(index) = mesh.vertices.iter().position(|v| !v.is_finite()) {
        return Err(PrepareError::NonFiniteVertex { index });
    }

    Ok(())
}

/// Uniform factor bringing `extent` into range, or `None` if it already is.
fn auto_scale(extent: f64, envelope: f64, params: &PrepareParams) -> Option<f64> {
    if extent > 0.0 && extent < params.min_viable_size {
        Some(params.target_size.min(envelope) / extent)
    } else if extent > envelope {
        Some(envelope / extent)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{cube, unit_cube, Vertex};

    /// Axis-aligned box with the given extents, min corner at `origin`.
    fn boxed(origin: [f64; 3], size: [f64; 3]) -> IndexedMesh {
        let mut mesh = unit_cube();
        for v in &mut mesh.vertices {
            for axis in 0..3 {
                v.position[axis] = origin[axis] + v.position[axis] * size[axis];
            }
        }
        mesh
    }

    fn assert_on_bed(prepared: &PreparedMesh, params: &PrepareParams) {
        let b = prepared.bounds;
        assert!(b.min.x >= 0.0 && b.max.x <= params.bed_width);
        assert!(b.min.y >= 0.0 && b.max.y <= params.bed_depth);
        assert!(b.min.z.abs() < 1e-9);
        assert!(b.max.z <= params.bed_height);
        assert_relative_eq!(b.center().x, params.bed_width / 2.0, epsilon = 1e-9);
        assert_relative_eq!(b.center().y, params.bed_depth / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn tiny_mesh_upscaled_to_target() {
        let params = PrepareParams::default();
        let prepared = prepare_mesh(&unit_cube(), &params).unwrap();

        assert_relative_eq!(prepared.scale_factor, 60.0, epsilon = 1e-9);
        assert_relative_eq!(prepared.bounds.max_extent(), 60.0, epsilon = 1e-9);
        assert_on_bed(&prepared, &params);
    }

    #[test]
    fn huge_mesh_downscaled_into_envelope() {
        let params = PrepareParams::default();
        let prepared = prepare_mesh(&cube(500.0), &params).unwrap();

        assert_relative_eq!(prepared.scale_factor, 0.4, epsilon = 1e-12);
        assert!(prepared.bounds.max_extent() <= params.envelope() + 1e-9);
        assert_on_bed(&prepared, &params);
    }

    #[test]
    fn mid_sized_mesh_keeps_scale() {
        let params = PrepareParams::default();
        let source = boxed([-30.0, 5.0, 12.0], [40.0, 20.0, 30.0]);
        let prepared = prepare_mesh(&source, &params).unwrap();

        assert_relative_eq!(prepared.scale_factor, 1.0);
        let size = prepared.bounds.size();
        assert_relative_eq!(size.x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(size.z, 30.0, epsilon = 1e-9);
        assert_on_bed(&prepared, &params);
    }

    #[test]
    fn y_up_source_stands_upright() {
        let params = PrepareParams::default().with_up_axis(UpAxis::Y);
        // Tall along Y
        let source = boxed([0.0, 0.0, 0.0], [20.0, 40.0, 30.0]);
        let prepared = prepare_mesh(&source, &params).unwrap();

        let size = prepared.bounds.size();
        assert_relative_eq!(size.x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(size.y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(size.z, 40.0, epsilon = 1e-9);
        assert_on_bed(&prepared, &params);
    }

    #[test]
    fn preparing_twice_is_identity() {
        let params = PrepareParams::default();
        let first = prepare_mesh(&boxed([3.0, -7.0, 2.0], [0.5, 0.8, 0.3]), &params).unwrap();
        let second = prepare_mesh(&first.mesh, &params).unwrap();

        assert!(second.transform.is_identity(1e-9));
        assert_relative_eq!(second.scale_factor, 1.0);
        for (a, b) in first.mesh.vertices.iter().zip(&second.mesh.vertices) {
            assert_relative_eq!(a.position, b.position, epsilon = 1e-9);
        }
    }

    #[test]
    fn transform_reproduces_output() {
        let source = boxed([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
        let prepared =
            prepare_mesh(&source, &PrepareParams::default().with_up_axis(UpAxis::Y)).unwrap();

        for (src, dst) in source.vertices.iter().zip(&prepared.mesh.vertices) {
            let p = prepared.transform.transform_point(&src.position);
            assert_relative_eq!(p, dst.position, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_mesh_rejected() {
        let err = prepare_mesh(&IndexedMesh::new(), &PrepareParams::default()).unwrap_err();
        assert!(matches!(err, PrepareError::EmptyMesh { .. }));

        let mut no_faces = IndexedMesh::new();
        no_faces.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        let err = prepare_mesh(&no_faces, &PrepareParams::default()).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::EmptyMesh {
                vertices: 1,
                faces: 0
            }
        ));
    }

    #[test]
    fn malformed_meshes_rejected() {
        let mut bad_index = unit_cube();
        bad_index.faces.push([0, 1, 8]);
        assert!(matches!(
            prepare_mesh(&bad_index, &PrepareParams::default()),
            Err(PrepareError::IndexOutOfBounds {
                face: 12,
                index: 8,
                ..
            })
        ));

        let mut nan = unit_cube();
        nan.vertices[3].position.y = f64::NAN;
        assert!(matches!(
            prepare_mesh(&nan, &PrepareParams::default()),
            Err(PrepareError::NonFiniteVertex { index: 3 })
        ));
    }

    #[test]
    fn margin_larger_than_bed_rejected() {
        let params = PrepareParams::default().with_bed_margin(200.0);
        assert!(matches!(
            prepare_mesh(&unit_cube(), &params),
            Err(PrepareError::InvalidEnvelope { .. })
        ));
    }
}
