//! Layer planning and per-layer slicing.

// Layer counts are small positive integers
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use mesh_types::{IndexedMesh, MeshTopology, Triangle};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{SliceError, SliceResult};
use crate::intersect::intersect_triangle;
use crate::layer::{Layer, LayerSegments};
use crate::link::link_segments;
use crate::params::SliceParams;

/// Slack absorbing float noise in `(max_z - min_z) / layer_height`.
const COUNT_EPS: f64 = 1e-9;

/// Z heights at which a mesh is cut.
///
/// Layer `i` sits at `min_z + (i + 1) * layer_height`; the last plane is
/// clamped to `max_z` so the top surface is always reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlan {
    /// Lowest mesh Z.
    pub min_z: f64,
    /// Highest mesh Z.
    pub max_z: f64,
    /// Distance between planes.
    pub layer_height: f64,
    /// Number of layers, `ceil((max_z - min_z) / layer_height)`.
    pub count: usize,
}

impl LayerPlan {
    /// Plan layers for a Z range.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_slice::LayerPlan;
    ///
    /// let plan = LayerPlan::new(0.0, 10.0, 0.2);
    /// assert_eq!(plan.count, 50);
    /// assert!((plan.z(0) - 0.2).abs() < 1e-12);
    /// assert_eq!(plan.z(49), 10.0);
    /// ```
    #[must_use]
    pub fn new(min_z: f64, max_z: f64, layer_height: f64) -> Self {
        let span = max_z - min_z;
        let count = if span > 0.0 {
            (span / layer_height - COUNT_EPS).ceil().max(1.0) as usize
        } else {
            0
        };
        Self {
            min_z,
            max_z,
            layer_height,
            count,
        }
    }

    /// Plane height of layer `index`.
    #[must_use]
    pub fn z(&self, index: usize) -> f64 {
        ((index + 1) as f64)
            .mul_add(self.layer_height, self.min_z)
            .min(self.max_z)
    }

    /// All plane heights, ascending.
    pub fn heights(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|i| self.z(i))
    }
}

/// Cuts a mesh into layers.
///
/// Holds a read-only copy of the mesh triangles so layers can be produced
/// lazily one at a time ([`LayerSlicer::layers`]) or all at once on the rayon
/// pool ([`LayerSlicer::par_layers`]). Both yield the same segments in the
/// same order.
#[derive(Debug, Clone)]
pub struct LayerSlicer {
    triangles: Vec<Triangle>,
    plan: LayerPlan,
    params: SliceParams,
}

impl LayerSlicer {
    /// Prepare to slice `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidLayerHeight`] or
    /// [`SliceError::InvalidTolerance`] for non-positive parameters, and
    /// [`SliceError::EmptyMesh`] when the mesh has no usable triangles.
    pub fn new(mesh: &IndexedMesh, params: &SliceParams) -> SliceResult<Self> {
        let h = params.layer_height;
        if !(h.is_finite() && h > 0.0) {
            return Err(SliceError::InvalidLayerHeight(h));
        }
        let tol = params.link.tolerance;
        if !(tol.is_finite() && tol > 0.0) {
            return Err(SliceError::InvalidTolerance(tol));
        }

        let triangles: Vec<Triangle> = mesh.triangles().collect();
        if triangles.is_empty() {
            return Err(SliceError::EmptyMesh);
        }

        let (min_z, max_z) = triangles
            .iter()
            .map(Triangle::z_range)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            });
        let plan = LayerPlan::new(min_z, max_z, h);

        debug!(
            triangles = triangles.len(),
            min_z,
            max_z,
            layers = plan.count,
            "Planned layers"
        );

        Ok(Self {
            triangles,
            plan,
            params: *params,
        })
    }

    /// The layer plan.
    #[must_use]
    pub const fn plan(&self) -> &LayerPlan {
        &self.plan
    }

    /// Number of layers.
    #[must_use]
    pub const fn layer_count(&self) -> usize {
        self.plan.count
    }

    /// Intersection segments of one layer, in mesh face order.
    #[must_use]
    pub fn segments_at(&self, index: usize) -> LayerSegments {
        let z = self.plan.z(index);
        let segments = self
            .triangles
            .iter()
            .filter_map(|t| intersect_triangle(t, z))
            .collect();
        LayerSegments { index, z, segments }
    }

    /// Layers in ascending Z, computed on demand.
    pub fn layers(&self) -> impl Iterator<Item = LayerSegments> + '_ {
        (0..self.plan.count).map(|i| self.segments_at(i))
    }

    /// All layers computed in parallel, returned in ascending Z.
    #[must_use]
    pub fn par_layers(&self) -> Vec<LayerSegments> {
        (0..self.plan.count)
            .into_par_iter()
            .map(|i| self.segments_at(i))
            .collect()
    }

    /// Link one layer's segments into contours.
    #[must_use]
    pub fn link(&self, layer: &LayerSegments) -> Layer {
        let outcome = link_segments(&layer.segments, &self.params.link);
        if outcome.discarded > 0 {
            debug!(
                layer = layer.index,
                z = layer.z,
                discarded = outcome.discarded,
                "Dropped open chains"
            );
        }
        Layer {
            index: layer.index,
            z: layer.z,
            contours: outcome.contours,
            discarded: outcome.discarded,
        }
    }

    /// Slice and link every layer, in parallel when the params ask for it.
    #[must_use]
    pub fn slice_all(&self) -> Vec<Layer> {
        if self.params.parallel {
            (0..self.plan.count)
                .into_par_iter()
                .map(|i| self.link(&self.segments_at(i)))
                .collect()
        } else {
            self.layers().map(|l| self.link(&l)).collect()
        }
    }
}

/// Slice a mesh into linked layers.
///
/// # Errors
///
/// See [`LayerSlicer::new`].
///
/// # Example
///
/// ```
/// use mesh_types::cube;
/// use mesh_slice::{slice_layers, SliceParams};
///
/// let layers = slice_layers(&cube(10.0), &SliceParams::default()).unwrap();
/// assert_eq!(layers.len(), 50);
/// assert_eq!(layers[0].contours[0].corner_count(), 4);
/// ```
pub fn slice_layers(mesh: &IndexedMesh, params: &SliceParams) -> SliceResult<Vec<Layer>> {
    let slicer = LayerSlicer::new(mesh, params)?;

    info!(
        layers = slicer.layer_count(),
        layer_height = params.layer_height,
        parallel = params.parallel,
        "Starting mesh slicing"
    );

    let layers = slicer.slice_all();

    let contours: usize = layers.iter().map(Layer::contour_count).sum();
    let discarded: usize = layers.iter().map(|l| l.discarded).sum();
    info!(layers = layers.len(), contours, discarded, "Slicing complete");

    Ok(layers)
}
