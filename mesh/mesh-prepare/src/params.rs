//! Preparation parameters.

/// Which source axis points up.
///
/// Generated models (glTF, most scene graphs) are Y-up; STL exports from CAD
/// are normally already Z-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpAxis {
    /// Source +Y is up and gets rotated onto +Z.
    Y,
    /// Source is already Z-up.
    #[default]
    Z,
}

/// Parameters for [`prepare_mesh`](crate::prepare_mesh).
///
/// All lengths in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareParams {
    /// Bed size along X.
    pub bed_width: f64,
    /// Bed size along Y.
    pub bed_depth: f64,
    /// Maximum build height.
    pub bed_height: f64,
    /// Up axis of the source mesh.
    pub up_axis: UpAxis,
    /// Meshes whose largest dimension is below this are upscaled.
    pub min_viable_size: f64,
    /// Largest dimension after upscaling.
    pub target_size: f64,
    /// Clearance kept on every side of the bed.
    pub bed_margin: f64,
}

impl Default for PrepareParams {
    fn default() -> Self {
        Self {
            bed_width: 220.0,
            bed_depth: 220.0,
            bed_height: 250.0,
            up_axis: UpAxis::Z,
            min_viable_size: 10.0,
            target_size: 60.0,
            bed_margin: 10.0,
        }
    }
}

impl PrepareParams {
    /// Edge of the cube a mesh must fit in: the smallest bed dimension minus
    /// the margin on both sides.
    #[must_use]
    pub fn envelope(&self) -> f64 {
        self.bed_width.min(self.bed_depth).min(self.bed_height) - 2.0 * self.bed_margin
    }

    /// Set the bed dimensions.
    #[must_use]
    pub const fn with_bed(mut self, width: f64, depth: f64, height: f64) -> Self {
        self.bed_width = width;
        self.bed_depth = depth;
        self.bed_height = height;
        self
    }

    /// Set the source up axis.
    #[must_use]
    pub const fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// Set the upscale threshold and target.
    #[must_use]
    pub const fn with_auto_scale(mut self, min_viable_size: f64, target_size: f64) -> Self {
        self.min_viable_size = min_viable_size;
        self.target_size = target_size;
        self
    }

    /// Set the bed margin.
    #[must_use]
    pub const fn with_bed_margin(mut self, margin: f64) -> Self {
        self.bed_margin = margin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_envelope() {
        let params = PrepareParams::default();
        assert!((params.envelope() - 200.0).abs() < 1e-12);
        assert_eq!(params.up_axis, UpAxis::Z);
    }

    #[test]
    fn builders() {
        let params = PrepareParams::default()
            .with_bed(200.0, 180.0, 300.0)
            .with_bed_margin(5.0)
            .with_up_axis(UpAxis::Y)
            .with_auto_scale(5.0, 40.0);
        assert!((params.envelope() - 170.0).abs() < 1e-12);
        assert_eq!(params.up_axis, UpAxis::Y);
        assert!((params.target_size - 40.0).abs() < 1e-12);
    }
}
