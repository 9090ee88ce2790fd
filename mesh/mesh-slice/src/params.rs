//! Slicing parameters.

/// How intersection segments are chained into contours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkParams {
    /// Endpoints closer than this (mm, in XY) are the same point.
    pub tolerance: f64,

    /// Drop interior points of straight runs after linking.
    pub merge_collinear: bool,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            merge_collinear: true,
        }
    }
}

/// Parameters for slicing operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceParams {
    /// Layer height in mm.
    pub layer_height: f64,

    /// Contour linking.
    pub link: LinkParams,

    /// Slice and link layers on the rayon pool.
    pub parallel: bool,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            link: LinkParams::default(),
            parallel: false,
        }
    }
}

impl SliceParams {
    /// Set layer height.
    #[must_use]
    pub const fn with_layer_height(mut self, height: f64) -> Self {
        self.layer_height = height;
        self
    }

    /// Set the endpoint matching tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.link.tolerance = tolerance;
        self
    }

    /// Enable or disable collinear point merging.
    #[must_use]
    pub const fn with_merge_collinear(mut self, merge: bool) -> Self {
        self.link.merge_collinear = merge;
        self
    }

    /// Enable or disable parallel slicing.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
