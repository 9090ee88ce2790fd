//! The slice pipeline: load, prepare, slice, link, emit.

use std::path::Path;
use std::time::Instant;

use mesh_io::load_mesh;
use mesh_prepare::{prepare_mesh, PrepareParams, UpAxis};
use mesh_slice::{LayerSlicer, SliceParams};
use mesh_types::{Aabb, IndexedMesh, MeshTopology};
use print_gcode::{GcodeEmitter, GcodeProgram};
use print_profile::PrinterProfile;
use tracing::{debug, info, warn};

use crate::error::JobResult;
use crate::progress::{scaled, Progress};
use crate::stats::SliceStats;

/// Per-job settings that are not part of the printer profile.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOptions {
    /// Up axis of the input mesh.
    pub up_axis: UpAxis,
    /// Slice and link layers on the rayon pool.
    pub parallel: bool,
    /// Name reported in the stats.
    pub filename: String,
    /// Endpoint matching tolerance for contour linking, mm.
    pub link_tolerance: f64,
    /// Drop interior points of straight runs.
    pub merge_collinear: bool,
    /// Overrides the profile's layer height.
    pub layer_height: Option<f64>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            up_axis: UpAxis::Z,
            parallel: false,
            filename: "model.gcode".to_string(),
            link_tolerance: 1e-3,
            merge_collinear: true,
            layer_height: None,
        }
    }
}

impl JobOptions {
    /// Set the input up axis.
    #[must_use]
    pub const fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// Enable or disable parallel slicing.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the reported output name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the linking tolerance.
    #[must_use]
    pub const fn with_link_tolerance(mut self, tolerance: f64) -> Self {
        self.link_tolerance = tolerance;
        self
    }

    /// Enable or disable collinear merging.
    #[must_use]
    pub const fn with_merge_collinear(mut self, merge: bool) -> Self {
        self.merge_collinear = merge;
        self
    }

    /// Override the profile's layer height.
    #[must_use]
    pub const fn with_layer_height(mut self, height: f64) -> Self {
        self.layer_height = Some(height);
        self
    }
}

/// Result of a successful job.
#[derive(Debug, Clone)]
pub struct SliceOutput {
    /// The G-code program.
    pub gcode: GcodeProgram,
    /// Job statistics.
    pub stats: SliceStats,
    /// Uniform scale applied during preparation.
    pub scale_factor: f64,
    /// Bounds of the prepared mesh on the bed.
    pub bounds: Aabb,
}

/// A configured slice job.
///
/// The job owns its profile, with any layer height override already applied.
/// Running it never mutates the job, so one job can slice many meshes.
///
/// # Example
///
/// ```
/// use mesh_types::cube;
/// use print_profile::kobra_2_pro;
/// use toy_slicer::{JobOptions, SliceJob};
///
/// let job = SliceJob::new(kobra_2_pro(), JobOptions::default()).unwrap();
/// let output = job.run(&cube(10.0), |_| {}).unwrap();
///
/// assert_eq!(output.stats.layers, 50);
/// assert!(output.gcode.text.contains("; LAYER 0 Z=0.200"));
/// ```
#[derive(Debug, Clone)]
pub struct SliceJob {
    profile: PrinterProfile,
    options: JobOptions,
}

impl SliceJob {
    /// Configure a job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Profile`](crate::JobError::Profile) if the profile,
    /// with the layer height override applied, does not validate.
    pub fn new(mut profile: PrinterProfile, options: JobOptions) -> JobResult<Self> {
        if let Some(h) = options.layer_height {
            profile.layer_height = h;
        }
        profile.validate()?;
        Ok(Self { profile, options })
    }

    /// The effective printer profile.
    #[must_use]
    pub const fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    /// The job options.
    #[must_use]
    pub const fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Preparation parameters derived from the profile and options.
    #[must_use]
    pub fn prepare_params(&self) -> PrepareParams {
        let bed = &self.profile.bed;
        let auto = &self.profile.auto_scale;
        PrepareParams::default()
            .with_bed(bed.width, bed.depth, bed.max_height)
            .with_up_axis(self.options.up_axis)
            .with_auto_scale(auto.min_viable_size, auto.target_size)
            .with_bed_margin(auto.bed_margin)
    }

    /// Slicing parameters derived from the profile and options.
    #[must_use]
    pub fn slice_params(&self) -> SliceParams {
        SliceParams::default()
            .with_layer_height(self.profile.layer_height)
            .with_tolerance(self.options.link_tolerance)
            .with_merge_collinear(self.options.merge_collinear)
            .with_parallel(self.options.parallel)
    }

    /// Load a mesh file and slice it.
    ///
    /// Progress: 5 on start, 15 once the file is loaded, then as [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Load`](crate::JobError::Load) if the file cannot be
    /// read, otherwise as [`run`](Self::run).
    pub fn run_file<P, F>(&self, path: P, on_progress: F) -> JobResult<SliceOutput>
    where
        P: AsRef<Path>,
        F: FnMut(u8),
    {
        let started = Instant::now();
        let mut progress = Progress::new(on_progress);
        progress.report(5);

        let path = path.as_ref();
        let mesh = load_mesh(path)?;
        info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Loaded mesh"
        );
        progress.report(15);

        self.execute(&mesh, &mut progress, started)
    }

    /// Slice an in-memory mesh.
    ///
    /// Progress is reported through `on_progress` as a strictly increasing
    /// sequence of percentages ending at 100 on success: 20 after
    /// preparation, up to 80 while slicing, 90 once emitted.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Prepare`](crate::JobError::Prepare) for empty or
    /// malformed meshes and [`JobError::Slice`](crate::JobError::Slice) if
    /// slicing parameters are rejected.
    pub fn run<F: FnMut(u8)>(&self, mesh: &IndexedMesh, on_progress: F) -> JobResult<SliceOutput> {
        let started = Instant::now();
        let mut progress = Progress::new(on_progress);
        progress.report(5);
        self.execute(mesh, &mut progress, started)
    }

    fn execute<F: FnMut(u8)>(
        &self,
        mesh: &IndexedMesh,
        progress: &mut Progress<F>,
        started: Instant,
    ) -> JobResult<SliceOutput> {
        let prepared = prepare_mesh(mesh, &self.prepare_params())?;
        progress.report(20);

        let slicer = LayerSlicer::new(&prepared.mesh, &self.slice_params())?;
        let total = slicer.layer_count();
        let mut emitter = GcodeEmitter::new(&self.profile);
        let mut discarded = 0usize;

        if self.options.parallel {
            let layers = slicer.slice_all();
            progress.report(80);
            for layer in &layers {
                discarded += layer.discarded;
                emitter.emit_layer(layer);
            }
        } else {
            for (i, segments) in slicer.layers().enumerate() {
                let layer = slicer.link(&segments);
                discarded += layer.discarded;
                emitter.emit_layer(&layer);
                progress.report(scaled(20, 80, i + 1, total));
            }
            progress.report(80);
        }

        if discarded > 0 {
            warn!(discarded, "Open contour chains were dropped");
        }

        let gcode = emitter.finish();
        progress.report(90);

        let time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let stats = SliceStats {
            layers: gcode.layer_count,
            time_ms,
            filename: self.options.filename.clone(),
            filament_mm: gcode.filament_mm,
            estimated_minutes: gcode.estimated_minutes(),
            discarded_contours: discarded,
        };
        debug!(?stats, "Job finished");
        progress.report(100);

        Ok(SliceOutput {
            gcode,
            stats,
            scale_factor: prepared.scale_factor,
            bounds: prepared.bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::cube;
    use print_profile::{kobra_2_pro, universal};

    #[test]
    fn params_follow_profile() {
        let job = SliceJob::new(universal(), JobOptions::default().with_parallel(true)).unwrap();
        let prep = job.prepare_params();
        assert_eq!(prep.bed_width, 200.0);
        assert_eq!(prep.envelope(), 180.0);
        let slice = job.slice_params();
        assert_eq!(slice.layer_height, 0.28);
        assert!(slice.parallel);
    }

    #[test]
    fn layer_height_override() {
        let job = SliceJob::new(
            kobra_2_pro(),
            JobOptions::default().with_layer_height(0.5),
        )
        .unwrap();
        assert_eq!(job.profile().layer_height, 0.5);
        let output = job.run(&cube(10.0), |_| {}).unwrap();
        assert_eq!(output.stats.layers, 20);
    }

    #[test]
    fn rejects_bad_override() {
        let result = SliceJob::new(kobra_2_pro(), JobOptions::default().with_layer_height(-1.0));
        assert!(matches!(result, Err(crate::JobError::Profile(_))));
    }

    #[test]
    fn progress_reaches_100() {
        let job = SliceJob::new(kobra_2_pro(), JobOptions::default()).unwrap();
        let mut seen = Vec::new();
        job.run(&cube(10.0), |p| seen.push(p)).unwrap();
        assert_eq!(seen.first(), Some(&5));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!(seen.contains(&20) && seen.contains(&80) && seen.contains(&90));
    }

    #[test]
    fn stats_match_program() {
        let job = SliceJob::new(
            kobra_2_pro(),
            JobOptions::default().with_filename("cube.gcode"),
        )
        .unwrap();
        let output = job.run(&cube(10.0), |_| {}).unwrap();
        assert_eq!(output.stats.filename, "cube.gcode");
        assert_eq!(output.stats.layers, output.gcode.layer_count);
        assert_eq!(output.stats.filament_mm, output.gcode.filament_mm);
        assert_eq!(output.stats.discarded_contours, 0);
        assert_eq!(output.scale_factor, 1.0);
    }
}
