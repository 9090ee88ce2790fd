//! Naive mesh-to-G-code slicer.
//!
//! Turns a triangle mesh into a single-wall, infill-free G-code program:
//!
//! 1. **Load** an STL file ([`mesh_io`])
//! 2. **Prepare** it for the bed: rotate Y-up sources, auto-scale, center and
//!    drop to Z = 0 ([`mesh_prepare`])
//! 3. **Slice** at evenly spaced planes and **link** the segments into closed
//!    contours ([`mesh_slice`])
//! 4. **Emit** G-code for a printer profile ([`print_gcode`], [`print_profile`])
//!
//! [`SliceJob`] runs the whole pipeline and reports progress and statistics.
//!
//! # Quick Start
//!
//! ```
//! use toy_slicer::prelude::*;
//!
//! let job = SliceJob::new(kobra_2_pro(), JobOptions::default()).unwrap();
//! let output = job.run(&cube(20.0), |_| {}).unwrap();
//!
//! assert_eq!(output.stats.layers, 100);
//! let summary = GcodeSummary::scan(&output.gcode.text);
//! assert_eq!(summary.layers, 100);
//! ```
//!
//! # Crates
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`mesh_types`] | Indexed meshes, triangles, bounds |
//! | [`mesh_io`] | STL read/write |
//! | [`mesh_prepare`] | Bed placement and scaling |
//! | [`mesh_slice`] | Plane intersection and contour linking |
//! | [`print_profile`] | Printer profiles and presets |
//! | [`print_gcode`] | G-code emission and summaries |

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod job;
mod progress;
mod stats;

pub use error::{JobError, JobResult};
pub use job::{JobOptions, SliceJob, SliceOutput};
pub use progress::Progress;
pub use stats::SliceStats;

pub use mesh_io;
pub use mesh_prepare;
pub use mesh_slice;
pub use mesh_types;
pub use print_gcode;
pub use print_profile;

/// Common imports for slicing.
pub mod prelude {
    pub use crate::{JobError, JobOptions, JobResult, SliceJob, SliceOutput, SliceStats};

    pub use mesh_io::{load_mesh, save_mesh, LoadError};
    pub use mesh_prepare::{prepare_mesh, PrepareParams, PreparedMesh, UpAxis};
    pub use mesh_slice::{slice_layers, Contour, Layer, SliceParams};
    pub use mesh_types::{cube, unit_cube, Aabb, IndexedMesh, MeshBounds, MeshTopology};
    pub use print_gcode::{GcodeEmitter, GcodeProgram, GcodeSummary};
    pub use print_profile::{kobra_2_pro, preset, universal, PrinterProfile};
}
