//! G-code generation for single-wall prints.
//!
//! [`GcodeEmitter`] turns linked layers into Marlin-flavored G-code: absolute
//! positioning, absolute extrusion, one perimeter per contour, no infill and
//! no retraction inside the model. Extrusion is volumetric, see
//! [`extrusion_length`].
//!
//! [`GcodeSummary`] reads statistics back out of any G-code text.
//!
//! # Output conventions
//!
//! - Coordinates with 3 decimals, `E` with 5
//! - Feedrates in whole mm/min (profiles store mm/s)
//! - `; LAYER <n> Z=<z>` before each layer

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod emitter;
mod extrusion;
mod summary;

pub use emitter::{GcodeEmitter, GcodeProgram, MIN_MOVE};
pub use extrusion::{extrusion_length, filament_area};
pub use summary::GcodeSummary;
