//! Printer and process profiles.
//!
//! A [`PrinterProfile`] carries the bed size, nozzle and filament geometry,
//! speeds, temperatures and the literal start/end G-code for one printer. It
//! is the only configuration a slice job takes. Profiles come from a built-in
//! [`preset`] or from JSON.
//!
//! # Example
//!
//! ```
//! use print_profile::{preset, PrinterProfile};
//!
//! let kobra = preset("kobra-2-pro").unwrap();
//! assert_eq!(kobra.temperatures.nozzle, 200);
//!
//! let json = kobra.to_json_pretty().unwrap();
//! let back = PrinterProfile::from_json_str(&json).unwrap();
//! assert_eq!(back, kobra);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod presets;
mod profile;

pub use error::{ProfileError, ProfileResult};
pub use presets::{kobra_2_pro, preset, universal, PRESET_NAMES};
pub use profile::{AutoScale, BedSize, PrinterProfile, Retraction, Speeds, Temperatures};
