//! The printer/process profile record.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, ProfileResult};
use crate::presets;

/// Build volume in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedSize {
    /// Along X.
    pub width: f64,
    /// Along Y.
    pub depth: f64,
    /// Along Z.
    pub max_height: f64,
}

/// Feedrates in mm/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speeds {
    /// Extruding moves.
    pub print: f64,
    /// Non-extruding moves and layer changes.
    pub travel: f64,
    /// Multiplier on `print` for the first layer.
    pub first_layer_factor: f64,
}

/// Target temperatures in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperatures {
    /// Hotend.
    pub nozzle: u16,
    /// Heated bed.
    pub bed: u16,
}

/// Filament retraction used by the start/end blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Retraction {
    /// Length in mm.
    pub distance: f64,
    /// Speed in mm/s.
    pub speed: f64,
}

/// When and how far meshes are rescaled before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScale {
    /// Meshes whose largest dimension is below this are upscaled.
    pub min_viable_size: f64,
    /// Largest dimension after upscaling.
    pub target_size: f64,
    /// Clearance kept on every side of the bed.
    pub bed_margin: f64,
}

impl Default for BedSize {
    fn default() -> Self {
        Self {
            width: 220.0,
            depth: 220.0,
            max_height: 250.0,
        }
    }
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            print: 50.0,
            travel: 100.0,
            first_layer_factor: 1.0,
        }
    }
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            nozzle: 200,
            bed: 60,
        }
    }
}

impl Default for Retraction {
    fn default() -> Self {
        Self {
            distance: 2.0,
            speed: 45.0,
        }
    }
}

impl Default for AutoScale {
    fn default() -> Self {
        Self {
            min_viable_size: 10.0,
            target_size: 60.0,
            bed_margin: 10.0,
        }
    }
}

/// Everything a slice job needs to know about the printer and the process.
///
/// A profile is plain data. It is validated once and then passed by reference
/// to every stage.
///
/// Missing fields in JSON fall back to [`PrinterProfile::default`], at every
/// nesting level (`"speeds": { "print": 60 }` keeps the default travel speed),
/// except the G-code blocks: when omitted they are generated from the profile's own
/// temperatures and retraction.
///
/// `wall_count` and `infill_density` describe the intended process and are
/// reported, but the naive slicer always prints a single wall and no infill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterProfile {
    /// Display name.
    pub name: String,
    /// Build volume.
    pub bed: BedSize,
    /// Nozzle bore in mm.
    pub nozzle_diameter: f64,
    /// Filament diameter in mm.
    pub filament_diameter: f64,
    /// Layer height in mm.
    pub layer_height: f64,
    /// Perimeter count.
    pub wall_count: u32,
    /// Width of one deposited line in mm.
    pub wall_thickness: f64,
    /// Infill fraction, 0 to 1.
    pub infill_density: f64,
    /// Feedrates.
    pub speeds: Speeds,
    /// Temperatures.
    pub temperatures: Temperatures,
    /// Part cooling fan PWM from the second layer on, 0 keeps it off.
    pub fan_speed: u8,
    /// Retraction.
    pub retraction: Retraction,
    /// Auto-scaling thresholds.
    pub auto_scale: AutoScale,
    /// Emitted verbatim before the first layer.
    #[serde(default)]
    pub start_gcode: String,
    /// Emitted verbatim after the last layer.
    #[serde(default)]
    pub end_gcode: String,
}

impl Default for PrinterProfile {
    fn default() -> Self {
        presets::kobra_2_pro()
    }
}

impl PrinterProfile {
    /// Parse a profile from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Json`] for malformed input and
    /// [`ProfileError::InvalidField`] for out-of-range values.
    ///
    /// # Example
    ///
    /// ```
    /// use print_profile::PrinterProfile;
    ///
    /// let profile = PrinterProfile::from_json_str(r#"{ "name": "Mine", "layer_height": 0.3 }"#).unwrap();
    /// assert_eq!(profile.name, "Mine");
    /// assert!(profile.start_gcode.contains("M104 S200"));
    /// ```
    pub fn from_json_str(json: &str) -> ProfileResult<Self> {
        let mut profile: Self = serde_json::from_str(json)?;
        profile.fill_missing_blocks();
        profile.validate()?;
        Ok(profile)
    }

    /// Read a profile from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] if the file cannot be read, otherwise as
    /// [`PrinterProfile::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ProfileResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_json_str(&json)?;
        debug!(path = %path.display(), name = %profile.name, "Loaded printer profile");
        Ok(profile)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generate start/end blocks from this profile's values where they are empty.
    pub fn fill_missing_blocks(&mut self) {
        if self.start_gcode.trim().is_empty() {
            self.start_gcode = presets::universal_start_gcode(self);
        }
        if self.end_gcode.trim().is_empty() {
            self.end_gcode = presets::universal_end_gcode(self);
        }
    }

    /// Edge of the cube a prepared mesh must fit in.
    #[must_use]
    pub fn envelope(&self) -> f64 {
        self.bed.width.min(self.bed.depth).min(self.bed.max_height)
            - 2.0 * self.auto_scale.bed_margin
    }

    /// Print feedrate in mm/s for a given layer.
    #[must_use]
    pub fn print_speed(&self, layer_index: usize) -> f64 {
        if layer_index == 0 {
            self.speeds.print * self.speeds.first_layer_factor
        } else {
            self.speeds.print
        }
    }

    /// Check every numeric field is in range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProfileError::InvalidField`] found.
    pub fn validate(&self) -> ProfileResult<()> {
        let positive = [
            ("bed.width", self.bed.width),
            ("bed.depth", self.bed.depth),
            ("bed.max_height", self.bed.max_height),
            ("nozzle_diameter", self.nozzle_diameter),
            ("filament_diameter", self.filament_diameter),
            ("layer_height", self.layer_height),
            ("wall_thickness", self.wall_thickness),
            ("speeds.print", self.speeds.print),
            ("speeds.travel", self.speeds.travel),
            ("speeds.first_layer_factor", self.speeds.first_layer_factor),
            ("retraction.speed", self.retraction.speed),
            ("auto_scale.target_size", self.auto_scale.target_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ProfileError::invalid(field, value, "must be > 0"));
            }
        }

        let non_negative = [
            ("retraction.distance", self.retraction.distance),
            ("auto_scale.min_viable_size", self.auto_scale.min_viable_size),
            ("auto_scale.bed_margin", self.auto_scale.bed_margin),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ProfileError::invalid(field, value, "must be >= 0"));
            }
        }

        if !(0.0..=1.0).contains(&self.infill_density) {
            return Err(ProfileError::invalid(
                "infill_density",
                self.infill_density,
                "must be between 0 and 1",
            ));
        }
        if self.wall_count == 0 {
            return Err(ProfileError::invalid(
                "wall_count",
                f64::from(self.wall_count),
                "must be at least 1",
            ));
        }
        if self.envelope() <= 0.0 {
            return Err(ProfileError::invalid(
                "auto_scale.bed_margin",
                self.auto_scale.bed_margin,
                "leaves no printable area on the bed",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let profile = PrinterProfile::default();
        profile.validate().unwrap();
        assert!((profile.envelope() - 200.0).abs() < 1e-12);
    }

    #[test]
    fn json_overrides_defaults() {
        let json = r#"{
            "name": "Custom",
            "bed": { "width": 300, "depth": 300, "max_height": 400 },
            "speeds": { "print": 60, "travel": 150, "first_layer_factor": 0.5 },
            "temperatures": { "nozzle": 215, "bed": 70 }
        }"#;
        let profile = PrinterProfile::from_json_str(json).unwrap();

        assert_eq!(profile.name, "Custom");
        assert!((profile.bed.width - 300.0).abs() < 1e-12);
        assert!((profile.layer_height - 0.2).abs() < 1e-12);
        assert!((profile.print_speed(0) - 30.0).abs() < 1e-12);
        assert!((profile.print_speed(1) - 60.0).abs() < 1e-12);
        // Blocks follow the overridden temperatures
        assert!(profile.start_gcode.contains("M104 S215"));
        assert!(profile.start_gcode.contains("M190 S70"));
        assert!(profile.end_gcode.contains("M104 S0"));
    }

    #[test]
    fn partial_nested_objects() {
        let json = r#"{ "speeds": { "print": 60 }, "bed": { "max_height": 300 } }"#;
        let profile = PrinterProfile::from_json_str(json).unwrap();

        assert!((profile.speeds.print - 60.0).abs() < 1e-12);
        assert_eq!(profile.speeds.travel, Speeds::default().travel);
        assert_eq!(profile.speeds.first_layer_factor, 1.0);
        assert!((profile.bed.max_height - 300.0).abs() < 1e-12);
        assert!((profile.bed.width - 220.0).abs() < 1e-12);
        assert_eq!(profile.temperatures, Temperatures::default());
    }

    #[test]
    fn nested_defaults_match_kobra() {
        let kobra = presets::kobra_2_pro();
        assert_eq!(kobra.bed, BedSize::default());
        assert_eq!(kobra.speeds, Speeds::default());
        assert_eq!(kobra.temperatures, Temperatures::default());
        assert_eq!(kobra.retraction, Retraction::default());
        assert_eq!(kobra.auto_scale, AutoScale::default());
    }

    #[test]
    fn explicit_blocks_are_kept() {
        let json = r#"{ "start_gcode": "G28", "end_gcode": "M84" }"#;
        let profile = PrinterProfile::from_json_str(json).unwrap();
        assert_eq!(profile.start_gcode, "G28");
        assert_eq!(profile.end_gcode, "M84");
    }

    #[test]
    fn json_roundtrip() {
        let profile = PrinterProfile::default();
        let json = profile.to_json_pretty().unwrap();
        let back = PrinterProfile::from_json_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = PrinterProfile::from_json_str(r#"{ "layer_height": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::InvalidField {
                field: "layer_height",
                ..
            }
        ));

        let mut profile = PrinterProfile::default();
        profile.infill_density = 1.5;
        assert!(profile.validate().is_err());

        let mut profile = PrinterProfile::default();
        profile.auto_scale.bed_margin = 150.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidField {
                field: "auto_scale.bed_margin",
                ..
            })
        ));

        let mut profile = PrinterProfile::default();
        profile.speeds.travel = f64::NAN;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            PrinterProfile::from_json_str("{ not json"),
            Err(ProfileError::Json(_))
        ));
    }

    #[test]
    fn file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("printer.json");
        std::fs::write(&path, r#"{ "name": "On disk" }"#).unwrap();
        assert_eq!(PrinterProfile::from_json_file(&path).unwrap().name, "On disk");

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            PrinterProfile::from_json_file(&missing),
            Err(ProfileError::Io { .. })
        ));
    }
}
