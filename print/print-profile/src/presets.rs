//! Built-in printer presets.

// Feedrates are whole mm/min
#![allow(clippy::cast_possible_truncation)]

use crate::error::{ProfileError, ProfileResult};
use crate::profile::{AutoScale, BedSize, PrinterProfile, Retraction, Speeds, Temperatures};

/// Names accepted by [`preset`].
pub const PRESET_NAMES: &[&str] = &["kobra-2-pro", "universal"];

/// Look up a preset by name.
///
/// Matching ignores case and treats `_` like `-`.
///
/// # Errors
///
/// Returns [`ProfileError::UnknownPreset`] for any other name.
///
/// # Example
///
/// ```
/// use print_profile::preset;
///
/// let profile = preset("Kobra_2_Pro").unwrap();
/// assert_eq!(profile.bed.width, 220.0);
/// assert!(preset("ender-3").is_err());
/// ```
pub fn preset(name: &str) -> ProfileResult<PrinterProfile> {
    match name.to_ascii_lowercase().replace('_', "-").as_str() {
        "kobra-2-pro" => Ok(kobra_2_pro()),
        "universal" => Ok(universal()),
        _ => Err(ProfileError::UnknownPreset {
            name: name.to_string(),
            available: PRESET_NAMES.join(", "),
        }),
    }
}

/// Anycubic Kobra 2 Pro: 220×220×250 bed, 0.4 mm nozzle, PLA at 200/60 °C.
#[must_use]
pub fn kobra_2_pro() -> PrinterProfile {
    let mut profile = PrinterProfile {
        name: "Anycubic Kobra 2 Pro".to_string(),
        bed: BedSize::default(),
        nozzle_diameter: 0.4,
        filament_diameter: 1.75,
        layer_height: 0.2,
        wall_count: 1,
        wall_thickness: 0.4,
        infill_density: 0.0,
        speeds: Speeds::default(),
        temperatures: Temperatures::default(),
        fan_speed: 0,
        retraction: Retraction::default(),
        auto_scale: AutoScale::default(),
        start_gcode: String::new(),
        end_gcode: String::new(),
    };
    profile.start_gcode = kobra_start_gcode(&profile);
    profile.end_gcode = kobra_end_gcode(&profile);
    profile
}

/// Conservative settings for any Marlin/RepRap printer with a 200 mm bed.
#[must_use]
pub fn universal() -> PrinterProfile {
    let mut profile = PrinterProfile {
        name: "Universal (safe)".to_string(),
        bed: BedSize {
            width: 200.0,
            depth: 200.0,
            max_height: 200.0,
        },
        nozzle_diameter: 0.4,
        filament_diameter: 1.75,
        layer_height: 0.28,
        wall_count: 2,
        wall_thickness: 0.4,
        infill_density: 0.15,
        speeds: Speeds {
            print: 45.0,
            travel: 100.0,
            first_layer_factor: 0.5,
        },
        temperatures: Temperatures {
            nozzle: 200,
            bed: 60,
        },
        fan_speed: 255,
        retraction: Retraction {
            distance: 5.0,
            speed: 45.0,
        },
        auto_scale: AutoScale::default(),
        start_gcode: String::new(),
        end_gcode: String::new(),
    };
    profile.start_gcode = universal_start_gcode(&profile);
    profile.end_gcode = universal_end_gcode(&profile);
    profile
}

fn mm_per_min(mm_per_s: f64) -> i64 {
    (mm_per_s * 60.0).round() as i64
}

fn kobra_start_gcode(p: &PrinterProfile) -> String {
    let Temperatures { nozzle, bed } = p.temperatures;
    format!(
        "; Anycubic Kobra 2 Pro Start G-code
M140 S{bed} ; Set Heat Bed temperature
M104 S{nozzle} ; Set Extruder temperature
G28 ; Home all axes
G90 ; Absolute positioning
M82 ; Extruder absolute mode
M190 S{bed} ; Wait for Heat Bed temperature
M109 S{nozzle} ; Wait for Extruder temperature
G92 E0 ; Reset Extruder
G1 Z2.0 F3000 ; Move Z Axis up little to prevent scratching of Heat Bed
G1 X0.1 Y20 Z0.3 F5000.0 ; Move to start position
G1 X0.1 Y200.0 Z0.3 F1500.0 E15 ; Draw the first line
G1 X0.4 Y200.0 Z0.3 F5000.0 ; Move to side a little
G1 X0.4 Y20.0 Z0.3 F1500.0 E30 ; Draw the second line
G92 E0 ; Reset Extruder
G1 Z2.0 F3000 ; Move Z Axis up little to prevent scratching of Heat Bed"
    )
}

fn kobra_end_gcode(p: &PrinterProfile) -> String {
    let retract = p.retraction.distance;
    let feed = mm_per_min(p.retraction.speed);
    let depth = p.bed.depth;
    format!(
        "; Anycubic Kobra 2 Pro End G-code
M104 S0 ; Turn-off hotend
M140 S0 ; Turn-off bed
M84 X Y E ; Disable all steppers but Z
G91 ; Relative positioning
G1 E-{retract} F{feed} ; Retract a bit
G1 E-{retract} Z0.2 F2400 ; Retract and raise Z
G1 X5 Y5 F3000 ; Wipe out
G1 Z10 ; Raise Z more
G90 ; Absolute positioning
G1 X0 Y{depth} ; Present print
M82 ; Absolute extrusion mode
M106 S0 ; Turn-off fan"
    )
}

/// Start block for printers without a dedicated template.
pub(crate) fn universal_start_gcode(p: &PrinterProfile) -> String {
    let Temperatures { nozzle, bed } = p.temperatures;
    let purge_end = (p.bed.depth - 20.0).max(20.0);
    format!(
        "; === Start G-code ({name}) ===
G90 ; Absolute positioning
M82 ; Absolute extrusion
G28 ; Home all axes
G1 Z5.0 F3000 ; Lift nozzle for safety

; Heat up
M104 S{nozzle} ; Set nozzle temp (no wait)
M140 S{bed} ; Set bed temp (no wait)
M190 S{bed} ; Wait for bed
M109 S{nozzle} ; Wait for nozzle

; Reset extruder
G92 E0

; Purge line along the left edge
G1 X10.1 Y20 Z0.3 F5000.0 ; Move to start
G1 X10.1 Y{purge_end:.1} Z0.3 F1500.0 E15 ; Draw first line
G1 X10.4 Y{purge_end:.1} Z0.3 F5000.0 ; Move side
G1 X10.4 Y20.0 Z0.3 F1500.0 E30 ; Draw second line

G92 E0 ; Reset extruder
G1 Z2.0 F3000 ; Lift before travel
; === Start printing ===",
        name = p.name
    )
}

/// End block for printers without a dedicated template.
pub(crate) fn universal_end_gcode(p: &PrinterProfile) -> String {
    let retract = p.retraction.distance;
    let feed = mm_per_min(p.retraction.speed);
    let depth = p.bed.depth;
    format!(
        "; === End G-code ===
G91 ; Relative positioning
G1 E-{retract} F{feed} ; Retract filament
G1 Z10 F3000 ; Lift nozzle

G90 ; Absolute positioning
G1 X0 Y{depth} F3000 ; Present print

; Cool down
M106 S0 ; Fan off
M104 S0 ; Turn off nozzle
M140 S0 ; Turn off bed
M84 ; Disable motors"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for name in PRESET_NAMES {
            let profile = preset(name).unwrap();
            profile.validate().unwrap();
            assert!(!profile.start_gcode.is_empty());
            assert!(!profile.end_gcode.is_empty());
        }
    }

    #[test]
    fn kobra_blocks_use_profile_values() {
        let profile = kobra_2_pro();
        assert!(profile.start_gcode.contains("M140 S60"));
        assert!(profile.start_gcode.contains("M109 S200"));
        assert!(profile.start_gcode.contains("M82"));
        assert!(!profile.start_gcode.contains("M83"));
        assert!(profile.start_gcode.trim_end().ends_with("Heat Bed"));
        assert!(profile.end_gcode.contains("G1 E-2 F2700"));
        assert!(profile.end_gcode.contains("G1 X0 Y220"));
    }

    #[test]
    fn universal_matches_safe_settings() {
        let profile = universal();
        assert!((profile.layer_height - 0.28).abs() < 1e-12);
        assert!((profile.speeds.print - 45.0).abs() < 1e-12);
        assert!((profile.speeds.first_layer_factor - 0.5).abs() < 1e-12);
        assert!((profile.envelope() - 180.0).abs() < 1e-12);
        assert!(profile.start_gcode.contains("G1 X10.1 Y180.0 Z0.3 F1500.0 E15"));
        assert!(profile.end_gcode.contains("G1 E-5 F2700"));
        assert!(profile.end_gcode.contains("M106 S0"));
    }

    #[test]
    fn lookup_is_forgiving() {
        assert_eq!(preset("UNIVERSAL").unwrap().name, "Universal (safe)");
        match preset("prusa") {
            Err(ProfileError::UnknownPreset { available, .. }) => {
                assert_eq!(available, "kobra-2-pro, universal");
            }
            other => panic!("expected unknown preset, got {other:?}"),
        }
    }
}
