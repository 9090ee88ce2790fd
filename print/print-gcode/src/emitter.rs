//! Streaming G-code writer.

// Feedrates are whole mm/min
#![allow(clippy::cast_possible_truncation)]

use std::fmt::Write;

use mesh_slice::{planar_distance, Layer};
use mesh_types::Point3;
use print_profile::PrinterProfile;
use tracing::{debug, info};

use crate::extrusion::extrusion_length;

/// Moves shorter than this (mm) are not emitted.
pub const MIN_MOVE: f64 = 0.001;

/// A finished G-code program.
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeProgram {
    /// Complete program text, start and end blocks included.
    pub text: String,
    /// Number of `; LAYER` markers written.
    pub layer_count: usize,
    /// Final absolute extruder position, i.e. filament used by the model in mm.
    pub filament_mm: f64,
    /// Sum of move lengths over their feedrates, in seconds.
    pub estimated_seconds: f64,
}

impl GcodeProgram {
    /// Print time estimate in minutes.
    #[must_use]
    pub fn estimated_minutes(&self) -> f64 {
        self.estimated_seconds / 60.0
    }
}

/// Writes one layer at a time into a G-code program.
///
/// The extruder position `E` is absolute, starts at zero after the profile's
/// start block and only ever grows. Each contour is printed as a travel to
/// its first point followed by extruding moves through the rest.
///
/// Bead height is the layer's actual thickness: the distance to the previous
/// layer's Z, or to the build plate for the first layer, capped at the
/// profile's layer height. A partial top layer is extruded thinner.
///
/// Layers must be emitted in ascending order.
///
/// # Example
///
/// ```
/// use mesh_slice::{slice_layers, SliceParams};
/// use mesh_types::cube;
/// use print_gcode::GcodeEmitter;
/// use print_profile::kobra_2_pro;
///
/// let profile = kobra_2_pro();
/// let layers = slice_layers(&cube(10.0), &SliceParams::default()).unwrap();
///
/// let mut emitter = GcodeEmitter::new(&profile);
/// for layer in &layers {
///     emitter.emit_layer(layer);
/// }
/// let program = emitter.finish();
///
/// assert_eq!(program.layer_count, 50);
/// assert!(program.text.contains("; LAYER 49 Z=10.000"));
/// ```
#[derive(Debug)]
pub struct GcodeEmitter<'a> {
    profile: &'a PrinterProfile,
    out: String,
    e: f64,
    layers: usize,
    seconds: f64,
    position: Option<Point3<f64>>,
    last_z: Option<f64>,
}

impl<'a> GcodeEmitter<'a> {
    /// Start a program with the profile's start block.
    #[must_use]
    pub fn new(profile: &'a PrinterProfile) -> Self {
        let mut out = String::with_capacity(64 * 1024);
        out.push_str(profile.start_gcode.trim_end());
        out.push('\n');
        Self {
            profile,
            out,
            e: 0.0,
            layers: 0,
            seconds: 0.0,
            position: None,
            last_z: None,
        }
    }

    /// Current absolute extruder position.
    #[must_use]
    pub const fn extruded(&self) -> f64 {
        self.e
    }

    /// Layers emitted so far.
    #[must_use]
    pub const fn layer_count(&self) -> usize {
        self.layers
    }

    /// Append one layer.
    pub fn emit_layer(&mut self, layer: &Layer) {
        let travel = self.profile.speeds.travel;
        let print = self.profile.print_speed(layer.index);
        let travel_f = mm_per_min(travel);
        let print_f = mm_per_min(print);
        let z = layer.z;
        let thickness = (z - self.last_z.unwrap_or(0.0))
            .max(0.0)
            .min(self.profile.layer_height);
        self.last_z = Some(z);

        let _ = writeln!(self.out, "; LAYER {} Z={z:.3}", layer.index);
        let _ = writeln!(self.out, "G1 Z{z:.3} F{travel_f}");
        if let Some(p) = self.position.as_mut() {
            self.seconds += (z - p.z).abs() / travel;
            p.z = z;
        }

        if layer.index == 1 && self.profile.fan_speed > 0 {
            let _ = writeln!(self.out, "M106 S{}", self.profile.fan_speed);
        }

        let mut moves = 0usize;
        for contour in &layer.contours {
            let [start, rest @ ..] = contour.points.as_slice() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let _ = writeln!(self.out, "G1 X{:.3} Y{:.3} F{travel_f}", start.x, start.y);
            if let Some(p) = self.position {
                self.seconds += planar_distance(&p, start) / travel;
            }
            self.position = Some(Point3::new(start.x, start.y, z));

            let mut previous = start;
            for point in rest {
                let distance = planar_distance(previous, point);
                previous = point;
                if distance < MIN_MOVE {
                    continue;
                }

                self.e += extrusion_length(
                    distance,
                    thickness,
                    self.profile.wall_thickness,
                    self.profile.filament_diameter,
                );
                let _ = writeln!(
                    self.out,
                    "G1 X{:.3} Y{:.3} E{:.5} F{print_f}",
                    point.x, point.y, self.e
                );
                self.seconds += distance / print;
                self.position = Some(Point3::new(point.x, point.y, z));
                moves += 1;
            }
        }

        debug!(
            layer = layer.index,
            contours = layer.contours.len(),
            moves,
            e = self.e,
            "Emitted layer"
        );
        self.layers += 1;
    }

    /// Append the end block and return the program.
    #[must_use]
    pub fn finish(mut self) -> GcodeProgram {
        self.out.push_str(self.profile.end_gcode.trim_end());
        self.out.push('\n');

        info!(
            layers = self.layers,
            filament_mm = self.e,
            minutes = self.seconds / 60.0,
            "G-code complete"
        );

        GcodeProgram {
            text: self.out,
            layer_count: self.layers,
            filament_mm: self.e,
            estimated_seconds: self.seconds,
        }
    }
}

fn mm_per_min(mm_per_s: f64) -> i64 {
    (mm_per_s * 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_slice::{slice_layers, Contour, SliceParams};
    use mesh_types::cube;
    use print_profile::{kobra_2_pro, universal};

    fn square_layer(index: usize, z: f64, size: f64) -> Layer {
        let p = |x: f64, y: f64| Point3::new(x, y, z);
        Layer {
            index,
            z,
            contours: vec![Contour::new(vec![
                p(0.0, 0.0),
                p(size, 0.0),
                p(size, size),
                p(0.0, size),
                p(0.0, 0.0),
            ])],
            discarded: 0,
        }
    }

    fn e_values(text: &str) -> Vec<f64> {
        // Model moves only, the purge line in the start block extrudes too
        text.lines()
            .skip_while(|l| !l.starts_with("; LAYER"))
            .filter(|l| l.starts_with("G1 X"))
            .filter_map(|l| l.split_whitespace().find_map(|t| t.strip_prefix('E')))
            .map(|v| v.parse().unwrap())
            .collect()
    }

    #[test]
    fn square_layer_moves() {
        let profile = kobra_2_pro();
        let mut emitter = GcodeEmitter::new(&profile);
        emitter.emit_layer(&square_layer(0, 0.2, 10.0));
        let program = emitter.finish();

        let body: Vec<&str> = program
            .text
            .lines()
            .skip_while(|l| !l.starts_with("; LAYER"))
            .take(7)
            .collect();
        assert_eq!(body[0], "; LAYER 0 Z=0.200");
        assert_eq!(body[1], "G1 Z0.200 F6000");
        assert_eq!(body[2], "G1 X0.000 Y0.000 F6000");
        assert_eq!(body[3], "G1 X10.000 Y0.000 E0.33260 F3000");
        assert_eq!(body[6], "G1 X0.000 Y0.000 E1.33041 F3000");

        assert_relative_eq!(program.filament_mm, 4.0 * 10.0 * 0.2 * 0.4 / 2.405_281_875, epsilon = 1e-6);
        assert_eq!(program.layer_count, 1);
    }

    #[test]
    fn extruder_never_decreases() {
        let profile = kobra_2_pro();
        let mut emitter = GcodeEmitter::new(&profile);
        for i in 0..5 {
            let z = 0.2 * (i + 1) as f64;
            emitter.emit_layer(&square_layer(i, z, 5.0 + i as f64));
            assert!(emitter.extruded() > 0.0);
        }
        let program = emitter.finish();

        let es = e_values(&program.text);
        assert_eq!(es.len(), 20);
        assert!(es.windows(2).all(|w| w[0] <= w[1]));
        assert_relative_eq!(*es.last().unwrap(), program.filament_mm, epsilon = 1e-5);
    }

    #[test]
    fn partial_top_layer_extrudes_thinner() {
        let profile = kobra_2_pro();
        let layers = slice_layers(&cube(10.05), &SliceParams::default()).unwrap();
        assert_eq!(layers.len(), 51);
        assert_relative_eq!(layers[50].z, 10.05);

        let mut emitter = GcodeEmitter::new(&profile);
        let mut deltas = Vec::new();
        for layer in &layers {
            let before = emitter.extruded();
            emitter.emit_layer(layer);
            deltas.push(emitter.extruded() - before);
        }

        let (prev, last) = (deltas[49], deltas[50]);
        assert_relative_eq!(prev, deltas[10], max_relative = 1e-9);
        assert_relative_eq!(last, prev * 0.25, max_relative = 1e-9);
    }

    #[test]
    fn first_layer_measured_from_plate() {
        let profile = kobra_2_pro();
        let mut thin = GcodeEmitter::new(&profile);
        thin.emit_layer(&square_layer(0, 0.1, 10.0));
        let mut full = GcodeEmitter::new(&profile);
        full.emit_layer(&square_layer(0, 0.2, 10.0));

        assert_relative_eq!(thin.extruded(), full.extruded() * 0.5, max_relative = 1e-9);
    }

    #[test]
    fn tiny_moves_skipped() {
        let profile = kobra_2_pro();
        let mut layer = square_layer(0, 0.2, 10.0);
        layer.contours[0]
            .points
            .insert(2, Point3::new(10.0, 0.0005, 0.2));

        let mut emitter = GcodeEmitter::new(&profile);
        emitter.emit_layer(&layer);
        let program = emitter.finish();
        assert_eq!(e_values(&program.text).len(), 4);
    }

    #[test]
    fn degenerate_contours_ignored() {
        let profile = kobra_2_pro();
        let layer = Layer {
            index: 0,
            z: 0.2,
            contours: vec![Contour::new(vec![]), Contour::new(vec![Point3::origin()])],
            discarded: 0,
        };
        let mut emitter = GcodeEmitter::new(&profile);
        emitter.emit_layer(&layer);
        let program = emitter.finish();

        assert_eq!(program.layer_count, 1);
        assert_relative_eq!(program.filament_mm, 0.0);
        assert!(!program.text.contains("G1 X"));
    }

    #[test]
    fn first_layer_speed_and_fan() {
        let profile = universal();
        let mut emitter = GcodeEmitter::new(&profile);
        emitter.emit_layer(&square_layer(0, 0.28, 10.0));
        emitter.emit_layer(&square_layer(1, 0.56, 10.0));
        let text = emitter.finish().text;

        let layer0: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("; LAYER 0"))
            .take_while(|l| !l.starts_with("; LAYER 1"))
            .collect();
        assert!(layer0.iter().any(|l| l.ends_with("F1350")));
        assert!(!layer0.iter().any(|l| l.starts_with("M106")));

        let layer1: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("; LAYER 1"))
            .collect();
        assert_eq!(layer1[2], "M106 S255");
        assert!(layer1.iter().any(|l| l.ends_with("F2700")));
    }

    #[test]
    fn program_framed_by_profile_blocks() {
        let profile = kobra_2_pro();
        let program = GcodeEmitter::new(&profile).finish();
        assert!(program.text.starts_with("; Anycubic Kobra 2 Pro Start G-code"));
        assert!(program.text.trim_end().ends_with("M106 S0 ; Turn-off fan"));
        assert_eq!(program.layer_count, 0);
    }

    #[test]
    fn time_estimate_counts_moves() {
        let profile = kobra_2_pro();
        let mut emitter = GcodeEmitter::new(&profile);
        emitter.emit_layer(&square_layer(0, 0.2, 10.0));
        let program = emitter.finish();
        // 40 mm of printing at 50 mm/s, no prior position for the first travel
        assert_relative_eq!(program.estimated_seconds, 0.8, epsilon = 1e-9);
    }
}
