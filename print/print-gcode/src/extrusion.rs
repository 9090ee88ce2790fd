//! Filament volume math.

use std::f64::consts::PI;

/// Cross-section of the filament in mm².
///
/// 1.75 mm filament gives about 2.40528 mm².
#[inline]
#[must_use]
pub fn filament_area(filament_diameter: f64) -> f64 {
    let r = filament_diameter / 2.0;
    PI * r * r
}

/// Filament length fed to deposit a line of `distance` × `layer_height` × `line_width`.
///
/// The deposited volume `d·h·w` divided by the filament cross-section.
///
/// # Example
///
/// ```
/// use print_gcode::extrusion_length;
///
/// let e = extrusion_length(10.0, 0.2, 0.4, 1.75);
/// assert!((e - 0.8 / 2.40528).abs() < 1e-5);
/// ```
#[inline]
#[must_use]
pub fn extrusion_length(
    distance: f64,
    layer_height: f64,
    line_width: f64,
    filament_diameter: f64,
) -> f64 {
    distance * layer_height * line_width / filament_area(filament_diameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standard_filament_area() {
        assert_relative_eq!(filament_area(1.75), 2.405_281_9, epsilon = 1e-6);
        assert_relative_eq!(filament_area(2.85), PI * 1.425 * 1.425, epsilon = 1e-12);
    }

    #[test]
    fn extrusion_scales_linearly() {
        let one = extrusion_length(1.0, 0.2, 0.4, 1.75);
        assert_relative_eq!(extrusion_length(40.0, 0.2, 0.4, 1.75), 40.0 * one, epsilon = 1e-12);
        assert_relative_eq!(extrusion_length(1.0, 0.4, 0.4, 1.75), 2.0 * one, epsilon = 1e-12);
        assert_relative_eq!(one, 0.08 / 2.405_281_9, epsilon = 1e-8);
        assert_relative_eq!(extrusion_length(0.0, 0.2, 0.4, 1.75), 0.0);
    }
}
