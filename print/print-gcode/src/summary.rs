//! Quick statistics from G-code text.

/// Layer count, filament and rough time pulled out of any G-code text.
///
/// Works on programs from other slicers too: both `; LAYER n` and Cura's
/// `;LAYER:n` markers are counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcodeSummary {
    /// Layer markers found.
    pub layers: usize,
    /// Largest non-negative `E` value, the filament used in absolute mode.
    pub max_e: f64,
    /// `max(5, layers × 1.5)` minutes.
    pub estimated_minutes: f64,
}

impl GcodeSummary {
    /// Scan G-code text.
    ///
    /// # Example
    ///
    /// ```
    /// use print_gcode::GcodeSummary;
    ///
    /// let s = GcodeSummary::scan(";LAYER:0\nG1 X1 Y1 E0.5\n;LAYER:1\nG1 X2 Y1 E1.25 ; wall\n");
    /// assert_eq!(s.layers, 2);
    /// assert_eq!(s.max_e, 1.25);
    /// assert_eq!(s.estimated_minutes, 5.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scan(text: &str) -> Self {
        let mut layers = 0usize;
        let mut max_e = 0.0_f64;

        for line in text.lines() {
            let line = line.trim_start();
            if is_layer_marker(line) {
                layers += 1;
                continue;
            }

            let code = line.split(';').next().unwrap_or_default();
            for e in code
                .split_whitespace()
                .filter_map(|t| t.strip_prefix('E'))
                .filter_map(|v| v.parse::<f64>().ok())
            {
                if e > max_e {
                    max_e = e;
                }
            }
        }

        Self {
            layers,
            max_e,
            estimated_minutes: (layers as f64 * 1.5).max(5.0),
        }
    }
}

fn is_layer_marker(line: &str) -> bool {
    let Some(comment) = line.strip_prefix(';') else {
        return false;
    };
    let comment = comment.trim_start();
    comment
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("layer"))
        && comment[5..].starts_with([' ', ':'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_both_marker_styles() {
        let text = "; LAYER 0 Z=0.200\n;LAYER:1\n; layer 2\n;LAYER_COUNT:3\n; Layers below\n";
        assert_eq!(GcodeSummary::scan(text).layers, 3);
    }

    #[test]
    fn ignores_comments_and_relative_retracts() {
        let text = "G1 X0 Y0 E15 ; purge E99\nG92 E0\nG1 E-2 F2700\nM84 X Y E\nG1 X1 Y1 E3.5\n";
        let s = GcodeSummary::scan(text);
        assert!((s.max_e - 15.0).abs() < 1e-12);
        assert_eq!(s.layers, 0);
        assert!((s.estimated_minutes - 5.0).abs() < 1e-12);
    }

    #[test]
    fn minutes_grow_with_layers() {
        let text: String = (0..40).map(|i| format!("; LAYER {i}\n")).collect();
        let s = GcodeSummary::scan(&text);
        assert_eq!(s.layers, 40);
        assert!((s.estimated_minutes - 60.0).abs() < 1e-12);
    }
}
