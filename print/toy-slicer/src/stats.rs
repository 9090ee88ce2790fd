//! Job statistics.

use serde::{Deserialize, Serialize};

/// What a finished job reports back, serialized in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceStats {
    /// Layers emitted.
    pub layers: usize,
    /// Wall-clock time of the job in milliseconds.
    pub time_ms: u64,
    /// Name the G-code is delivered under.
    pub filename: String,
    /// Filament used by the model in mm.
    pub filament_mm: f64,
    /// Print time estimate in minutes.
    pub estimated_minutes: f64,
    /// Open chains dropped across all layers.
    pub discarded_contours: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys() {
        let stats = SliceStats {
            layers: 50,
            time_ms: 12,
            filename: "cube.gcode".to_string(),
            filament_mm: 66.5,
            estimated_minutes: 1.25,
            discarded_contours: 0,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["layers"], 50);
        assert_eq!(value["timeMs"], 12);
        assert_eq!(value["filename"], "cube.gcode");
        assert_eq!(value["filamentMm"], 66.5);
        assert_eq!(value["discardedContours"], 0);

        let back: SliceStats = serde_json::from_value(value).unwrap();
        assert_eq!(back, stats);
    }
}
