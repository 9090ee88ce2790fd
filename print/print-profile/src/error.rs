//! Error types for printer profiles.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors from loading or validating a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A numeric field is out of range.
    #[error("invalid profile field `{field}` = {value}: {reason}")]
    InvalidField {
        /// Field path, e.g. `speeds.print`.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// No preset with this name.
    #[error("unknown printer preset `{name}` (available: {available})")]
    UnknownPreset {
        /// Requested name.
        name: String,
        /// Comma-separated preset names.
        available: String,
    },

    /// Malformed JSON.
    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Profile file could not be read.
    #[error("failed to read profile {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ProfileError {
    pub(crate) const fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            value,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ProfileError::invalid("layer_height", -0.2, "must be > 0");
        assert_eq!(
            err.to_string(),
            "invalid profile field `layer_height` = -0.2: must be > 0"
        );
    }
}
