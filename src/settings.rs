//! Reconstruction settings
//!
//! Loaded from a JSON file next to the scenario data; every field falls back
//! to the reference-data defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{AXIS_ALIGNMENT_EPSILON_DEG, FIXED_STEP_SIZE_MS};
use crate::error::CollisionError;

/// How the overlap test decides that B's axes are redundant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisAlignment {
    /// Compare `|yaw| mod 90°` of both agents. Matches older reference
    /// output; mirrored headings (e.g. 10° and -10°) are wrongly treated as
    /// aligned.
    Legacy,
    /// Heading difference modulo 90° within epsilon of a quarter turn
    #[default]
    Robust,
}

impl AxisAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisAlignment::Legacy => "Legacy",
            AxisAlignment::Robust => "Robust",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "legacy" | "fmod" => Some(AxisAlignment::Legacy),
            "robust" => Some(AxisAlignment::Robust),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionSettings {
    /// Step size of the recorded trajectories (ms)
    pub step_size_ms: i64,
    /// Axis-alignment shortcut used by the overlap test
    pub axis_alignment: AxisAlignment,
    /// Heading tolerance of the alignment shortcut (degrees)
    pub alignment_epsilon_deg: f64,
}

impl Default for ReconstructionSettings {
    fn default() -> Self {
        Self {
            step_size_ms: FIXED_STEP_SIZE_MS,
            axis_alignment: AxisAlignment::Robust,
            alignment_epsilon_deg: AXIS_ALIGNMENT_EPSILON_DEG,
        }
    }
}

impl ReconstructionSettings {
    /// Settings reproducing the older reference output bit for bit
    pub fn legacy() -> Self {
        Self {
            axis_alignment: AxisAlignment::Legacy,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CollisionError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| CollisionError::parse("settings", e))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, CollisionError> {
        let json = std::fs::read_to_string(path).map_err(|e| CollisionError::io(path, e))?;
        let settings = Self::from_json_str(&json)?;
        log::info!(
            "Loaded settings from {} (step {} ms, {} alignment)",
            path.display(),
            settings.step_size_ms,
            settings.axis_alignment.as_str()
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CollisionError> {
        if self.step_size_ms <= 0 {
            return Err(CollisionError::InvalidSettings {
                message: format!("step_size_ms must be positive, got {}", self.step_size_ms),
            });
        }
        if !(self.alignment_epsilon_deg.is_finite() && self.alignment_epsilon_deg >= 0.0) {
            return Err(CollisionError::InvalidSettings {
                message: format!(
                    "alignment_epsilon_deg must be non-negative and finite, got {}",
                    self.alignment_epsilon_deg
                ),
            });
        }
        Ok(())
    }
}
