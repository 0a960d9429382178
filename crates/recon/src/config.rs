use serde::{Deserialize, Serialize};

use crate::error::ReconError;

pub const DEFAULT_DISPLACEMENT_TOLERANCE_L: f64 = 0.2;

/// Slack absorbed when comparing a displacement error against the tolerance,
/// so 2.5 vs 2.7 is inside a 0.2L window despite binary rounding.
pub(crate) const TOLERANCE_EPSILON: f64 = 1e-9;

/// Comparison thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Largest displacement difference (liters) still counted as a match.
    pub displacement_tolerance_l: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            displacement_tolerance_l: DEFAULT_DISPLACEMENT_TOLERANCE_L,
        }
    }
}

impl MatchConfig {
    pub fn new(displacement_tolerance_l: f64) -> Result<Self, ReconError> {
        let config = Self {
            displacement_tolerance_l,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let tol = self.displacement_tolerance_l;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ReconError::InvalidTolerance(tol));
        }
        Ok(())
    }

    pub(crate) fn within_tolerance(&self, error: f64) -> bool {
        error <= self.displacement_tolerance_l + TOLERANCE_EPSILON
    }
}
