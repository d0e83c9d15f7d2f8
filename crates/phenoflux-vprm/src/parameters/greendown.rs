//! Greendown parameters.
//!
//! Greendown accumulates with the same thermal forcing as growth; the
//! phase has no cardinal temperatures of its own, only a threshold.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::validate_threshold;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreendownParameters {
    /// Thermal units required to complete greendown
    /// unit: thermal units
    /// default: 70.0
    pub threshold: FloatValue,
}

impl Default for GreendownParameters {
    fn default() -> Self {
        Self { threshold: 70.0 }
    }
}

impl GreendownParameters {
    pub fn validate(&self) -> PhenoResult<()> {
        validate_threshold("greendown", self.threshold)
    }
}
