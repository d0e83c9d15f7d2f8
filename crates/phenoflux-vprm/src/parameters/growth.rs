//! Growth parameters.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::{validate_cardinals, validate_threshold};

/// Cardinal temperatures and threshold of the spring growth phase.
///
/// The same cardinal triple also drives the greendown accumulation and the
/// vegetation-index responses that reference the growth optimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParameters {
    /// Minimum cardinal temperature
    /// unit: °C
    /// default: 0.0
    pub tmin: FloatValue,

    /// Optimum cardinal temperature
    /// unit: °C
    /// default: 25.0
    pub topt: FloatValue,

    /// Maximum cardinal temperature
    /// unit: °C
    /// default: 40.0
    pub tmax: FloatValue,

    /// Thermal units required to complete growth
    /// unit: thermal units
    /// default: 45.0
    pub threshold: FloatValue,
}

impl Default for GrowthParameters {
    fn default() -> Self {
        Self {
            tmin: 0.0,
            topt: 25.0,
            tmax: 40.0,
            threshold: 45.0,
        }
    }
}

impl GrowthParameters {
    pub fn validate(&self) -> PhenoResult<()> {
        validate_cardinals("growth", self.tmin, self.topt, self.tmax)?;
        validate_threshold("growth", self.threshold)
    }
}
