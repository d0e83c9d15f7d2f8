//! Senescence (decline) parameters.
//!
//! Decline starts as a purely thermal process with its own, cooler-optimum
//! cardinal triple and morphs into the photothermal dormancy-induction
//! signal as the phase progresses.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::{validate_cardinals, validate_threshold};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SenescenceParameters {
    /// Minimum cardinal temperature
    /// unit: °C
    /// default: 0.0
    pub tmin: FloatValue,

    /// Optimum cardinal temperature
    /// unit: °C
    /// default: 12.0
    pub topt: FloatValue,

    /// Maximum cardinal temperature
    /// unit: °C
    /// default: 28.0
    pub tmax: FloatValue,

    /// Thermal units required to complete decline
    /// unit: thermal units
    /// default: 25.0
    pub threshold: FloatValue,
}

impl Default for SenescenceParameters {
    fn default() -> Self {
        Self {
            tmin: 0.0,
            topt: 12.0,
            tmax: 28.0,
            threshold: 25.0,
        }
    }
}

impl SenescenceParameters {
    pub fn validate(&self) -> PhenoResult<()> {
        validate_cardinals("senescence", self.tmin, self.topt, self.tmax)?;
        validate_threshold("senescence", self.threshold)
    }
}
