//! Respiration parameters.
//!
//! Ecosystem respiration has three components: overstory and understory
//! autotrophic terms (a reference rate plus a response to the layer's own
//! GPP, scaled by a Lloyd-Taylor temperature response and smoothed with an
//! exponential moving average) and a heterotrophic soil term (reference
//! rate × Lloyd-Taylor × water stress, unsmoothed). The overstory term is
//! additionally modulated by a canopy-age scaler over the growing season.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::invalid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RespirationParameters {
    /// Overstory reference respiration
    /// unit: µmol CO₂ m⁻² s⁻¹
    /// default: 0.85
    pub reference_respiration_overstory: FloatValue,

    /// Overstory respiration response to overstory GPP
    /// unit: dimensionless
    /// default: 0.12
    pub respiration_response_overstory: FloatValue,

    /// Understory reference respiration
    /// unit: µmol CO₂ m⁻² s⁻¹
    /// default: 0.40
    pub reference_respiration_understory: FloatValue,

    /// Understory respiration response to understory GPP
    /// unit: dimensionless
    /// default: 0.10
    pub respiration_response_understory: FloatValue,

    /// Heterotrophic (soil) reference respiration
    /// unit: µmol CO₂ m⁻² s⁻¹
    /// default: 1.10
    pub reference_respiration_soil: FloatValue,

    /// Lloyd-Taylor activation energy of the soil response
    /// unit: K
    /// default: 308.56
    pub activation_energy_soil: FloatValue,

    /// Lloyd-Taylor activation energy of the overstory response
    /// unit: K
    /// default: 230.0
    pub activation_energy_overstory: FloatValue,

    /// Lloyd-Taylor activation energy of the understory response
    /// unit: K
    /// default: 260.0
    pub activation_energy_understory: FloatValue,

    /// Exponential-moving-average coefficient of the autotrophic terms
    /// unit: dimensionless, (0, 1]
    /// default: 0.3
    pub smoothing_alpha: FloatValue,

    /// Growing-season thermal fraction at which the age scaler reaches 0.5
    /// unit: %
    /// default: 55.0
    pub respiration_aging_factor: FloatValue,

    /// Steepness of the age scaler
    /// unit: %⁻¹
    /// default: 0.08
    pub aging_steepness: FloatValue,
}

impl Default for RespirationParameters {
    fn default() -> Self {
        Self {
            reference_respiration_overstory: 0.85,
            respiration_response_overstory: 0.12,
            reference_respiration_understory: 0.40,
            respiration_response_understory: 0.10,
            reference_respiration_soil: 1.10,
            activation_energy_soil: 308.56,
            activation_energy_overstory: 230.0,
            activation_energy_understory: 260.0,
            smoothing_alpha: 0.3,
            respiration_aging_factor: 55.0,
            aging_steepness: 0.08,
        }
    }
}

impl RespirationParameters {
    pub fn validate(&self) -> PhenoResult<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(invalid(
                "respiration",
                format!(
                    "smoothing_alpha must be in (0, 1], got {}",
                    self.smoothing_alpha
                ),
            ));
        }
        for (name, value) in [
            ("activation_energy_soil", self.activation_energy_soil),
            (
                "activation_energy_overstory",
                self.activation_energy_overstory,
            ),
            (
                "activation_energy_understory",
                self.activation_energy_understory,
            ),
        ] {
            if !(value > 0.0) {
                return Err(invalid(
                    "respiration",
                    format!("{name} must be positive, got {value}"),
                ));
            }
        }
        for (name, value) in [
            (
                "reference_respiration_overstory",
                self.reference_respiration_overstory,
            ),
            (
                "reference_respiration_understory",
                self.reference_respiration_understory,
            ),
            ("reference_respiration_soil", self.reference_respiration_soil),
            (
                "respiration_response_overstory",
                self.respiration_response_overstory,
            ),
            (
                "respiration_response_understory",
                self.respiration_response_understory,
            ),
        ] {
            if value < 0.0 {
                return Err(invalid(
                    "respiration",
                    format!("{name} must be non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_validate() {
        RespirationParameters::default().validate().unwrap();
    }

    #[test]
    fn alpha_outside_unit_interval_is_rejected() {
        for alpha in [0.0, -0.1, 1.5] {
            let params = RespirationParameters {
                smoothing_alpha: alpha,
                ..Default::default()
            };
            assert!(params.validate().is_err(), "alpha {alpha} should fail");
        }
    }
}
