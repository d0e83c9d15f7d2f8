//! Ecodormancy (forcing) parameters.
//!
//! Once dormancy is induced, release is driven by a temperature sigmoid
//! whose midpoint and width both shift with day length: longer days lower
//! the midpoint and narrow the transition, so a given temperature forces
//! faster in late winter than in early winter. The achievable rate is
//! capped by the chilling already accumulated (the asymptote), which is
//! how partial chilling throttles release without blocking it.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::forcing::sigmoid_limiting;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::{invalid, validate_threshold};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcodormancyParameters {
    /// Sigmoid midpoint temperature at the reference day length
    /// unit: °C
    /// default: 8.0
    pub midpoint_base: FloatValue,

    /// Midpoint decrease per hour of day length beyond the reference
    /// unit: °C h⁻¹
    /// default: 1.5
    pub midpoint_daylength_slope: FloatValue,

    /// Sigmoid transition width at the reference day length
    /// unit: °C
    /// default: 10.0
    pub width_base: FloatValue,

    /// Width decrease per hour of day length beyond the reference
    /// unit: °C h⁻¹
    /// default: 0.6
    pub width_daylength_slope: FloatValue,

    /// Smallest admissible transition width
    /// unit: °C
    /// default: 3.0
    pub width_min: FloatValue,

    /// Day length at which the base midpoint and width apply
    /// unit: h
    /// default: 11.0
    pub reference_day_length: FloatValue,

    /// Forcing units required to complete dormancy release
    /// unit: forcing units
    /// default: 18.0
    pub threshold: FloatValue,
}

impl Default for EcodormancyParameters {
    fn default() -> Self {
        Self {
            midpoint_base: 8.0,
            midpoint_daylength_slope: 1.5,
            width_base: 10.0,
            width_daylength_slope: 0.6,
            width_min: 3.0,
            reference_day_length: 11.0,
            threshold: 18.0,
        }
    }
}

impl EcodormancyParameters {
    /// Sigmoid midpoint (°C) for a given day length.
    pub fn midpoint(&self, day_length: FloatValue) -> FloatValue {
        self.midpoint_base - self.midpoint_daylength_slope * (day_length - self.reference_day_length)
    }

    /// Sigmoid transition width (°C) for a given day length.
    pub fn width(&self, day_length: FloatValue) -> FloatValue {
        (self.width_base - self.width_daylength_slope * (day_length - self.reference_day_length))
            .max(self.width_min)
    }

    /// Daily forcing rate for a mean temperature and day length, capped by
    /// the chilling asymptote in [0, 1].
    pub fn forcing_rate(
        &self,
        mean_temperature: FloatValue,
        day_length: FloatValue,
        asymptote: FloatValue,
    ) -> FloatValue {
        let midpoint = self.midpoint(day_length);
        let half_width = 0.5 * self.width(day_length);
        asymptote
            * sigmoid_limiting(
                mean_temperature,
                midpoint - half_width,
                midpoint + half_width,
            )
    }

    pub fn validate(&self) -> PhenoResult<()> {
        if !(self.width_base > 0.0) {
            return Err(invalid("ecodormancy", "width_base must be positive"));
        }
        if !(self.width_min > 0.0) {
            return Err(invalid("ecodormancy", "width_min must be positive"));
        }
        validate_threshold("ecodormancy", self.threshold)
    }
}
