//! Endodormancy (chilling) parameters.
//!
//! Chill accumulates from hourly temperatures through a four-segment
//! efficiency curve: no chilling below `limiting_lower` or above
//! `limiting_upper`, full efficiency on the plateau between the two inner
//! bounds, logistic ramps in between. Endodormancy never sets a completion
//! flag; its percentage only caps the ecodormancy forcing rate, so a mild
//! winter slows dormancy release instead of blocking it.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::forcing::chilling_efficiency;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::{invalid, validate_threshold};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndodormancyParameters {
    /// Temperature below which no chilling accumulates
    /// unit: °C
    /// default: -5.0
    pub limiting_lower: FloatValue,

    /// Lower bound of the full-efficiency plateau
    /// unit: °C
    /// default: 0.0
    pub not_limiting_lower: FloatValue,

    /// Upper bound of the full-efficiency plateau
    /// unit: °C
    /// default: 8.0
    pub not_limiting_upper: FloatValue,

    /// Temperature above which no chilling accumulates
    /// unit: °C
    /// default: 12.0
    pub limiting_upper: FloatValue,

    /// Chill units required for full dormancy release capacity
    /// unit: chill units
    /// default: 60.0
    pub threshold: FloatValue,
}

impl Default for EndodormancyParameters {
    fn default() -> Self {
        Self {
            limiting_lower: -5.0,
            not_limiting_lower: 0.0,
            not_limiting_upper: 8.0,
            limiting_upper: 12.0,
            threshold: 60.0,
        }
    }
}

impl EndodormancyParameters {
    /// Chilling efficiency of one hourly temperature, [0, 1].
    pub fn hourly_efficiency(&self, temperature: FloatValue) -> FloatValue {
        chilling_efficiency(
            temperature,
            self.limiting_lower,
            self.not_limiting_lower,
            self.not_limiting_upper,
            self.limiting_upper,
        )
    }

    pub fn validate(&self) -> PhenoResult<()> {
        if !(self.limiting_lower < self.not_limiting_lower
            && self.not_limiting_lower <= self.not_limiting_upper
            && self.not_limiting_upper < self.limiting_upper)
        {
            return Err(invalid(
                "endodormancy",
                "chilling bounds must be ordered limiting_lower < not_limiting_lower <= not_limiting_upper < limiting_upper",
            ));
        }
        validate_threshold("endodormancy", self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plateau_temperatures_chill_fully() {
        let params = EndodormancyParameters::default();
        assert_eq!(params.hourly_efficiency(4.0), 1.0);
        assert_eq!(params.hourly_efficiency(0.0), 1.0);
        assert_eq!(params.hourly_efficiency(8.0), 1.0);
    }

    #[test]
    fn extremes_do_not_chill() {
        let params = EndodormancyParameters::default();
        assert_eq!(params.hourly_efficiency(-10.0), 0.0);
        assert_eq!(params.hourly_efficiency(15.0), 0.0);
    }

    #[test]
    fn disordered_bounds_are_rejected() {
        let params = EndodormancyParameters {
            not_limiting_lower: 10.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
