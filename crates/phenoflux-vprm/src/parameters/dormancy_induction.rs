//! Dormancy induction parameters.
//!
//! Dormancy entry is driven by the product of two limiting signals:
//! shortening photoperiod and cooling mean temperature. Each signal is a
//! two-threshold sigmoid between a "not limiting" bound (full signal) and a
//! "limiting" bound (no signal). The same photothermal signal is blended
//! into the late-decline rate, where senescence becomes increasingly
//! photoperiod-sensitive.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::forcing::sigmoid_limiting;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::{invalid, validate_threshold};

/// Parameters of the photothermal dormancy-induction signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DormancyInductionParameters {
    /// Day length at and above which no induction occurs
    /// unit: h
    /// default: 14.0
    pub photoperiod_limiting: FloatValue,

    /// Day length at and below which the photoperiod signal saturates
    /// unit: h
    /// default: 10.5
    pub photoperiod_not_limiting: FloatValue,

    /// Mean temperature at and above which no induction occurs
    /// unit: °C
    /// default: 20.0
    pub temperature_limiting: FloatValue,

    /// Mean temperature at and below which the temperature signal saturates
    /// unit: °C
    /// default: 5.0
    pub temperature_not_limiting: FloatValue,

    /// Accumulated photothermal units required to complete induction
    /// unit: photothermal units
    /// default: 12.0
    pub threshold: FloatValue,
}

impl Default for DormancyInductionParameters {
    fn default() -> Self {
        Self {
            photoperiod_limiting: 14.0,
            photoperiod_not_limiting: 10.5,
            temperature_limiting: 20.0,
            temperature_not_limiting: 5.0,
            threshold: 12.0,
        }
    }
}

impl DormancyInductionParameters {
    /// Photoperiod component of the induction signal, [0, 1].
    pub fn photoperiod_signal(&self, day_length: FloatValue) -> FloatValue {
        sigmoid_limiting(
            day_length,
            self.photoperiod_limiting,
            self.photoperiod_not_limiting,
        )
    }

    /// Temperature component of the induction signal, [0, 1].
    pub fn temperature_signal(&self, mean_temperature: FloatValue) -> FloatValue {
        sigmoid_limiting(
            mean_temperature,
            self.temperature_limiting,
            self.temperature_not_limiting,
        )
    }

    /// Combined photothermal signal (product of the two components).
    pub fn combined_signal(
        &self,
        day_length: FloatValue,
        mean_temperature: FloatValue,
    ) -> FloatValue {
        self.photoperiod_signal(day_length) * self.temperature_signal(mean_temperature)
    }

    pub fn validate(&self) -> PhenoResult<()> {
        if self.photoperiod_limiting == self.photoperiod_not_limiting {
            return Err(invalid(
                "dormancy_induction",
                "photoperiod limiting and not-limiting bounds must be distinct",
            ));
        }
        if self.temperature_limiting == self.temperature_not_limiting {
            return Err(invalid(
                "dormancy_induction",
                "temperature limiting and not-limiting bounds must be distinct",
            ));
        }
        validate_threshold("dormancy_induction", self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_cool_days_drive_induction() {
        let params = DormancyInductionParameters::default();
        assert_eq!(params.combined_signal(10.0, 2.0), 1.0);
        assert_eq!(params.combined_signal(15.0, 2.0), 0.0);
        assert_eq!(params.combined_signal(10.0, 25.0), 0.0);
        let partial = params.combined_signal(12.0, 10.0);
        assert!(partial > 0.0 && partial < 1.0);
    }

    #[test]
    fn signal_strengthens_into_autumn() {
        let params = DormancyInductionParameters::default();
        let september = params.combined_signal(12.5, 15.0);
        let october = params.combined_signal(11.0, 9.0);
        assert!(
            october > september,
            "induction should strengthen as days shorten and cool: {october} vs {september}"
        );
    }

    #[test]
    fn equal_bounds_are_rejected() {
        let params = DormancyInductionParameters {
            photoperiod_limiting: 12.0,
            photoperiod_not_limiting: 12.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
