//! Photosynthesis parameters.
//!
//! One quantum yield and light half-saturation per canopy layer; shared
//! temperature cardinals with the understory optimum shifted by
//! `pixel_temperature_shift` to represent its cooler microclimate; VPD and
//! water-stress down-regulation; and the logistic leaf-out phenology
//! scaler applied to overstory GPP during growth.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::{invalid, validate_cardinals};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosynthesisParameters {
    /// Maximum quantum yield of the overstory
    /// unit: µmol CO₂ (µmol PAR)⁻¹
    /// default: 0.083
    pub max_quantum_yield_overstory: FloatValue,

    /// Maximum quantum yield of the understory
    /// unit: µmol CO₂ (µmol PAR)⁻¹
    /// default: 0.055
    pub max_quantum_yield_understory: FloatValue,

    /// Light half-saturation of the overstory
    /// unit: µmol m⁻² s⁻¹
    /// default: 570.0
    pub par_half_saturation_overstory: FloatValue,

    /// Light half-saturation of the understory
    /// unit: µmol m⁻² s⁻¹
    /// default: 360.0
    pub par_half_saturation_understory: FloatValue,

    /// Beer-Lambert extinction coefficient for direct-beam radiation
    /// unit: dimensionless
    /// default: 0.5
    pub extinction_coefficient: FloatValue,

    /// Minimum cardinal temperature of photosynthesis
    /// unit: °C
    /// default: 0.0
    pub tmin: FloatValue,

    /// Optimum cardinal temperature of photosynthesis
    /// unit: °C
    /// default: 22.0
    pub topt: FloatValue,

    /// Maximum cardinal temperature of photosynthesis
    /// unit: °C
    /// default: 40.0
    pub tmax: FloatValue,

    /// Understory optimum-temperature offset
    /// unit: °C
    /// default: -3.0
    pub pixel_temperature_shift: FloatValue,

    /// VPD below which photosynthesis is unconstrained
    /// unit: kPa
    /// default: 0.9
    pub vpd_min: FloatValue,

    /// VPD bounding the down-regulation transition
    /// unit: kPa
    /// default: 4.0
    pub vpd_max: FloatValue,

    /// Slope of the VPD down-regulation sigmoid
    /// unit: kPa⁻¹
    /// default: 2.0
    pub vpd_sensitivity: FloatValue,

    /// Length of the rolling water-balance window
    /// unit: days
    /// default: 5
    pub water_stress_days: usize,

    /// Water availability below which stress develops
    /// unit: dimensionless
    /// default: 0.65
    pub water_stress_threshold: FloatValue,

    /// Stress increase per unit availability deficit
    /// unit: dimensionless
    /// default: 1.5
    pub water_stress_sensitivity: FloatValue,

    /// Growth-completion percentage at which the leaf-out phenology scaler
    /// reaches 0.5
    /// unit: %
    /// default: 35.0
    pub growth_phenology_scaling_factor: FloatValue,

    /// Steepness of the leaf-out phenology scaler
    /// unit: %⁻¹
    /// default: 0.12
    pub phenology_steepness: FloatValue,
}

impl Default for PhotosynthesisParameters {
    fn default() -> Self {
        Self {
            max_quantum_yield_overstory: 0.083,
            max_quantum_yield_understory: 0.055,
            par_half_saturation_overstory: 570.0,
            par_half_saturation_understory: 360.0,
            extinction_coefficient: 0.5,
            tmin: 0.0,
            topt: 22.0,
            tmax: 40.0,
            pixel_temperature_shift: -3.0,
            vpd_min: 0.9,
            vpd_max: 4.0,
            vpd_sensitivity: 2.0,
            water_stress_days: 5,
            water_stress_threshold: 0.65,
            water_stress_sensitivity: 1.5,
            growth_phenology_scaling_factor: 35.0,
            phenology_steepness: 0.12,
        }
    }
}

impl PhotosynthesisParameters {
    /// Understory cardinal triple: the optimum shifted by
    /// `pixel_temperature_shift`, bounds unchanged.
    pub fn understory_topt(&self) -> FloatValue {
        self.topt + self.pixel_temperature_shift
    }

    pub fn validate(&self) -> PhenoResult<()> {
        validate_cardinals("photosynthesis", self.tmin, self.topt, self.tmax)?;
        validate_cardinals(
            "photosynthesis (understory)",
            self.tmin,
            self.understory_topt(),
            self.tmax,
        )?;
        for (name, value) in [
            (
                "par_half_saturation_overstory",
                self.par_half_saturation_overstory,
            ),
            (
                "par_half_saturation_understory",
                self.par_half_saturation_understory,
            ),
            ("extinction_coefficient", self.extinction_coefficient),
            ("vpd_sensitivity", self.vpd_sensitivity),
        ] {
            if !(value > 0.0) {
                return Err(invalid(
                    "photosynthesis",
                    format!("{name} must be positive, got {value}"),
                ));
            }
        }
        if !(self.vpd_min < self.vpd_max) {
            return Err(invalid("photosynthesis", "vpd_min must be below vpd_max"));
        }
        if self.water_stress_days == 0 {
            return Err(invalid(
                "photosynthesis",
                "water_stress_days must be at least 1",
            ));
        }
        if self.max_quantum_yield_overstory < 0.0 || self.max_quantum_yield_understory < 0.0 {
            return Err(invalid(
                "photosynthesis",
                "quantum yields must be non-negative",
            ));
        }
        Ok(())
    }
}
