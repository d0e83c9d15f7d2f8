//! Vegetation-index dynamics parameters.
//!
//! The daily vegetation-index rate is assembled from phase-specific
//! coefficients, all expressed in ×100 index units per day. The bounds are
//! fractions: the index itself is stored ×100 but every formula that
//! compares against the bounds works on the fraction.

use phenoflux_core::errors::PhenoResult;
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

use super::invalid;

/// Which vegetation index the simulation tracks.
///
/// The two indices share every formula except the greendown weighting,
/// which saturates exponentially for EVI and linearly for NDVI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VegetationIndexType {
    Evi,
    Ndvi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViDynamicsParameters {
    /// Vegetation index tracked by the simulation
    /// default: EVI
    pub index_type: VegetationIndexType,

    /// Lower bound of the index (fraction)
    /// default: 0.12
    pub minimum_vi: FloatValue,

    /// Upper bound the growth response asymptotes toward (fraction)
    /// default: 0.85
    pub maximum_vi: FloatValue,

    /// Green-up rate coefficient during growth
    /// unit: index ×100 d⁻¹
    /// default: 3.0
    pub n_vi_growth: FloatValue,

    /// Decline rate coefficient during greendown and decline
    /// unit: index ×100 d⁻¹
    /// default: 0.12
    pub n_vi_greendown: FloatValue,

    /// Peak senescence rate coefficient during decline
    /// unit: index ×100 d⁻¹
    /// default: 2.5
    pub n_vi_senescence: FloatValue,

    /// Late-winter green-up coefficient during dormancy
    /// unit: index ×100 d⁻¹
    /// default: 0.5
    pub n_vi_ecodormancy: FloatValue,

    /// Cold-decay coefficient during dormancy
    /// unit: index ×100 d⁻¹
    /// default: 0.3
    pub n_vi_endodormancy: FloatValue,

    /// e-folding completion percentage of the EVI greendown weight
    /// unit: %
    /// default: 25.0
    pub greendown_saturation: FloatValue,
}

impl Default for ViDynamicsParameters {
    fn default() -> Self {
        Self {
            index_type: VegetationIndexType::Evi,
            minimum_vi: 0.12,
            maximum_vi: 0.85,
            n_vi_growth: 3.0,
            n_vi_greendown: 0.12,
            n_vi_senescence: 2.5,
            n_vi_ecodormancy: 0.5,
            n_vi_endodormancy: 0.3,
            greendown_saturation: 25.0,
        }
    }
}

impl ViDynamicsParameters {
    pub fn validate(&self) -> PhenoResult<()> {
        if !(0.0..1.0).contains(&self.minimum_vi) {
            return Err(invalid("vi_dynamics", "minimum_vi must be in [0, 1)"));
        }
        if !(self.minimum_vi < self.maximum_vi && self.maximum_vi <= 1.0) {
            return Err(invalid(
                "vi_dynamics",
                "maximum_vi must be in (minimum_vi, 1]",
            ));
        }
        for (name, value) in [
            ("n_vi_growth", self.n_vi_growth),
            ("n_vi_greendown", self.n_vi_greendown),
            ("n_vi_senescence", self.n_vi_senescence),
            ("n_vi_ecodormancy", self.n_vi_ecodormancy),
            ("n_vi_endodormancy", self.n_vi_endodormancy),
        ] {
            if value < 0.0 {
                return Err(invalid(
                    "vi_dynamics",
                    format!("{name} must be non-negative, got {value}"),
                ));
            }
        }
        if !(self.greendown_saturation > 0.0) {
            return Err(invalid(
                "vi_dynamics",
                "greendown_saturation must be positive",
            ));
        }
        Ok(())
    }
}
