//! Model parameters.
//!
//! One parameter structure per phenophase (dormancy induction,
//! endodormancy, ecodormancy, growth, greendown, senescence) plus the
//! vegetation-index dynamics, photosynthesis and respiration groups. Every
//! group carries documented defaults for a temperate deciduous forest and
//! is validated once, when a simulation is constructed; the groups are
//! read-only for the lifetime of a run.

mod dormancy_induction;
mod ecodormancy;
mod endodormancy;
mod greendown;
mod growth;
mod photosynthesis;
mod respiration;
mod senescence;
mod vi_dynamics;

pub use dormancy_induction::DormancyInductionParameters;
pub use ecodormancy::EcodormancyParameters;
pub use endodormancy::EndodormancyParameters;
pub use greendown::GreendownParameters;
pub use growth::GrowthParameters;
pub use photosynthesis::PhotosynthesisParameters;
pub use respiration::RespirationParameters;
pub use senescence::SenescenceParameters;
pub use vi_dynamics::{VegetationIndexType, ViDynamicsParameters};

use phenoflux_core::errors::{PhenoError, PhenoResult};
use phenoflux_core::FloatValue;
use serde::{Deserialize, Serialize};

/// The full parameter set for one simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub dormancy_induction: DormancyInductionParameters,
    pub endodormancy: EndodormancyParameters,
    pub ecodormancy: EcodormancyParameters,
    pub growth: GrowthParameters,
    pub greendown: GreendownParameters,
    pub senescence: SenescenceParameters,
    pub vi_dynamics: ViDynamicsParameters,
    pub photosynthesis: PhotosynthesisParameters,
    pub respiration: RespirationParameters,
}

impl ModelParameters {
    /// Validate every parameter group.
    ///
    /// Configuration errors (degenerate cardinal temperatures, non-positive
    /// thresholds, inverted sigmoid bounds) are unrecoverable and reported
    /// here rather than masked to zero inside the forcing functions.
    pub fn validate(&self) -> PhenoResult<()> {
        self.dormancy_induction.validate()?;
        self.endodormancy.validate()?;
        self.ecodormancy.validate()?;
        self.growth.validate()?;
        self.greendown.validate()?;
        self.senescence.validate()?;
        self.vi_dynamics.validate()?;
        self.photosynthesis.validate()?;
        self.respiration.validate()?;
        Ok(())
    }

    /// Parse a TOML parameter document and validate it.
    ///
    /// Missing tables and fields fall back to the documented defaults, so a
    /// document only needs to list the values it overrides.
    pub fn from_toml_str(document: &str) -> PhenoResult<Self> {
        let parameters: Self = toml::from_str(document)
            .map_err(|e| PhenoError::Error(format!("failed to parse parameter document: {e}")))?;
        parameters.validate()?;
        Ok(parameters)
    }
}

/// Build an `InvalidParameter` error for group `name`.
pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> PhenoError {
    PhenoError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Reject cardinal-temperature triples that are not strictly ordered.
///
/// `topt == tmin` or `topt == tmax` would divide by zero in the thermal
/// forcing response, so equality is as fatal as inversion.
pub(crate) fn validate_cardinals(
    name: &str,
    tmin: FloatValue,
    topt: FloatValue,
    tmax: FloatValue,
) -> PhenoResult<()> {
    if !(tmin < topt && topt < tmax) {
        return Err(invalid(
            name,
            format!("cardinal temperatures must satisfy tmin < topt < tmax, got {tmin}/{topt}/{tmax}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_threshold(name: &str, threshold: FloatValue) -> PhenoResult<()> {
    if !(threshold > 0.0) {
        return Err(invalid(
            name,
            format!("phase threshold must be positive, got {threshold}"),
        ));
    }
    Ok(())
}
