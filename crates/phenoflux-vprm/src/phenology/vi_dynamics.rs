//! Vegetation-index dynamics.
//!
//! Translates the phenophase and its completion percentage into a daily
//! vegetation-index rate and takes one snapshot per annual cycle at each of
//! the three structural transitions: the index at growth start, at
//! dormancy (senescence) start and at decline (greendown end) start. The
//! index is stored ×100; the snapshots and bounds are fractions.
//!
//! The engine owns one piece of long-lived state, the `start_dormancy`
//! flip-flop that marks the first day of a dormancy episode. One engine
//! instance belongs to one simulation and must not be shared across
//! points.

use phenoflux_core::forcing::{clamped_exp, symmetric_bell, thermal_forcing};
use phenoflux_core::state::{PhenoPhase, PhenologyState};
use phenoflux_core::weather::{DailyWeather, SolarGeometry};
use phenoflux_core::FloatValue;

use crate::parameters::{
    GrowthParameters, ModelParameters, VegetationIndexType, ViDynamicsParameters,
};

/// Daily vegetation-index update.
#[derive(Debug, Clone)]
pub struct ViDynamics {
    parameters: ViDynamicsParameters,
    growth: GrowthParameters,
    start_dormancy: bool,
}

impl ViDynamics {
    pub fn from_parameters(parameters: &ModelParameters) -> Self {
        Self {
            parameters: parameters.vi_dynamics.clone(),
            growth: parameters.growth.clone(),
            start_dormancy: false,
        }
    }

    /// Compute today's index rate and apply it, after both phase machines
    /// have run. `previous` is yesterday's state; `state` already carries
    /// today's phase and percentages.
    pub fn update(
        &mut self,
        weather: &DailyWeather,
        solar: &SolarGeometry,
        previous: &PhenologyState,
        state: &mut PhenologyState,
    ) {
        let p = &self.parameters;
        let previous_vi = previous.vi;
        let vi_fraction = previous_vi / 100.0;
        let mean_temperature = weather.mean_temperature();

        if state.phase != PhenoPhase::Dormancy {
            self.start_dormancy = false;
        }

        let rate = match state.phase {
            PhenoPhase::Dormancy => {
                if !self.start_dormancy {
                    self.start_dormancy = true;
                    // Floor the snapshot just above the lower bound so the
                    // decay formulas keep a usable span.
                    state.vi_at_senescence = if vi_fraction <= p.minimum_vi {
                        p.minimum_vi + 0.01
                    } else {
                        vi_fraction
                    };
                }
                let floor_distance = ((vi_fraction - p.minimum_vi)
                    / (p.maximum_vi - p.minimum_vi))
                    .clamp(0.0, 1.0);
                if mean_temperature < self.growth.tmin {
                    // Cold decay, decelerating toward the floor.
                    let denominator = self.growth.tmin.abs().max(1.0);
                    let deficit =
                        ((mean_temperature - self.growth.tmin) / denominator).clamp(-1.0, 0.0);
                    p.n_vi_endodormancy * deficit * floor_distance
                } else if solar.day_length > previous.day_length {
                    // Mild late-winter days green the understory up only
                    // while days are still lengthening.
                    let g = &self.growth;
                    p.n_vi_ecodormancy
                        * thermal_forcing(mean_temperature, g.tmin, g.topt, g.tmax)
                        * (1.0 - floor_distance)
                } else {
                    0.0
                }
            }
            PhenoPhase::Growth => {
                if previous.phase != PhenoPhase::Growth {
                    state.vi_at_growth = vi_fraction.min(p.maximum_vi - 0.01);
                }
                let span = p.maximum_vi - state.vi_at_growth;
                let distance = if span > 0.0 {
                    ((vi_fraction - state.vi_at_growth) / span).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                p.n_vi_growth * (1.0 - state.greendown_percentage / 100.0) * (1.0 - distance)
            }
            PhenoPhase::Greendown => {
                let weight = match p.index_type {
                    VegetationIndexType::Evi => {
                        1.0 - clamped_exp(-state.greendown_percentage / p.greendown_saturation)
                    }
                    VegetationIndexType::Ndvi => state.greendown_percentage / 100.0,
                };
                -(p.n_vi_greendown * weight * state.greendown.rate)
            }
            PhenoPhase::Decline | PhenoPhase::DormancyInduction => {
                if state.phase == PhenoPhase::Decline && previous.phase != PhenoPhase::Decline {
                    state.vi_at_greendown = vi_fraction;
                }
                -p.n_vi_greendown - p.n_vi_senescence * symmetric_bell(state.decline_percentage)
            }
        };

        state.vi = (previous_vi + rate).clamp(p.minimum_vi * 100.0, 100.0);
        state.vi_rate = rate;
        state.vi_reference = state.vi / 100.0;
    }
}
