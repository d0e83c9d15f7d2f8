//! Growing-season state machine.
//!
//! Growth, greendown and decline, chained behind the dormancy machine:
//! growth opens when ecodormancy completes, greendown when growth reaches
//! 100%, decline when greendown reaches 100%. Completing decline clears the
//! induction flag and closes the annual loop.
//!
//! Decline's rate is a state-weighted blend: it starts purely thermal and
//! morphs into the photothermal dormancy-induction signal as the phase
//! progresses, weighted by the previous day's completion fraction.

use phenoflux_core::forcing::thermal_forcing;
use phenoflux_core::state::{completion_percentage, PhenoPhase, PhenologyState};
use phenoflux_core::weather::{DailyWeather, SolarGeometry};
use phenoflux_core::FloatValue;

use crate::parameters::{
    DormancyInductionParameters, GreendownParameters, GrowthParameters, ModelParameters,
    SenescenceParameters,
};

/// Daily update of the growth / greendown / decline chain.
#[derive(Debug, Clone)]
pub struct GrowingSeasonMachine {
    growth: GrowthParameters,
    greendown: GreendownParameters,
    senescence: SenescenceParameters,
    induction: DormancyInductionParameters,
}

impl GrowingSeasonMachine {
    pub fn from_parameters(parameters: &ModelParameters) -> Self {
        Self {
            growth: parameters.growth.clone(),
            greendown: parameters.greendown.clone(),
            senescence: parameters.senescence.clone(),
            induction: parameters.dormancy_induction.clone(),
        }
    }

    /// Advance all three sub-phases for one day.
    pub fn update(&self, weather: &DailyWeather, solar: &SolarGeometry, state: &mut PhenologyState) {
        let mean_temperature = weather.mean_temperature();
        self.update_growth(mean_temperature, state);
        self.update_greendown(mean_temperature, state);
        self.update_decline(mean_temperature, solar.day_length, state);
    }

    fn update_growth(&self, mean_temperature: FloatValue, state: &mut PhenologyState) {
        if state.growth_completed || !state.ecodormancy_completed {
            // Frozen: the percentage keeps the previous day's value.
            return;
        }
        let p = &self.growth;
        let rate = if state.growth.state < p.threshold {
            thermal_forcing(mean_temperature, p.tmin, p.topt, p.tmax)
        } else {
            0.0
        };
        state.growth.rate = rate;
        state.growth.state += rate;

        // Growth claims the phase the first day forcing lands after a fully
        // released dormancy, and drops the dormancy bookkeeping with it.
        if state.phase != PhenoPhase::Growth
            && state.growth.state > 0.0
            && state.ecodormancy_percentage == 100.0
        {
            state.phase = PhenoPhase::Growth;
            state.endodormancy.rate = 0.0;
            state.endodormancy.state = 0.0;
            state.endodormancy_percentage = 0.0;
            state.ecodormancy.rate = 0.0;
        }

        if state.growth.state >= p.threshold {
            state.growth.state = p.threshold;
            state.growth_percentage = 100.0;
            state.growth_completed = true;
            // Clear the induction counter for next autumn.
            state.induction.state = 0.0;
        } else {
            state.growth_percentage = completion_percentage(state.growth.state, p.threshold);
        }
    }

    fn update_greendown(&self, mean_temperature: FloatValue, state: &mut PhenologyState) {
        if state.growth_percentage != 100.0 || state.greendown_completed {
            return;
        }
        // Greendown shares the growth cardinals; it has no triple of its own.
        let g = &self.growth;
        let rate = thermal_forcing(mean_temperature, g.tmin, g.topt, g.tmax);
        state.greendown.rate = rate;
        state.greendown.state += rate;

        let percentage = completion_percentage(state.greendown.state, self.greendown.threshold);
        if percentage >= 100.0 {
            state.greendown.state = self.greendown.threshold;
            state.greendown_percentage = 100.0;
            state.greendown_completed = true;
            state.greendown.rate = 0.0;
            // Open the door for next year's induction.
            state.dormancy_induced = false;
        } else {
            state.greendown_percentage = percentage;
            state.phase = PhenoPhase::Greendown;
        }
    }

    fn update_decline(
        &self,
        mean_temperature: FloatValue,
        day_length: FloatValue,
        state: &mut PhenologyState,
    ) {
        if state.greendown_percentage != 100.0 || state.decline_completed {
            return;
        }
        // Yesterday's completion fraction weights the blend; today's update
        // has not touched the percentage yet.
        let prior_fraction = state.decline_percentage / 100.0;
        let s = &self.senescence;
        let thermal = thermal_forcing(mean_temperature, s.tmin, s.topt, s.tmax);
        let photothermal = self.induction.combined_signal(day_length, mean_temperature);
        let rate = thermal * (1.0 - prior_fraction) + photothermal * prior_fraction;
        state.decline.rate = rate;
        state.decline.state += rate;

        let percentage = completion_percentage(state.decline.state, s.threshold);
        if percentage >= 100.0 {
            state.decline.state = s.threshold;
            state.decline_percentage = 100.0;
            state.decline_completed = true;
            state.greendown.rate = 0.0;
            state.decline.rate = 0.0;
            state.dormancy_induced = false;
        } else {
            state.decline_percentage = percentage;
            state.phase = PhenoPhase::Decline;
        }
    }
}
