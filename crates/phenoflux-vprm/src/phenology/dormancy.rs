//! Dormancy state machine.
//!
//! Three sequential sub-phases, each accumulating a daily rate into a state
//! variable compared against its threshold:
//!
//! 1. **Induction** — the photothermal product of shortening days and
//!    cooling temperatures. Completing induction commits the point to
//!    dormancy and re-opens the release machinery for the new cycle.
//! 2. **Endodormancy** — chill units from the hourly-temperature
//!    efficiency curve. Never "completes": its percentage only caps the
//!    ecodormancy rate.
//! 3. **Ecodormancy** — thermal forcing under a day-length-modulated
//!    sigmoid, capped by the chilling asymptote. Completing it is the
//!    annual reset point that re-arms the growing-season machine.
//!
//! All three updates run once per day; each no-ops when its guard is
//! false, leaving the frozen quantities exactly as the previous day left
//! them.

use phenoflux_core::state::{
    completion_percentage, PhaseProgress, PhenoPhase, PhenologyState,
};
use phenoflux_core::weather::{DailyWeather, SolarGeometry, HOURS_PER_DAY};
use phenoflux_core::FloatValue;

use crate::parameters::{
    DormancyInductionParameters, EcodormancyParameters, EndodormancyParameters, ModelParameters,
};

/// Daily update of the dormancy induction / endodormancy / ecodormancy
/// chain.
#[derive(Debug, Clone)]
pub struct DormancyMachine {
    induction: DormancyInductionParameters,
    endodormancy: EndodormancyParameters,
    ecodormancy: EcodormancyParameters,
}

impl DormancyMachine {
    pub fn from_parameters(parameters: &ModelParameters) -> Self {
        Self {
            induction: parameters.dormancy_induction.clone(),
            endodormancy: parameters.endodormancy.clone(),
            ecodormancy: parameters.ecodormancy.clone(),
        }
    }

    /// Advance all three sub-phases for one day.
    pub fn update(&self, weather: &DailyWeather, solar: &SolarGeometry, state: &mut PhenologyState) {
        let mean_temperature = weather.mean_temperature();
        self.update_induction(solar.day_length, mean_temperature, state);
        self.update_endodormancy(&weather.hourly_temperature, state);
        self.update_ecodormancy(mean_temperature, solar.day_length, state);
    }

    fn update_induction(
        &self,
        day_length: FloatValue,
        mean_temperature: FloatValue,
        state: &mut PhenologyState,
    ) {
        if state.dormancy_induced {
            return;
        }
        let p = &self.induction;
        let photoperiod = p.photoperiod_signal(day_length);
        let temperature = p.temperature_signal(mean_temperature);
        state.induction.photoperiod_rate = photoperiod;
        state.induction.temperature_rate = temperature;
        state.induction.rate = photoperiod * temperature;
        state.induction.state += state.induction.rate;
        state.induction_percentage = completion_percentage(state.induction.state, p.threshold);

        if state.induction.state > 0.0 {
            state.phase = PhenoPhase::DormancyInduction;
        }
        if state.induction_percentage >= 100.0 {
            state.dormancy_induced = true;
            // Re-open dormancy release and drop forcing progress left over
            // from the previous cycle.
            state.ecodormancy_completed = false;
            state.ecodormancy.state = 0.0;
        }
    }

    fn update_endodormancy(
        &self,
        hourly_temperature: &[FloatValue; HOURS_PER_DAY],
        state: &mut PhenologyState,
    ) {
        if !state.dormancy_induced || state.ecodormancy_completed {
            return;
        }
        let mean_efficiency = hourly_temperature
            .iter()
            .map(|t| self.endodormancy.hourly_efficiency(*t))
            .sum::<FloatValue>()
            / HOURS_PER_DAY as FloatValue;
        state.endodormancy.rate = mean_efficiency;
        state.endodormancy.state += mean_efficiency;
        // Clamped at 100 but deliberately flagless: incomplete chilling
        // throttles ecodormancy instead of blocking it.
        state.endodormancy_percentage =
            completion_percentage(state.endodormancy.state, self.endodormancy.threshold);
    }

    fn update_ecodormancy(
        &self,
        mean_temperature: FloatValue,
        day_length: FloatValue,
        state: &mut PhenologyState,
    ) {
        if !state.dormancy_induced || state.ecodormancy_completed {
            // Frozen: the percentage keeps the previous day's value.
            return;
        }
        let asymptote = state.endodormancy_percentage / 100.0;
        let rate = self
            .ecodormancy
            .forcing_rate(mean_temperature, day_length, asymptote);
        state.ecodormancy.rate = rate;
        state.ecodormancy.state += rate;

        if state.ecodormancy.state > 0.0 {
            state.phase = PhenoPhase::Dormancy;
        }
        state.ecodormancy_percentage =
            completion_percentage(state.ecodormancy.state, self.ecodormancy.threshold);
        if state.ecodormancy_percentage >= 100.0 {
            state.ecodormancy_completed = true;
            // Annual reset point: re-arm the growing-season machine.
            state.growth_completed = false;
            state.greendown_completed = false;
            state.decline_completed = false;
            state.growth = PhaseProgress::default();
            state.greendown = PhaseProgress::default();
            state.decline = PhaseProgress::default();
            state.growth_percentage = 0.0;
            state.greendown_percentage = 0.0;
            state.decline_percentage = 0.0;
        }
    }
}
