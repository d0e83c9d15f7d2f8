//! Daily simulation driver.
//!
//! [`Simulation`] owns everything one simulated point needs: the validated
//! parameter set, the two phase machines, and the two stateful engines
//! (vegetation-index dynamics and carbon flux). One instance per point;
//! independent points are embarrassingly parallel because instances share
//! nothing.
//!
//! Each [`Simulation::step`] threads a read-only previous-day state into a
//! freshly derived current-day state and runs the update chain in order:
//! dormancy machine, growing-season machine, vegetation-index dynamics,
//! carbon flux.

use log::debug;

use phenoflux_core::errors::{PhenoError, PhenoResult};
use phenoflux_core::state::PhenologyState;
use phenoflux_core::weather::{DailyWeather, SolarGeometry, MAX_LATITUDE, MIN_LATITUDE};
use phenoflux_core::FloatValue;

use crate::carbon::CarbonFlux;
use crate::parameters::ModelParameters;
use crate::phenology::{DormancyMachine, GrowingSeasonMachine, ViDynamics};

/// One point's simulation: parameters, machines and stateful engines.
#[derive(Debug, Clone)]
pub struct Simulation {
    latitude: FloatValue,
    parameters: ModelParameters,
    dormancy: DormancyMachine,
    growing_season: GrowingSeasonMachine,
    vi_dynamics: ViDynamics,
    carbon_flux: CarbonFlux,
}

impl Simulation {
    /// Build a simulation for one point, validating the latitude and the
    /// full parameter set up front.
    pub fn new(latitude: FloatValue, parameters: ModelParameters) -> PhenoResult<Self> {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(PhenoError::InvalidLatitude(latitude));
        }
        parameters.validate()?;
        Ok(Self {
            latitude,
            dormancy: DormancyMachine::from_parameters(&parameters),
            growing_season: GrowingSeasonMachine::from_parameters(&parameters),
            vi_dynamics: ViDynamics::from_parameters(&parameters),
            carbon_flux: CarbonFlux::from_parameters(&parameters),
            parameters,
        })
    }

    pub fn latitude(&self) -> FloatValue {
        self.latitude
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    /// Advance the simulation by one day.
    ///
    /// `previous` is yesterday's state and is not mutated; the returned
    /// state is today's. The weather record must belong to this
    /// simulation's point.
    pub fn step(
        &mut self,
        weather: &DailyWeather,
        solar: &SolarGeometry,
        previous: &PhenologyState,
    ) -> PhenoResult<PhenologyState> {
        weather.validate()?;
        if (weather.latitude - self.latitude).abs() > 1e-6 {
            return Err(PhenoError::SequencingViolation(format!(
                "weather record for latitude {} fed to a simulation at latitude {}",
                weather.latitude, self.latitude
            )));
        }
        previous.check_invariants()?;

        let mut state = previous.next_day();
        state.day_length = solar.day_length;

        self.dormancy.update(weather, solar, &mut state);
        self.growing_season.update(weather, solar, &mut state);
        self.vi_dynamics.update(weather, solar, previous, &mut state);
        self.carbon_flux.simulate_day(weather, solar, previous, &mut state);

        if state.phase != previous.phase {
            debug!(
                "{}: phase {} -> {}",
                weather.date,
                previous.phase.label(),
                state.phase.label()
            );
        }
        Ok(state)
    }

    /// Run the daily loop over a sequence of (weather, solar) records,
    /// returning one state per day.
    pub fn run(
        &mut self,
        days: &[(DailyWeather, SolarGeometry)],
        initial: &PhenologyState,
    ) -> PhenoResult<Vec<PhenologyState>> {
        let mut states: Vec<PhenologyState> = Vec::with_capacity(days.len());
        for (weather, solar) in days {
            let previous = states.last().unwrap_or(initial);
            let next = self.step(weather, solar, previous)?;
            states.push(next);
        }
        Ok(states)
    }
}
