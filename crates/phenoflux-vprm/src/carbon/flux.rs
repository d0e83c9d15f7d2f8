//! Two-layer carbon flux engine.
//!
//! One call per simulated day, after the phenology updates.
//!
//! # What this engine does
//!
//! Once per day:
//!
//! 1. Estimates vegetation cover and the two-layer EVI/LAI split from the
//!    vegetation index and its transition snapshots.
//! 2. Computes Beer-Lambert gap fractions for direct and diffuse light,
//!    with the overstory leaf area forced to zero outside the growing
//!    season.
//! 3. Computes the canopy-age respiration scaler from the cumulative
//!    growing-season thermal fraction.
//!
//! Then, for each of the 24 hours:
//!
//! 1. Partitions shortwave radiation into direct and diffuse PAR via the
//!    Erbs clearness-index correlation and distributes it between the
//!    layers through the gap fractions.
//! 2. Takes leaf temperature equal to air temperature in both layers (no
//!    energy-balance model) and evaluates the layer temperature scalers,
//!    the understory with its shifted optimum.
//! 3. Advances the rolling water-stress window.
//! 4. Evaluates the leaf-out phenology scaler and the VPD scaler.
//! 5. Computes GPP per layer. The scalers co-limit by minimum rather than
//!    by product, so the strongest single stress controls the hour.
//! 6. Computes the three respiration components: smoothed autotrophic
//!    overstory and understory terms (exponential moving average, state
//!    kept in the engine across hours and days) and unsmoothed
//!    heterotrophic soil respiration.
//! 7. NEE = RECO − GPP.
//!
//! Daily totals integrate the hourly values to g C m⁻² d⁻¹.
//!
//! The smoothing state makes the engine stateful: one instance per
//! simulated point, never shared.

use phenoflux_core::forcing::{lloyd_taylor, logistic_aging, michaelis_menten, thermal_forcing, vpd_sigmoid};
use phenoflux_core::state::{PhenologyState, PhenoPhase};
use phenoflux_core::weather::{DailyWeather, SolarGeometry, HOURS_PER_DAY};
use phenoflux_core::FloatValue;

use crate::carbon::canopy::{estimate_layers, vegetation_cover, GapFractions};
use crate::carbon::radiation::{clearness_index, diffuse_fraction, shortwave_to_par};
use crate::carbon::water::water_stress_update;
use crate::parameters::{
    ModelParameters, PhotosynthesisParameters, RespirationParameters, ViDynamicsParameters,
};

/// µmol CO₂ m⁻² s⁻¹ over one hour, expressed as g C m⁻².
const UMOL_PER_S_TO_GC_PER_HOUR: FloatValue = 3600.0 * 12.011e-6;

/// Daily carbon flux computation with persistent respiration smoothing.
#[derive(Debug, Clone)]
pub struct CarbonFlux {
    photosynthesis: PhotosynthesisParameters,
    respiration: RespirationParameters,
    vi_dynamics: ViDynamicsParameters,
    growth_threshold: FloatValue,
    greendown_threshold: FloatValue,
    decline_threshold: FloatValue,
    /// Exponential-moving-average state of the overstory respiration term.
    /// Persists across hours and days for the lifetime of the engine.
    last_reco_overstory: FloatValue,
    /// Exponential-moving-average state of the understory respiration term.
    last_reco_understory: FloatValue,
}

impl CarbonFlux {
    pub fn from_parameters(parameters: &ModelParameters) -> Self {
        Self {
            photosynthesis: parameters.photosynthesis.clone(),
            respiration: parameters.respiration.clone(),
            vi_dynamics: parameters.vi_dynamics.clone(),
            growth_threshold: parameters.growth.threshold,
            greendown_threshold: parameters.greendown.threshold,
            decline_threshold: parameters.senescence.threshold,
            last_reco_overstory: 0.0,
            last_reco_understory: 0.0,
        }
    }

    /// Simulate one day of GPP, RECO and NEE, writing the hourly
    /// diagnostics and daily totals into `state.carbon`.
    pub fn simulate_day(
        &mut self,
        weather: &DailyWeather,
        solar: &SolarGeometry,
        previous: &PhenologyState,
        state: &mut PhenologyState,
    ) {
        let p = self.photosynthesis.clone();
        let r = self.respiration.clone();
        let phase = state.phase;
        let growing = phase.is_growing_season();
        let vi_fraction = state.vi_fraction();

        let cover = vegetation_cover(
            phase,
            vi_fraction,
            state.vi_at_growth,
            state.vi_at_greendown,
            self.vi_dynamics.maximum_vi,
        );
        let (overstory, understory) = estimate_layers(
            phase,
            vi_fraction,
            previous.vi_fraction(),
            state.vi_at_growth,
            cover,
            state.carbon.understory.evi,
        );
        state.carbon.vegetation_cover = cover;
        state.carbon.overstory = overstory;
        state.carbon.understory = understory;

        // Dormant overstory intercepts nothing, whatever its EVI says.
        let interception_lai = if growing { overstory.lai } else { 0.0 };
        let gaps = GapFractions::new(interception_lai, p.extinction_coefficient);

        let aging = self.aging_scaler(state);
        let phenology_scaler = self.phenology_scaler(state);
        let water_capacity = p.water_stress_days * HOURS_PER_DAY;

        let mut gpp_sum = 0.0;
        let mut reco_sum = 0.0;

        for hour in 0..HOURS_PER_DAY {
            let temperature = weather.hourly_temperature[hour];

            // Radiation partition and per-layer absorption.
            let kt = clearness_index(
                weather.hourly_solar[hour],
                solar.hourly_extraterrestrial[hour],
            );
            let fd = diffuse_fraction(kt);
            let par_total = shortwave_to_par(weather.hourly_solar[hour]);
            let par_diffuse = par_total * fd;
            let par_direct = par_total - par_diffuse;
            let absorbed_overstory =
                par_direct * (1.0 - gaps.direct) + par_diffuse * (1.0 - gaps.diffuse);
            let below_canopy = par_direct * gaps.direct + par_diffuse * gaps.diffuse;
            let absorbed_understory =
                below_canopy * (1.0 - (-p.extinction_coefficient * understory.lai).exp());
            let par_scaler_overstory =
                michaelis_menten(absorbed_overstory, p.par_half_saturation_overstory);
            let par_scaler_understory =
                michaelis_menten(absorbed_understory, p.par_half_saturation_understory);

            // Leaf temperature equals air temperature in both layers; the
            // understory optimum is shifted for its microclimate.
            let temperature_scaler_overstory = if growing {
                thermal_forcing(temperature, p.tmin, p.topt, p.tmax)
            } else {
                0.0
            };
            let temperature_scaler_understory =
                thermal_forcing(temperature, p.tmin, p.understory_topt(), p.tmax);

            let water = water_stress_update(
                &mut state.carbon.precipitation_memory,
                &mut state.carbon.et0_memory,
                water_capacity,
                weather.hourly_precipitation[hour],
                weather.hourly_et0[hour],
                vi_fraction,
                p.water_stress_threshold,
                p.water_stress_sensitivity,
            );

            let vpd = vpd_sigmoid(
                weather.hourly_vpd[hour],
                p.vpd_min,
                p.vpd_max,
                p.vpd_sensitivity,
            );

            // Liebig co-limitation: the single strongest stress wins.
            let gpp_overstory = if growing {
                let limiting = water.min(vpd.min(par_scaler_overstory));
                p.max_quantum_yield_overstory
                    * temperature_scaler_overstory
                    * limiting
                    * absorbed_overstory
                    * phenology_scaler
                    * overstory.evi
            } else {
                0.0
            };
            let limiting_understory = water.min(vpd.min(par_scaler_understory));
            let gpp_understory = p.max_quantum_yield_understory
                * temperature_scaler_understory
                * limiting_understory
                * absorbed_understory
                * understory.evi;
            let gpp = gpp_overstory + gpp_understory;

            let soil_scaler = lloyd_taylor(temperature, r.activation_energy_soil);
            let overstory_scaler = lloyd_taylor(temperature, r.activation_energy_overstory);
            let understory_scaler = lloyd_taylor(temperature, r.activation_energy_understory);

            let raw_overstory = if growing {
                overstory_scaler
                    * aging
                    * (r.reference_respiration_overstory
                        + r.respiration_response_overstory * gpp_overstory)
            } else {
                0.0
            };
            let raw_understory = understory_scaler
                * (r.reference_respiration_understory
                    + r.respiration_response_understory * gpp_understory);

            let reco_overstory =
                smooth(&mut self.last_reco_overstory, r.smoothing_alpha, raw_overstory);
            let reco_understory = smooth(
                &mut self.last_reco_understory,
                r.smoothing_alpha,
                raw_understory,
            );
            let reco_heterotrophic = r.reference_respiration_soil * soil_scaler * water;
            let reco = reco_overstory + reco_understory + reco_heterotrophic;
            let nee = reco - gpp;

            let hourly = &mut state.carbon.hourly;
            hourly.par_direct[hour] = par_direct;
            hourly.par_diffuse[hour] = par_diffuse;
            hourly.leaf_temperature_overstory[hour] = temperature;
            hourly.leaf_temperature_understory[hour] = temperature;
            hourly.temperature_scaler_overstory[hour] = temperature_scaler_overstory;
            hourly.temperature_scaler_understory[hour] = temperature_scaler_understory;
            hourly.par_scaler_overstory[hour] = par_scaler_overstory;
            hourly.par_scaler_understory[hour] = par_scaler_understory;
            hourly.water_scaler[hour] = water;
            hourly.vpd_scaler[hour] = vpd;
            hourly.phenology_scaler[hour] = phenology_scaler;
            hourly.gpp_overstory[hour] = gpp_overstory;
            hourly.gpp_understory[hour] = gpp_understory;
            hourly.gpp[hour] = gpp;
            hourly.reco_overstory[hour] = reco_overstory;
            hourly.reco_understory[hour] = reco_understory;
            hourly.reco_heterotrophic[hour] = reco_heterotrophic;
            hourly.reco[hour] = reco;
            hourly.nee[hour] = nee;

            gpp_sum += gpp;
            reco_sum += reco;
        }

        state.carbon.gpp_daily = gpp_sum * UMOL_PER_S_TO_GC_PER_HOUR;
        state.carbon.reco_daily = reco_sum * UMOL_PER_S_TO_GC_PER_HOUR;
        state.carbon.nee_daily = state.carbon.reco_daily - state.carbon.gpp_daily;
    }

    /// Canopy-age respiration scaler: a logistic over the cumulative
    /// growing-season thermal fraction, zero before growth starts.
    fn aging_scaler(&self, state: &PhenologyState) -> FloatValue {
        if !state.phase.is_growing_season() {
            return 0.0;
        }
        let total = self.growth_threshold + self.greendown_threshold + self.decline_threshold;
        let progress =
            100.0 * (state.growth.state + state.greendown.state + state.decline.state) / total;
        logistic_aging(
            progress,
            self.respiration.respiration_aging_factor,
            self.respiration.aging_steepness,
        )
    }

    /// Leaf-out phenology scaler for overstory GPP: logistic in the growth
    /// percentage during growth, 1 through greendown and decline, 0 in the
    /// dormant phases.
    fn phenology_scaler(&self, state: &PhenologyState) -> FloatValue {
        match state.phase {
            PhenoPhase::Growth => logistic_aging(
                state.growth_percentage,
                self.photosynthesis.growth_phenology_scaling_factor,
                self.photosynthesis.phenology_steepness,
            ),
            PhenoPhase::Greendown | PhenoPhase::Decline => 1.0,
            PhenoPhase::DormancyInduction | PhenoPhase::Dormancy => 0.0,
        }
    }
}

/// Exponential-moving-average step: `last + alpha * (raw - last)`.
fn smooth(last: &mut FloatValue, alpha: FloatValue, raw: FloatValue) -> FloatValue {
    let smoothed = *last + alpha * (raw - *last);
    *last = smoothed;
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;

    fn engine() -> CarbonFlux {
        CarbonFlux::from_parameters(&ModelParameters::default())
    }

    fn summer_weather() -> DailyWeather {
        let mut hourly_temperature = [14.0; HOURS_PER_DAY];
        let mut hourly_solar = [0.0; HOURS_PER_DAY];
        let mut hourly_vpd = [0.5; HOURS_PER_DAY];
        let mut hourly_et0 = [0.0; HOURS_PER_DAY];
        for hour in 6..20 {
            let noon_distance = (hour as FloatValue - 13.0).abs();
            hourly_temperature[hour] = 22.0 - noon_distance;
            hourly_solar[hour] = (700.0 - 80.0 * noon_distance).max(0.0);
            hourly_vpd[hour] = 1.2;
            hourly_et0[hour] = 0.2;
        }
        DailyWeather {
            date: NaiveDate::from_ymd_opt(2015, 7, 10).unwrap(),
            latitude: 45.0,
            temperature_max: 26.0,
            temperature_min: 13.0,
            par: 11.0,
            solar_radiation: 24.0,
            relative_humidity_max: 85.0,
            relative_humidity_min: 45.0,
            wind_speed: 2.5,
            dew_point: 11.0,
            precipitation: 2.0,
            hourly_temperature,
            hourly_solar,
            hourly_precipitation: [2.0 / 24.0; HOURS_PER_DAY],
            hourly_relative_humidity: [65.0; HOURS_PER_DAY],
            hourly_vpd,
            hourly_et0,
        }
    }

    fn summer_solar() -> SolarGeometry {
        SolarGeometry::for_day(45.0, 191).unwrap()
    }

    /// Mid-greendown state with a developed canopy.
    fn greendown_state() -> PhenologyState {
        let mut state = PhenologyState::initial(0.78);
        state.phase = PhenoPhase::Greendown;
        state.dormancy_induced = true;
        state.ecodormancy_completed = true;
        state.growth_completed = true;
        state.greendown_completed = false;
        state.decline_completed = false;
        state.growth.state = 45.0;
        state.growth_percentage = 100.0;
        state.greendown.state = 30.0;
        state.greendown_percentage = 100.0 * 30.0 / 70.0;
        state.decline_percentage = 0.0;
        state.greendown.rate = 0.8;
        state.vi_at_growth = 0.2;
        state.vi_at_senescence = 0.3;
        state.vi_at_greendown = 0.78;
        state.carbon.understory.evi = 0.15;
        state
    }

    fn dormant_state() -> PhenologyState {
        let mut state = PhenologyState::initial(0.2);
        state.phase = PhenoPhase::Dormancy;
        state.dormancy_induced = true;
        state.ecodormancy_completed = false;
        state.growth_percentage = 0.0;
        state.greendown_percentage = 0.0;
        state.decline_percentage = 0.0;
        state.growth_completed = false;
        state.greendown_completed = false;
        state.decline_completed = false;
        state
    }

    #[test]
    fn smoothing_follows_the_step_response() {
        let mut last = 2.0;
        for n in 1..=20 {
            let smoothed = smooth(&mut last, 0.3, 8.0);
            let expected = 2.0 + 6.0 * (1.0 - 0.7_f64.powi(n));
            assert_abs_diff_eq!(smoothed, expected, epsilon = 1e-12);
        }
        // Converges toward but never reaches the new level.
        assert!(last < 8.0);
        assert!(8.0 - last < 0.01);
    }

    #[test]
    fn summer_day_fixes_carbon() {
        let mut engine = engine();
        let state_before = greendown_state();
        let previous = state_before.clone();
        let mut state = state_before.next_day();

        engine.simulate_day(&summer_weather(), &summer_solar(), &previous, &mut state);

        assert!(state.carbon.gpp_daily > 0.5, "summer GPP should be substantial");
        assert!(state.carbon.reco_daily > 0.0);
        assert_relative_eq!(
            state.carbon.nee_daily,
            state.carbon.reco_daily - state.carbon.gpp_daily,
            epsilon = 1e-12
        );
        // Night hours photosynthesize nothing.
        assert_eq!(state.carbon.hourly.gpp[2], 0.0);
        assert!(state.carbon.hourly.gpp[12] > 0.0);
        // NEE identity holds hour by hour.
        for hour in 0..HOURS_PER_DAY {
            assert_relative_eq!(
                state.carbon.hourly.nee[hour],
                state.carbon.hourly.reco[hour] - state.carbon.hourly.gpp[hour],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn dormant_overstory_neither_fixes_nor_respires() {
        let mut engine = engine();
        let previous = dormant_state();
        let mut state = previous.next_day();

        engine.simulate_day(&summer_weather(), &summer_solar(), &previous, &mut state);

        for hour in 0..HOURS_PER_DAY {
            assert_eq!(state.carbon.hourly.gpp_overstory[hour], 0.0);
            assert_eq!(state.carbon.hourly.temperature_scaler_overstory[hour], 0.0);
            assert_eq!(state.carbon.hourly.phenology_scaler[hour], 0.0);
        }
        // The understory keeps exchanging carbon year-round.
        assert!(state.carbon.hourly.gpp_understory[12] > 0.0);
        assert!(state.carbon.reco_daily > 0.0);
        assert_eq!(state.carbon.vegetation_cover, 0.0);
        assert_eq!(state.carbon.overstory.lai, 0.0);
    }

    #[test]
    fn smoothed_respiration_decays_after_the_season_ends() {
        let mut engine = engine();
        engine.last_reco_overstory = 3.0;
        let previous = dormant_state();
        let mut state = previous.next_day();

        engine.simulate_day(&summer_weather(), &summer_solar(), &previous, &mut state);

        // Raw overstory respiration is zero when dormant, so the smoothed
        // value relaxes toward zero hour by hour instead of dropping.
        let first = state.carbon.hourly.reco_overstory[0];
        let last = state.carbon.hourly.reco_overstory[23];
        assert_relative_eq!(first, 3.0 * 0.7, epsilon = 1e-12);
        assert!(last < first);
        assert!(last > 0.0);
    }

    #[test]
    fn understory_respiration_is_smoothed_across_hours() {
        let mut engine = engine();
        let previous = dormant_state();
        let mut state = previous.next_day();
        engine.simulate_day(&summer_weather(), &summer_solar(), &previous, &mut state);

        // Starting from an empty smoother, the first hour carries alpha
        // times the raw term, then builds up toward it.
        let first = state.carbon.hourly.reco_understory[0];
        let later = state.carbon.hourly.reco_understory[5];
        assert!(first > 0.0);
        assert!(later > first);
    }

    #[test]
    fn water_stress_warm_up_spans_five_days() {
        let mut engine = engine();
        let weather = summer_weather();
        let solar = summer_solar();
        let mut previous = greendown_state();

        // 4 full days = 96 samples: still warming up on every hour.
        for _ in 0..4 {
            let mut state = previous.next_day();
            engine.simulate_day(&weather, &solar, &previous, &mut state);
            for hour in 0..HOURS_PER_DAY {
                assert_eq!(state.carbon.hourly.water_scaler[hour], 1.0);
            }
            previous = state;
        }

        // Day 5 fills the window at its final hour.
        let mut state = previous.next_day();
        engine.simulate_day(&weather, &solar, &previous, &mut state);
        assert_eq!(state.carbon.precipitation_memory.len(), 5 * HOURS_PER_DAY - 1);
        for hour in 0..HOURS_PER_DAY - 1 {
            assert_eq!(state.carbon.hourly.water_scaler[hour], 1.0);
        }
    }

    #[test]
    fn aging_scaler_rises_through_the_season() {
        let engine = engine();
        let mut early = greendown_state();
        early.phase = PhenoPhase::Growth;
        early.growth.state = 5.0;
        early.greendown.state = 0.0;
        let mut late = greendown_state();
        late.greendown.state = 65.0;

        let early_scaler = engine.aging_scaler(&early);
        let late_scaler = engine.aging_scaler(&late);
        assert!(early_scaler < late_scaler);
        assert_eq!(engine.aging_scaler(&dormant_state()), 0.0);
    }

    #[test]
    fn phenology_scaler_tracks_leaf_out() {
        let engine = engine();
        let mut growing = greendown_state();
        growing.phase = PhenoPhase::Growth;
        growing.growth_percentage = 10.0;
        let early = engine.phenology_scaler(&growing);
        growing.growth_percentage = 90.0;
        let late = engine.phenology_scaler(&growing);
        assert!(early < 0.2, "early leaf-out should be small, got {early}");
        assert!(late > 0.9, "late leaf-out should approach 1, got {late}");
        assert_eq!(engine.phenology_scaler(&dormant_state()), 0.0);

        let mut greendown = greendown_state();
        greendown.phase = PhenoPhase::Greendown;
        assert_eq!(engine.phenology_scaler(&greendown), 1.0);
    }
}
