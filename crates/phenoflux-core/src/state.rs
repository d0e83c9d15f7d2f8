//! Daily simulation state.
//!
//! A [`PhenologyState`] is the complete record of one simulated day. The
//! driver owns the states: each day it derives a fresh "current" state from
//! the previous day via [`PhenologyState::next_day`], hands it to the phase
//! machines, the vegetation-index update and the carbon flux engine in
//! order, and returns it. The previous state is never mutated, which keeps
//! every update testable against hand-constructed inputs.
//!
//! Completion flags are monotonic within a phase cycle: once set they stay
//! set until a later phase explicitly resets them to open the next annual
//! cycle. Completion percentages are clamped to exactly 100 so that
//! downstream equality comparisons (`percentage == 100.0`) are exact.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::errors::{PhenoError, PhenoResult};
use crate::weather::HOURS_PER_DAY;
use crate::FloatValue;

/// Phenological phase of the annual cycle.
///
/// The numeric codes are part of the model's vocabulary (downstream
/// formulas branch on `code() >= 3` for the growing season) and are kept
/// stable under serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhenoPhase {
    DormancyInduction,
    Dormancy,
    Growth,
    Greendown,
    Decline,
}

impl PhenoPhase {
    /// Numeric phase code, 1..=5.
    pub fn code(&self) -> u8 {
        match self {
            PhenoPhase::DormancyInduction => 1,
            PhenoPhase::Dormancy => 2,
            PhenoPhase::Growth => 3,
            PhenoPhase::Greendown => 4,
            PhenoPhase::Decline => 5,
        }
    }

    /// Human-readable phase name.
    pub fn label(&self) -> &'static str {
        match self {
            PhenoPhase::DormancyInduction => "dormancy induction",
            PhenoPhase::Dormancy => "dormancy",
            PhenoPhase::Growth => "growth",
            PhenoPhase::Greendown => "greendown",
            PhenoPhase::Decline => "decline",
        }
    }

    /// True from growth onwards (codes 3..=5).
    pub fn is_growing_season(&self) -> bool {
        self.code() >= 3
    }
}

/// Rate/state accumulator for one phenophase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PhaseProgress {
    /// Today's accumulation rate (units of the owning phase).
    pub rate: FloatValue,
    /// Accumulated state, compared against the phase threshold.
    pub state: FloatValue,
}

/// Accumulator for dormancy induction, which tracks its two component
/// signals alongside the combined rate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InductionProgress {
    /// Photoperiod component of the induction signal, [0, 1].
    pub photoperiod_rate: FloatValue,
    /// Temperature component of the induction signal, [0, 1].
    pub temperature_rate: FloatValue,
    /// Combined daily rate (product of the two components).
    pub rate: FloatValue,
    /// Accumulated photothermal units.
    pub state: FloatValue,
}

/// Enhanced vegetation index and leaf area index of one canopy layer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CanopyLayer {
    pub evi: FloatValue,
    pub lai: FloatValue,
}

/// Hourly diagnostics written by the carbon flux engine, one slot per hour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyDiagnostics {
    /// Direct-beam PAR above the canopy (µmol m⁻² s⁻¹).
    pub par_direct: [FloatValue; HOURS_PER_DAY],
    /// Diffuse PAR above the canopy (µmol m⁻² s⁻¹).
    pub par_diffuse: [FloatValue; HOURS_PER_DAY],
    /// Overstory leaf temperature (°C).
    pub leaf_temperature_overstory: [FloatValue; HOURS_PER_DAY],
    /// Understory leaf temperature (°C).
    pub leaf_temperature_understory: [FloatValue; HOURS_PER_DAY],
    pub temperature_scaler_overstory: [FloatValue; HOURS_PER_DAY],
    pub temperature_scaler_understory: [FloatValue; HOURS_PER_DAY],
    pub par_scaler_overstory: [FloatValue; HOURS_PER_DAY],
    pub par_scaler_understory: [FloatValue; HOURS_PER_DAY],
    pub water_scaler: [FloatValue; HOURS_PER_DAY],
    pub vpd_scaler: [FloatValue; HOURS_PER_DAY],
    pub phenology_scaler: [FloatValue; HOURS_PER_DAY],
    /// Overstory gross primary production (µmol CO₂ m⁻² s⁻¹).
    pub gpp_overstory: [FloatValue; HOURS_PER_DAY],
    /// Understory gross primary production (µmol CO₂ m⁻² s⁻¹).
    pub gpp_understory: [FloatValue; HOURS_PER_DAY],
    pub gpp: [FloatValue; HOURS_PER_DAY],
    /// Smoothed overstory respiration (µmol CO₂ m⁻² s⁻¹).
    pub reco_overstory: [FloatValue; HOURS_PER_DAY],
    /// Smoothed understory respiration (µmol CO₂ m⁻² s⁻¹).
    pub reco_understory: [FloatValue; HOURS_PER_DAY],
    /// Heterotrophic (soil) respiration (µmol CO₂ m⁻² s⁻¹).
    pub reco_heterotrophic: [FloatValue; HOURS_PER_DAY],
    pub reco: [FloatValue; HOURS_PER_DAY],
    /// Net ecosystem exchange, RECO − GPP (µmol CO₂ m⁻² s⁻¹).
    pub nee: [FloatValue; HOURS_PER_DAY],
}

/// Carbon-exchange bookkeeping carried from day to day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarbonExchangeState {
    /// Rolling hourly precipitation memory for the water-stress window (mm).
    pub precipitation_memory: VecDeque<FloatValue>,
    /// Rolling hourly reference-ET0 memory for the water-stress window (mm).
    pub et0_memory: VecDeque<FloatValue>,
    /// Hourly diagnostics for the current day.
    pub hourly: HourlyDiagnostics,
    /// Daily gross primary production (g C m⁻² d⁻¹).
    pub gpp_daily: FloatValue,
    /// Daily ecosystem respiration (g C m⁻² d⁻¹).
    pub reco_daily: FloatValue,
    /// Daily net ecosystem exchange, RECO − GPP (g C m⁻² d⁻¹).
    pub nee_daily: FloatValue,
    /// Fraction of the pixel covered by overstory vegetation, [0, 1].
    pub vegetation_cover: FloatValue,
    pub overstory: CanopyLayer,
    pub understory: CanopyLayer,
}

/// Complete simulation state for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhenologyState {
    pub phase: PhenoPhase,

    pub induction: InductionProgress,
    pub endodormancy: PhaseProgress,
    pub ecodormancy: PhaseProgress,
    pub growth: PhaseProgress,
    pub greendown: PhaseProgress,
    pub decline: PhaseProgress,

    pub dormancy_induced: bool,
    pub ecodormancy_completed: bool,
    pub growth_completed: bool,
    pub greendown_completed: bool,
    pub decline_completed: bool,

    pub induction_percentage: FloatValue,
    pub endodormancy_percentage: FloatValue,
    pub ecodormancy_percentage: FloatValue,
    pub growth_percentage: FloatValue,
    pub greendown_percentage: FloatValue,
    pub decline_percentage: FloatValue,

    /// Day length of this day (h), kept so the vegetation-index update can
    /// compare today's day length with yesterday's.
    pub day_length: FloatValue,

    /// Vegetation index, stored ×100.
    pub vi: FloatValue,
    /// Today's vegetation-index increment (×100 units per day).
    pub vi_rate: FloatValue,
    /// Unscaled mirror of `vi` (fraction), for downstream formulas.
    pub vi_reference: FloatValue,
    /// Vegetation index (fraction) on the first day of growth.
    pub vi_at_growth: FloatValue,
    /// Vegetation index (fraction) on the first day of dormancy.
    pub vi_at_senescence: FloatValue,
    /// Vegetation index (fraction) on the first day of decline.
    pub vi_at_greendown: FloatValue,

    pub carbon: CarbonExchangeState,
}

impl PhenologyState {
    /// State for the day before a simulation starts.
    ///
    /// Models a point in late autumn whose previous growing season has just
    /// finished: the growing-season phases are marked complete, dormancy
    /// induction has not started, and the vegetation index sits at
    /// `initial_vi` (a fraction in [0, 1]). The first simulated days will
    /// accumulate dormancy induction and enter the annual cycle from there.
    pub fn initial(initial_vi: FloatValue) -> Self {
        Self {
            phase: PhenoPhase::Decline,
            induction: InductionProgress::default(),
            endodormancy: PhaseProgress::default(),
            ecodormancy: PhaseProgress::default(),
            growth: PhaseProgress::default(),
            greendown: PhaseProgress::default(),
            decline: PhaseProgress::default(),
            dormancy_induced: false,
            ecodormancy_completed: true,
            growth_completed: true,
            greendown_completed: true,
            decline_completed: true,
            induction_percentage: 0.0,
            endodormancy_percentage: 0.0,
            ecodormancy_percentage: 100.0,
            growth_percentage: 100.0,
            greendown_percentage: 100.0,
            decline_percentage: 100.0,
            day_length: 12.0,
            vi: initial_vi * 100.0,
            vi_rate: 0.0,
            vi_reference: initial_vi,
            vi_at_growth: initial_vi,
            vi_at_senescence: initial_vi,
            vi_at_greendown: initial_vi,
            carbon: CarbonExchangeState::default(),
        }
    }

    /// Derive the starting point of the next day from this one.
    ///
    /// All phase accumulators, flags, percentages and vegetation-index
    /// fields are copied forward; per-day carbon diagnostics and daily sums
    /// are cleared. The rolling water-stress memories and canopy structure
    /// persist, since they carry information across days.
    pub fn next_day(&self) -> Self {
        let mut next = self.clone();
        next.carbon.hourly = HourlyDiagnostics::default();
        next.carbon.gpp_daily = 0.0;
        next.carbon.reco_daily = 0.0;
        next.carbon.nee_daily = 0.0;
        next
    }

    /// Vegetation index as a fraction in [0, 1].
    pub fn vi_fraction(&self) -> FloatValue {
        self.vi / 100.0
    }

    /// Check the flag ordering and value bounds the phase machines rely on.
    ///
    /// A state that fails here was not produced by the daily update chain
    /// (or was corrupted by the caller); feeding it onwards would silently
    /// derail the machines, so the driver rejects it up front.
    pub fn check_invariants(&self) -> PhenoResult<()> {
        if self.greendown_completed && !self.growth_completed {
            return Err(PhenoError::SequencingViolation(
                "greendown marked complete before growth".to_string(),
            ));
        }
        if self.decline_completed && !self.greendown_completed {
            return Err(PhenoError::SequencingViolation(
                "decline marked complete before greendown".to_string(),
            ));
        }
        if self.growth_completed && self.growth_percentage != 100.0 {
            return Err(PhenoError::SequencingViolation(format!(
                "growth marked complete at {}%",
                self.growth_percentage
            )));
        }
        for (name, pct) in [
            ("induction", self.induction_percentage),
            ("endodormancy", self.endodormancy_percentage),
            ("ecodormancy", self.ecodormancy_percentage),
            ("growth", self.growth_percentage),
            ("greendown", self.greendown_percentage),
            ("decline", self.decline_percentage),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(PhenoError::SequencingViolation(format!(
                    "{name} percentage {pct} outside [0, 100]"
                )));
            }
        }
        for (name, progress) in [
            ("endodormancy", &self.endodormancy),
            ("ecodormancy", &self.ecodormancy),
            ("growth", &self.growth),
            ("greendown", &self.greendown),
            ("decline", &self.decline),
        ] {
            if !progress.state.is_finite() || progress.state < 0.0 {
                return Err(PhenoError::SequencingViolation(format!(
                    "{name} state {} is negative or non-finite",
                    progress.state
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.vi) {
            return Err(PhenoError::SequencingViolation(format!(
                "vegetation index {} outside [0, 100]",
                self.vi
            )));
        }
        if !(0.0..=24.0).contains(&self.day_length) {
            return Err(PhenoError::SequencingViolation(format!(
                "day length {} outside [0, 24]",
                self.day_length
            )));
        }
        Ok(())
    }
}

/// Completion percentage of a phase accumulator against its threshold.
///
/// Clamped to exactly 100 at and beyond the threshold so that equality
/// comparisons against 100 hold bit-exactly downstream.
pub fn completion_percentage(state: FloatValue, threshold: FloatValue) -> FloatValue {
    debug_assert!(threshold > 0.0, "phase thresholds must be positive");
    let percentage = state / threshold * 100.0;
    if percentage >= 100.0 {
        100.0
    } else {
        percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn completion_percentage_clamps_to_exactly_one_hundred() {
        assert_eq!(completion_percentage(50.0, 50.0), 100.0);
        assert_eq!(completion_percentage(50.0 + 1e-9, 50.0), 100.0);
        assert_eq!(completion_percentage(1e9, 50.0), 100.0);
        assert!(is_close!(completion_percentage(25.0, 50.0), 50.0));
        assert_eq!(completion_percentage(0.0, 50.0), 0.0);
    }

    #[test]
    fn phase_codes_are_stable() {
        assert_eq!(PhenoPhase::DormancyInduction.code(), 1);
        assert_eq!(PhenoPhase::Dormancy.code(), 2);
        assert_eq!(PhenoPhase::Growth.code(), 3);
        assert_eq!(PhenoPhase::Greendown.code(), 4);
        assert_eq!(PhenoPhase::Decline.code(), 5);
        assert!(!PhenoPhase::Dormancy.is_growing_season());
        assert!(PhenoPhase::Growth.is_growing_season());
        assert!(PhenoPhase::Decline.is_growing_season());
    }

    #[test]
    fn initial_state_passes_invariants() {
        let state = PhenologyState::initial(0.25);
        state.check_invariants().unwrap();
        assert_eq!(state.phase, PhenoPhase::Decline);
        assert!(is_close!(state.vi, 25.0));
        assert!(is_close!(state.vi_fraction(), 0.25));
    }

    #[test]
    fn next_day_clears_daily_diagnostics_but_keeps_memories() {
        let mut state = PhenologyState::initial(0.3);
        state.carbon.gpp_daily = 4.2;
        state.carbon.hourly.gpp[11] = 9.0;
        state.carbon.precipitation_memory.push_back(1.5);
        state.growth.state = 12.0;

        let next = state.next_day();
        assert_eq!(next.carbon.gpp_daily, 0.0);
        assert_eq!(next.carbon.hourly.gpp[11], 0.0);
        assert_eq!(next.carbon.precipitation_memory.len(), 1);
        assert!(is_close!(next.growth.state, 12.0));
    }

    #[test]
    fn invariants_reject_out_of_order_flags() {
        let mut state = PhenologyState::initial(0.3);
        state.decline_completed = true;
        state.greendown_completed = false;
        state.growth_completed = false;
        assert!(matches!(
            state.check_invariants(),
            Err(PhenoError::SequencingViolation(_))
        ));
    }

    #[test]
    fn invariants_reject_out_of_range_percentages() {
        let mut state = PhenologyState::initial(0.3);
        state.growth_percentage = 100.0001;
        assert!(state.check_invariants().is_err());

        let mut state = PhenologyState::initial(0.3);
        state.vi = 130.0;
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn state_serializes_round_trip() {
        let mut state = PhenologyState::initial(0.4);
        state.phase = PhenoPhase::Growth;
        state.carbon.understory.evi = 0.21;
        state.carbon.et0_memory.extend([0.1, 0.2]);

        let json = serde_json::to_string(&state).unwrap();
        let parsed: PhenologyState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.phase, PhenoPhase::Growth);
        assert!(is_close!(parsed.carbon.understory.evi, 0.21));
        assert_eq!(parsed.carbon.et0_memory.len(), 2);
    }
}
