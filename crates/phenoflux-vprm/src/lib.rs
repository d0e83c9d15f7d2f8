//! Phenology-coupled two-layer VPRM carbon flux model.
//!
//! This crate advances a single vegetation point through its annual
//! dormancy / growth / senescence cycle one day at a time and derives the
//! hourly carbon exchange of a two-layer (overstory/understory) canopy.
//!
//! # Module Organisation
//!
//! - `phenology`: the dormancy and growing-season state machines and the
//!   vegetation-index dynamics
//! - `carbon`: radiation partitioning, canopy structure, water stress and
//!   the hourly GPP/RECO/NEE engine
//! - `parameters`: one parameter structure per phenophase plus the
//!   vegetation-index, photosynthesis and respiration groups, with
//!   documented defaults and TOML loading
//! - `driver`: the [`Simulation`] type that owns the engines and threads
//!   the daily states
//!
//! # Daily update order
//!
//! dormancy machine → growing-season machine → vegetation-index dynamics →
//! carbon flux. Each day consumes yesterday's state read-only and produces
//! a fresh state; the only values that live outside the daily states are
//! the respiration-smoothing scalars and the dormancy-entry flip-flop,
//! owned by the engines inside one [`Simulation`].

pub mod carbon;
pub mod driver;
pub mod parameters;
pub mod phenology;

pub use driver::Simulation;
