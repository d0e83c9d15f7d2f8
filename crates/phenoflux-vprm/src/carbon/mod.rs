//! Two-layer carbon exchange.
//!
//! - `radiation`: clearness index, Erbs diffuse partition, PAR conversion
//! - `canopy`: vegetation cover, overstory/understory EVI-LAI split,
//!   Beer-Lambert gap fractions
//! - `water`: rolling precipitation/ET0 water-stress window
//! - `flux`: the hourly GPP/RECO/NEE engine with persistent respiration
//!   smoothing

pub mod canopy;
pub mod flux;
pub mod radiation;
pub mod water;

pub use flux::CarbonFlux;
