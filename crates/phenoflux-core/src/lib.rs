//! Core types and functionality for the phenoflux model.
//!
//! This crate holds everything the model components share: the error type,
//! the pure forcing/response functions, the daily weather and solar geometry
//! input records, and the daily simulation state. The phenology state
//! machines and the carbon flux engine live in `phenoflux-vprm` and only
//! depend on what is exported here.

pub mod errors;
pub mod forcing;
pub mod state;
pub mod weather;

/// Float type used throughout the model.
pub type FloatValue = f64;
