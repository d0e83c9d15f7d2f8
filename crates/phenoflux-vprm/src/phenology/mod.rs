//! Phenology components.
//!
//! - [`DormancyMachine`]: dormancy induction, endodormancy (chilling) and
//!   ecodormancy (forcing) sub-phases
//! - [`GrowingSeasonMachine`]: growth, greendown and decline sub-phases
//! - [`ViDynamics`]: phase-driven vegetation-index rates and the
//!   per-cycle transition snapshots
//!
//! The two machines gate each other through the completion flags on the
//! daily state and together close the annual cycle; the vegetation-index
//! engine runs after both and only reads phases and percentages.

mod dormancy;
mod growing_season;
mod vi_dynamics;

pub use dormancy::DormancyMachine;
pub use growing_season::GrowingSeasonMachine;
pub use vi_dynamics::ViDynamics;
