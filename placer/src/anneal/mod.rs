pub mod acceptance;
pub mod controller;
pub mod driver;
pub mod schedule;
pub mod stats;

pub use controller::{AnnealParams, AnnealingController, PlacementPhase, StepOutcome};
pub use driver::{RunSummary, StopPolicy, run_to_completion};
pub use schedule::CoolingSchedule;
