// common helpers
pub mod report;
pub mod errors;
pub mod config;
pub mod common;
pub mod signs;

// algorithm
pub mod regula_falsi;
pub mod simulation;

pub use config::SimulationCfg;
pub use errors::{ConfigError, SimulationError, ZeroDivision};
pub use report::{
    IterateOutcome, IterationRecord, IterationSnapshot, PlotMarkers, RunReport, SameSignWarning,
    StartReport, TableRow, TerminationReason,
};
pub use signs::Sign;
pub use simulation::{EngineState, Simulation};
