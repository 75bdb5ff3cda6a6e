//! Step-wise regula falsi (false position) root finding.
//!
//! ┌ [`expression`]   : formula text → [`CompiledFunction`]
//! └ [`root_finding`] : [`Simulation`] engine with `start`, `iterate`, `run`, `snapshot`
//!
//! ```
//! use falsi::{IterateOutcome, Simulation};
//!
//! let mut sim = Simulation::default();
//! let seed = sim.start("x**2 - 4", 0.0, 5.0, 4)?.record;
//! assert_eq!(seed.mid, 0.8);
//!
//! let step = sim.iterate()?;
//! assert!(matches!(step, IterateOutcome::Appended { number: 2, .. }));
//! # Ok::<(), falsi::SimulationError>(())
//! ```

pub mod expression;
pub mod root_finding;

pub use expression::{compile, CompileError, CompiledFunction};
pub use root_finding::{
    EngineState, IterateOutcome, IterationRecord, IterationSnapshot, RunReport, Simulation,
    SimulationCfg, SimulationError, StartReport, TerminationReason, ZeroDivision,
};
