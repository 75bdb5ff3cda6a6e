//! Root-finding error types.
//!
//! ┌ [`SimulationError`] : failures of `start`, `iterate`, `run` and `snapshot`
//! │   ├ formula compilation (parse / invalid variable)
//! │   ├ division by zero ([`ZeroDivision`]): false-position update or formula
//! │   ├ non-finite function evaluation
//! │   └ misuse (not started, iteration index out of range)
//! │
//! └ [`ConfigError`]     : invalid [`SimulationCfg`](super::config::SimulationCfg) values
//!
//! Every failing operation leaves the simulation state untouched.

use thiserror::Error;

use crate::expression::{CompileError, ZeroDivisor};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("zero division: {0}")]
    DivisionByZero(ZeroDivision),

    #[error("function non-finite at x={x}, f(x)={fx}")]
    NonFiniteEvaluation { x: f64, fx: f64 },

    #[error("simulation not started: call `start` before iterating")]
    NotStarted,

    #[error("iteration {index} out of range: history holds {len} record(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Where a [`SimulationError::DivisionByZero`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ZeroDivision {
    /// `f(x1) - f(x2) == 0` in the false-position update.
    #[error("f(x1) == f(x2) == {f} at x1={x1}, x2={x2}")]
    Estimate { x1: f64, x2: f64, f: f64 },

    /// The formula itself divides by zero at `x`.
    #[error("f(x) divides by zero at x={x}")]
    Formula { x: f64 },
}

impl From<ZeroDivisor> for SimulationError {
    fn from(ZeroDivisor { x }: ZeroDivisor) -> Self {
        SimulationError::DivisionByZero(ZeroDivision::Formula { x })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid snapshot resolution: must be >= 2. got {got}")]
    InvalidResolution { got: usize },

    #[error("invalid max_iter: must be >= 1. got max_iter={got}")]
    InvalidMaxIter { got: usize },
}
