//! Step-wise regula falsi driven by explicit `start` / `iterate` calls.
//!
//! The [`Simulation`] owns the compiled function, the precision and the
//! append-only iteration history. Every operation is atomic: on error the
//! state is left exactly as it was before the call.

use tracing::{info, warn};

use super::common::{linspace, round_to};
use super::config::SimulationCfg;
use super::errors::SimulationError;
use super::regula_falsi::{bracket_record, narrow_bracket};
use super::report::{
    IterateOutcome, IterationRecord, IterationSnapshot, PlotMarkers, RunReport, SameSignWarning,
    StartReport, TerminationReason,
};
use super::signs::same_sign;
use crate::expression::{compile, CompiledFunction};

/// Engine lifecycle.
/// - [`EngineState::Uninitialized`] : no successful `start` yet
/// - [`EngineState::Ready`]         : `iterate` will append a record
/// - [`EngineState::Converged`]     : latest `f(mid)` is exactly zero; `iterate` is a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Ready,
    Converged,
}

/// Regula falsi engine state.
///
/// Created once by the caller and threaded through every call by reference.
#[derive(Debug, Clone)]
pub struct Simulation {
    cfg:       SimulationCfg,
    precision: u32,
    function:  Option<CompiledFunction>,
    history:   Vec<IterationRecord>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationCfg::default())
    }
}

impl Simulation {
    pub fn new(cfg: SimulationCfg) -> Self {
        Self {
            cfg,
            precision: cfg.precision(),
            function:  None,
            history:   Vec::new(),
        }
    }

    // getters
    #[inline] pub fn cfg(&self)        -> &SimulationCfg { &self.cfg }
    #[inline] pub fn precision(&self)  -> u32 { self.precision }
    #[inline] pub fn history(&self)    -> &[IterationRecord] { &self.history }
    #[inline] pub fn latest(&self)     -> Option<&IterationRecord> { self.history.last() }
    #[inline] pub fn is_started(&self) -> bool { self.function.is_some() }
    #[inline] pub fn function(&self)   -> Option<&CompiledFunction> { self.function.as_ref() }

    /// Formula text of the running simulation, empty before the first `start`.
    pub fn formula(&self) -> &str {
        self.function.as_ref().map_or("", CompiledFunction::source)
    }

    pub fn state(&self) -> EngineState {
        match self.latest() {
            None                          => EngineState::Uninitialized,
            Some(r) if r.is_converged()   => EngineState::Converged,
            Some(_)                       => EngineState::Ready,
        }
    }

    /// Starts a new simulation, replacing any previous one.
    ///
    /// # Arguments
    ///
    /// ┌ `formula`   - formula text in `x`, compiled once and cached.
    /// ├ `x1`, `x2`  - initial bracket points; rounded to `precision` first.
    /// └ `precision` - decimal places for every stored value until the next `start`.
    ///
    /// # Returns
    ///
    /// A [`StartReport`] holding the seed record
    /// `{ x1, x2, f(x1), f(x2), x3, f(x3) }` and, when `f(x1)` and `f(x2)` are
    /// both strictly positive or both strictly negative, a [`SameSignWarning`].
    ///
    /// # Errors
    ///
    /// ┌ [`SimulationError::Compile`]             - formula does not parse or is not a function of `x` alone.
    /// ├ [`SimulationError::DivisionByZero`]      - `f(x1) == f(x2)`, or `f` divides by zero
    /// │                                            at `x1`, `x2` or `x3`.
    /// └ [`SimulationError::NonFiniteEvaluation`] - `f` is NaN/inf at `x1`, `x2` or `x3`.
    ///
    /// On error the previous simulation is kept untouched.
    pub fn start(
        &mut self,
        formula: &str,
        x1: f64,
        x2: f64,
        precision: u32,
    ) -> Result<StartReport, SimulationError> {
        let x1 = round_to(x1, precision);
        let x2 = round_to(x2, precision);

        let function = compile(formula)?;
        let record   = bracket_record(&function, x1, x2, precision)?;

        let warning = same_sign(record.f_left, record.f_right).then(|| SameSignWarning {
            f_left:  record.f_left,
            f_right: record.f_right,
        });
        if let Some(w) = &warning {
            warn!("{w}");
        }

        self.history.clear();
        self.history.push(record);
        self.precision = precision;
        self.function  = Some(function);

        info!(formula, x1, x2, precision, mid = record.mid, "simulation started");
        Ok(StartReport { record, warning })
    }

    /// Pushes one false-position step.
    ///
    /// The bracket of the latest record is narrowed with
    /// [`narrow_bracket`](super::regula_falsi::narrow_bracket) and a new record
    /// is computed for it.
    ///
    /// # Returns
    ///
    /// ┌ [`IterateOutcome::Appended`]         - new record pushed to the history.
    /// └ [`IterateOutcome::AlreadyConverged`] - latest `f(mid)` is exactly zero, nothing pushed.
    ///
    /// # Errors
    ///
    /// ┌ [`SimulationError::NotStarted`]          - no successful `start` yet.
    /// ├ [`SimulationError::DivisionByZero`]      - `f(left) == f(right)` on the new bracket, or
    /// │                                            `f` divides by zero on it.
    /// └ [`SimulationError::NonFiniteEvaluation`] - `f` is NaN/inf on the new bracket or estimate.
    ///
    /// On error nothing is appended.
    pub fn iterate(&mut self) -> Result<IterateOutcome, SimulationError> {
        let (function, last) = match (&self.function, self.history.last()) {
            (Some(f), Some(last)) => (f, *last),
            _ => return Err(SimulationError::NotStarted),
        };

        if last.is_converged() {
            info!(mid = last.mid, "no longer iterating: f(xm) is already 0");
            return Ok(IterateOutcome::AlreadyConverged { record: last });
        }

        let (left, right) = narrow_bracket(&last);
        let record = bracket_record(function, left, right, self.precision)?;

        self.history.push(record);
        Ok(IterateOutcome::Appended { number: self.history.len(), record })
    }

    /// Iterates until converged or `max_iter` records have been appended.
    /// `None` uses the configured [`SimulationCfg::max_iter`].
    ///
    /// Stops at the first failing step and returns its error; records
    /// appended before it stay in the history.
    pub fn run(&mut self, max_iter: Option<usize>) -> Result<RunReport, SimulationError> {
        let max_iter = max_iter.unwrap_or(self.cfg.max_iter());
        let mut appended = 0;

        loop {
            if appended >= max_iter {
                let record = *self.latest().ok_or(SimulationError::NotStarted)?;
                return Ok(RunReport {
                    appended,
                    record,
                    termination_reason: TerminationReason::IterationLimit,
                });
            }
            match self.iterate()? {
                IterateOutcome::Appended { .. } => appended += 1,
                IterateOutcome::AlreadyConverged { record } => {
                    return Ok(RunReport {
                        appended,
                        record,
                        termination_reason: TerminationReason::Converged,
                    });
                }
            }
        }
    }

    /// Plot-ready view of iteration `index` (1-based).
    ///
    /// Samples `f` at [`SimulationCfg::resolution`] evenly spaced points over
    /// `[left - pad, right + pad]`, `pad = |right - left|`. Sampled values are
    /// not checked for finiteness. Does not mutate state.
    ///
    /// # Errors
    ///
    /// ┌ [`SimulationError::NotStarted`]      - no successful `start` yet.
    /// └ [`SimulationError::IndexOutOfRange`] - `index < 1` or `index > history.len()`.
    pub fn snapshot(&self, index: usize) -> Result<IterationSnapshot, SimulationError> {
        let function = self.function.as_ref().ok_or(SimulationError::NotStarted)?;

        let len = self.history.len();
        if index < 1 || index > len {
            return Err(SimulationError::IndexOutOfRange { index, len });
        }
        let record = self.history[index - 1];

        let pad = record.width();
        let x_range = (record.left - pad, record.right + pad);
        let xs = linspace(x_range.0, x_range.1, self.cfg.resolution());
        let ys = function.eval_many(&xs);

        Ok(IterationSnapshot {
            index,
            title: format!("[Iteration {index}]   f(x)={}", function.source()),
            record,
            x_range,
            samples: xs.into_iter().zip(ys).collect(),
            markers: PlotMarkers {
                left:  (record.left, record.f_left),
                right: (record.right, record.f_right),
                root:  (record.mid, 0.0),
                chord: [(record.left, record.f_left), (record.right, record.f_right)],
            },
        })
    }
}
