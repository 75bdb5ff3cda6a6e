//! Records and reports produced by the [`Simulation`](super::simulation::Simulation).
//!
//! ┌ [`IterationRecord`]   : one completed false-position step
//! ├ [`StartReport`]       : seed record + optional [`SameSignWarning`]
//! ├ [`IterateOutcome`]    : appended record, or already converged
//! ├ [`RunReport`]         : summary of repeated iteration ([`TerminationReason`])
//! └ [`IterationSnapshot`] : plot-ready view of one record

use std::fmt;

/// One completed step of the method.
///
/// ┌ `left`, `right`     : bracket points `x_l`, `x_r`
/// ├ `f_left`, `f_right` : function values at the bracket points
/// ├ `mid`               : false-position estimate `x_m`
/// └ `f_mid`             : function value at `mid`
///
/// All six values are rounded to the active precision when the record is
/// created and are never re-rounded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IterationRecord {
    pub left    : f64,
    pub right   : f64,
    pub f_left  : f64,
    pub f_right : f64,
    pub mid     : f64,
    pub f_mid   : f64,
}

impl IterationRecord {
    #[inline]
    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    /// `f(mid)` is exactly zero.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.f_mid == 0.0
    }

    /// Table row for this record as iteration `number` (1-based).
    pub fn row(&self, number: usize) -> TableRow {
        TableRow { number, record: *self }
    }
}

/// Table row with columns `No. | xl | xr | f(xl) | f(xr) | xm | f(xm)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TableRow {
    pub number: usize,
    pub record: IterationRecord,
}

impl TableRow {
    pub const HEADERS: [&'static str; 7] = ["No.", "xl", "xr", "f(xl)", "f(xr)", "xm", "f(xm)"];
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.record;
        write!(
            f,
            "{:>4} | {:>14} | {:>14} | {:>14} | {:>14} | {:>14} | {:>14}",
            self.number, r.left, r.right, r.f_left, r.f_right, r.mid, r.f_mid
        )
    }
}

/// Advisory raised by `start` when the seed points do not bracket a sign change.
/// The method is still attempted; it may not converge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SameSignWarning {
    pub f_left  : f64,
    pub f_right : f64,
}

impl fmt::Display for SameSignWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "regula falsi may not converge: f(xl) and f(xr) have the same sign (f(xl)={}, f(xr)={})",
            self.f_left, self.f_right
        )
    }
}

/// Result of a successful `start`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StartReport {
    pub record  : IterationRecord,
    pub warning : Option<SameSignWarning>,
}

/// Result of a successful `iterate`.
/// - [`IterateOutcome::Appended`]         : a new record was pushed as iteration `number`
/// - [`IterateOutcome::AlreadyConverged`] : `f(mid)` of the latest record is already zero,
///                                          nothing was appended
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum IterateOutcome {
    Appended         { number: usize, record: IterationRecord },
    AlreadyConverged { record: IterationRecord },
}

impl IterateOutcome {
    pub fn record(&self) -> &IterationRecord {
        match self {
            IterateOutcome::Appended { record, .. }
            | IterateOutcome::AlreadyConverged { record } => record,
        }
    }
}

/// Why [`Simulation::run`](super::simulation::Simulation::run) stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    Converged,
    IterationLimit,
}

/// Summary returned by [`Simulation::run`](super::simulation::Simulation::run).
///
/// - `appended`           : records pushed by this run
/// - `record`             : latest record after the run
/// - `termination_reason` : why the run stopped
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RunReport {
    pub appended           : usize,
    pub record             : IterationRecord,
    pub termination_reason : TerminationReason,
}

/// Items drawn on top of the sampled curve.
///
/// ┌ `left`  : `(left, f_left)`
/// ├ `right` : `(right, f_right)`
/// ├ `root`  : `(mid, 0)`, the current root estimate on the x-axis
/// └ `chord` : secant line from `left` to `right` whose x-intercept is `mid`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlotMarkers {
    pub left  : (f64, f64),
    pub right : (f64, f64),
    pub root  : (f64, f64),
    pub chord : [(f64, f64); 2],
}

/// Plot-ready view of one iteration.
///
/// Samples cover `[left - pad, right + pad]` with `pad = |right - left|`.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationSnapshot {
    pub index   : usize,
    pub title   : String,
    pub record  : IterationRecord,
    pub x_range : (f64, f64),
    pub samples : Vec<(f64, f64)>,
    pub markers : PlotMarkers,
}
