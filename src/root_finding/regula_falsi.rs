use tracing::debug;

use super::common::round_to;
use super::errors::{SimulationError, ZeroDivision};
use super::report::IterationRecord;
use super::signs::Sign;
use crate::expression::CompiledFunction;

/// Calculates the false-position estimate: the x-intercept of the line
/// through `(x1, f1)` and `(x2, f2)`.
///
/// `x3 = x2 - f2 * (x1 - x2) / (f1 - f2)`
///
/// # Errors
/// └ [`SimulationError::DivisionByZero`] ([`ZeroDivision::Estimate`]) if `f1 == f2`.
#[inline]
pub fn regula_falsi_estimate(
    (x1, f1): (f64, f64),
    (x2, f2): (f64, f64),
) -> Result<f64, SimulationError> {
    let denom = f1 - f2;
    if denom == 0.0 {
        return Err(SimulationError::DivisionByZero(ZeroDivision::Estimate { x1, x2, f: f1 }));
    }
    Ok(x2 - (f2 * (x1 - x2)) / denom)
}

/// Picks the bracket for the step after `last`.
///
/// ┌ `sign(f_mid) == sign(f_right)` → root lies in `[left, mid]`, returns `(left, mid)`
/// └ otherwise                     → root lies in `[mid, right]`, returns `(mid, right)`
///
/// The endpoint whose function value shares the sign of `f_mid` is the one
/// replaced. Signs are three-way, see [`Sign`].
#[inline]
pub fn narrow_bracket(last: &IterationRecord) -> (f64, f64) {
    if Sign::of(last.f_mid) == Sign::of(last.f_right) {
        (last.left, last.mid)
    } else {
        (last.mid, last.right)
    }
}

/// Evaluates `func` at `x`, rejecting zero divisors, NaN and infinities.
#[inline]
pub(crate) fn eval_finite(func: &CompiledFunction, x: f64) -> Result<f64, SimulationError> {
    let fx = func.try_eval(x)?;
    if !fx.is_finite() {
        return Err(SimulationError::NonFiniteEvaluation { x, fx });
    }
    Ok(fx)
}

/// Builds the record for bracket `[left, right]`.
///
/// # Arguments
/// ┌ `func`        - compiled function
/// ├ `left, right` - bracket points, already rounded to `precision`
/// └ `precision`   - decimal places for every stored value
///
/// The estimate is computed from the unrounded function values at the
/// bracket points; only the stored values are rounded.
///
/// # Errors
/// ├ [`SimulationError::DivisionByZero`]      - `f(left) == f(right)`, or `f` divides by zero
/// │                                            at a bracket point or at the estimate.
/// └ [`SimulationError::NonFiniteEvaluation`] - `f` is NaN/inf at a bracket point or at the estimate.
pub(crate) fn bracket_record(
    func: &CompiledFunction,
    left: f64,
    right: f64,
    precision: u32,
) -> Result<IterationRecord, SimulationError> {
    let f_left  = eval_finite(func, left)?;
    let f_right = eval_finite(func, right)?;

    let raw_mid = regula_falsi_estimate((left, f_left), (right, f_right))?;
    if !raw_mid.is_finite() {
        return Err(SimulationError::NonFiniteEvaluation { x: raw_mid, fx: func.eval(raw_mid) });
    }
    let mid   = round_to(raw_mid, precision);
    let f_mid = eval_finite(func, mid)?;

    let record = IterationRecord {
        left    : round_to(left, precision),
        right   : round_to(right, precision),
        f_left  : round_to(f_left, precision),
        f_right : round_to(f_right, precision),
        mid,
        f_mid   : round_to(f_mid, precision),
    };
    debug!(?record, "computed regula falsi step");
    Ok(record)
}
