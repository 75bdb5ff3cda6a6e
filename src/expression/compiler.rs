//! Closure compiler for parsed formulas.
//!
//! Each [`Expr`] node is lowered once into a boxed closure so that repeated
//! evaluation (every engine step, every plot sample) never walks the tree or
//! re-parses the text. Variable-free sub-trees are folded into constants
//! before lowering.
//!
//! Every closure returns the IEEE value together with a flag recording
//! whether a zero divisor was met on the way, so plotting keeps `inf` samples
//! while the engine can still reject `1/0`.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::ast::{Expr, UnaryOp, VARIABLE};
use super::errors::{CompileError, ZeroDivisor};
use super::parser::parse;

// (value, divided by zero)
type Kernel = Arc<dyn Fn(f64) -> (f64, bool) + Send + Sync>;

/// A formula compiled into a callable real function of `x`.
///
/// Cheap to clone: clones share the same lowered closure.
#[derive(Clone)]
pub struct CompiledFunction {
    source: String,
    kernel: Kernel,
}

impl CompiledFunction {
    /// Evaluates `f(x)`. IEEE semantics: `1/0` is infinite, `sqrt(-1)` is NaN.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        (self.kernel)(x).0
    }

    /// Evaluates `f(x)`, failing if any division in the formula has a zero
    /// divisor (`1/0`, `0**-1`, `cot(0)`, `log(x, 1)`), even where the IEEE
    /// result would be finite.
    #[inline]
    pub fn try_eval(&self, x: f64) -> Result<f64, ZeroDivisor> {
        match (self.kernel)(x) {
            (_, true)      => Err(ZeroDivisor { x }),
            (value, false) => Ok(value),
        }
    }

    /// Evaluates `f` elementwise over `xs`.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// The formula text this function was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFunction")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Compiles formula text into a [`CompiledFunction`].
///
/// # Errors
///
/// ┌ [`CompileError::Parse`]           - text is not a valid formula.
/// ├ [`CompileError::UnknownFunction`] - call of an unsupported function.
/// ├ [`CompileError::Arity`]           - builtin called with the wrong argument count.
/// └ [`CompileError::InvalidVariable`] - free variables are not exactly `{x}`;
///                                       constant formulas are rejected too.
pub fn compile(formula: &str) -> Result<CompiledFunction, CompileError> {
    let expr = parse(formula)?;
    validate_variables(&expr)?;

    debug!(formula, "compiled formula");
    Ok(CompiledFunction {
        source: formula.to_string(),
        kernel: lower(&expr),
    })
}

fn validate_variables(expr: &Expr) -> Result<(), CompileError> {
    let vars = expr.free_variables();
    if vars.len() == 1 && vars.contains(VARIABLE) {
        return Ok(());
    }
    Err(CompileError::InvalidVariable {
        found: vars
            .into_iter()
            .filter(|v| *v != VARIABLE)
            .map(str::to_string)
            .collect(),
    })
}

fn lower(expr: &Expr) -> Kernel {
    if expr.is_constant() {
        let folded = lower_node(expr)(0.0);
        return Arc::new(move |_: f64| folded);
    }
    lower_node(expr)
}

fn lower_node(expr: &Expr) -> Kernel {
    match expr {
        Expr::Number(v) => {
            let v = *v;
            Arc::new(move |_: f64| (v, false))
        }
        Expr::Variable(_) => Arc::new(|x: f64| (x, false)),
        Expr::Unary { op: UnaryOp::Neg, expr } => {
            let inner = lower(expr);
            Arc::new(move |x: f64| {
                let (v, zero) = inner(x);
                (-v, zero)
            })
        }
        Expr::Binary { op, left, right } => {
            let op = *op;
            let (l, r) = (lower(left), lower(right));
            Arc::new(move |x: f64| {
                let ((lv, lz), (rv, rz)) = (l(x), r(x));
                (op.apply(lv, rv), lz || rz || op.divides_by_zero(lv, rv))
            })
        }
        Expr::Call { function, args } => {
            let function = *function;
            match (args.as_slice(), function.unary(), function.binary()) {
                ([a], Some(k), _) => {
                    let a = lower(a);
                    Arc::new(move |x: f64| {
                        let (av, az) = a(x);
                        (k(av), az || function.divides_by_zero(&[av]))
                    })
                }
                ([a, b], _, Some(k)) => {
                    let (a, b) = (lower(a), lower(b));
                    Arc::new(move |x: f64| {
                        let ((av, az), (bv, bz)) = (a(x), b(x));
                        (k(av, bv), az || bz || function.divides_by_zero(&[av, bv]))
                    })
                }
                // arity is checked by the parser
                _ => Arc::new(|_: f64| (f64::NAN, false)),
            }
        }
    }
}
