//! Abstract syntax tree for parsed formulas.
//!
//! [`Expr`] is produced by [`super::parser::parse`] and consumed by the
//! closure compiler in [`super::compiler`]. Function names are resolved to
//! [`Function`] at parse time, so the tree only ever holds callable builtins.

use std::collections::BTreeSet;

/// The only free variable a formula may contain.
pub const VARIABLE: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    #[inline]
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            BinaryOp::Pow => l.powf(r),
        }
    }

    /// `l / 0` and `0 ** negative` divide by zero; [`apply`](Self::apply)
    /// still returns the IEEE result for them.
    #[inline]
    pub fn divides_by_zero(self, l: f64, r: f64) -> bool {
        match self {
            BinaryOp::Div => r == 0.0,
            BinaryOp::Pow => l == 0.0 && r < 0.0,
            _ => false,
        }
    }
}

/// Builtin functions callable from a formula.
///
/// Names follow the usual symbolic-math spelling; a few have aliases
/// (`ln`/`log`, `abs`/`Abs`, `ceil`/`ceiling`, `max`/`Max`, `min`/`Min`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Ln,
    Log,
    Sqrt,
    Cbrt,
    Abs,
    Sign,
    Floor,
    Ceil,
    Atan2,
    Max,
    Min,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin"                 => Function::Sin,
            "cos"                 => Function::Cos,
            "tan"                 => Function::Tan,
            "cot"                 => Function::Cot,
            "sec"                 => Function::Sec,
            "csc"                 => Function::Csc,
            "asin"                => Function::Asin,
            "acos"                => Function::Acos,
            "atan"                => Function::Atan,
            "sinh"                => Function::Sinh,
            "cosh"                => Function::Cosh,
            "tanh"                => Function::Tanh,
            "asinh"               => Function::Asinh,
            "acosh"               => Function::Acosh,
            "atanh"               => Function::Atanh,
            "exp"                 => Function::Exp,
            "ln"                  => Function::Ln,
            "log"                 => Function::Log,
            "sqrt"                => Function::Sqrt,
            "cbrt"                => Function::Cbrt,
            "abs" | "Abs"         => Function::Abs,
            "sign"                => Function::Sign,
            "floor"               => Function::Floor,
            "ceil" | "ceiling"    => Function::Ceil,
            "atan2"               => Function::Atan2,
            "max" | "Max"         => Function::Max,
            "min" | "Min"         => Function::Min,
            _ => return None,
        };
        Some(function)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Function::Sin   => "sin",
            Function::Cos   => "cos",
            Function::Tan   => "tan",
            Function::Cot   => "cot",
            Function::Sec   => "sec",
            Function::Csc   => "csc",
            Function::Asin  => "asin",
            Function::Acos  => "acos",
            Function::Atan  => "atan",
            Function::Sinh  => "sinh",
            Function::Cosh  => "cosh",
            Function::Tanh  => "tanh",
            Function::Asinh => "asinh",
            Function::Acosh => "acosh",
            Function::Atanh => "atanh",
            Function::Exp   => "exp",
            Function::Ln    => "ln",
            Function::Log   => "log",
            Function::Sqrt  => "sqrt",
            Function::Cbrt  => "cbrt",
            Function::Abs   => "abs",
            Function::Sign  => "sign",
            Function::Floor => "floor",
            Function::Ceil  => "ceiling",
            Function::Atan2 => "atan2",
            Function::Max   => "Max",
            Function::Min   => "Min",
        }
    }

    /// Accepted argument counts as `(min, max)`.
    /// `log` takes an optional base as its second argument.
    pub const fn arity(self) -> (usize, usize) {
        match self {
            Function::Log                                   => (1, 2),
            Function::Atan2 | Function::Max | Function::Min => (2, 2),
            _                                               => (1, 1),
        }
    }

    pub(crate) const fn arity_label(self) -> &'static str {
        match self.arity() {
            (1, 2) => "1 or 2",
            (2, 2) => "2",
            _      => "1",
        }
    }

    /// Single-argument kernel, `None` for functions that take two arguments.
    pub fn unary(self) -> Option<fn(f64) -> f64> {
        let kernel: fn(f64) -> f64 = match self {
            Function::Sin   => f64::sin,
            Function::Cos   => f64::cos,
            Function::Tan   => f64::tan,
            Function::Cot   => |x: f64| 1.0 / x.tan(),
            Function::Sec   => |x: f64| 1.0 / x.cos(),
            Function::Csc   => |x: f64| 1.0 / x.sin(),
            Function::Asin  => f64::asin,
            Function::Acos  => f64::acos,
            Function::Atan  => f64::atan,
            Function::Sinh  => f64::sinh,
            Function::Cosh  => f64::cosh,
            Function::Tanh  => f64::tanh,
            Function::Asinh => f64::asinh,
            Function::Acosh => f64::acosh,
            Function::Atanh => f64::atanh,
            Function::Exp   => f64::exp,
            Function::Ln | Function::Log => f64::ln,
            Function::Sqrt  => f64::sqrt,
            Function::Cbrt  => f64::cbrt,
            Function::Abs   => f64::abs,
            Function::Sign  => sign,
            Function::Floor => f64::floor,
            Function::Ceil  => f64::ceil,
            Function::Atan2 | Function::Max | Function::Min => return None,
        };
        Some(kernel)
    }

    /// Two-argument kernel, `None` for functions that take one argument.
    pub fn binary(self) -> Option<fn(f64, f64) -> f64> {
        let kernel: fn(f64, f64) -> f64 = match self {
            Function::Log   => |x: f64, base: f64| x.ln() / base.ln(),
            Function::Atan2 => f64::atan2,
            Function::Max   => f64::max,
            Function::Min   => f64::min,
            _ => return None,
        };
        Some(kernel)
    }

    /// Whether the kernel divides by zero at `args`: `cot`, `sec`, `csc` are
    /// reciprocals and `log(x, b)` divides by `ln(b)`.
    pub fn divides_by_zero(self, args: &[f64]) -> bool {
        match (self, args) {
            (Function::Cot, [a])       => a.tan() == 0.0,
            (Function::Sec, [a])       => a.cos() == 0.0,
            (Function::Csc, [a])       => a.sin() == 0.0,
            (Function::Log, [_, base]) => base.ln() == 0.0,
            _ => false,
        }
    }
}

// `f64::signum` maps zero to one; the formula `sign` maps it to zero.
fn sign(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else if x.is_nan() { f64::NAN } else { x.signum() }
}

/// Parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary  { op: UnaryOp, expr: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Call   { function: Function, args: Vec<Expr> },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn neg(expr: Expr) -> Self {
        Expr::Unary { op: UnaryOp::Neg, expr: Box::new(expr) }
    }

    /// Every symbol the formula refers to, in sorted order.
    pub fn free_variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_)           => {}
            Expr::Variable(name)      => { out.insert(name.as_str()); }
            Expr::Unary { expr, .. }  => expr.collect_variables(out),
            Expr::Binary { left, right, .. } => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.free_variables().is_empty()
    }
}
