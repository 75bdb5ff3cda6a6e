//! Formula front end: text in, callable `f64 -> f64` out.
//!
//! ┌ `parser`   : pest grammar + Pratt table, produces [`Expr`]
//! ├ `ast`      : [`Expr`], operators and builtin [`Function`]s
//! ├ `compiler` : free-variable check and closure lowering
//! └ `errors`   : [`CompileError`], [`ZeroDivisor`]

pub mod ast;
pub mod errors;
pub(crate) mod parser;
mod compiler;

pub use ast::{BinaryOp, Expr, Function, UnaryOp, VARIABLE};
pub use compiler::{compile, CompiledFunction};
pub use errors::{CompileError, ZeroDivisor};
pub use parser::parse;
