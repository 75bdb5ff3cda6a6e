//! Expression compiler error types.
//!
//! ┌ [`CompileError::Parse`]           : malformed formula text
//! ├ [`CompileError::InvalidVariable`] : free variables are not exactly `{x}`
//! ├ [`CompileError::UnknownFunction`] : call of an unsupported function
//! └ [`CompileError::Arity`]           : wrong number of call arguments
//!
//! [`ZeroDivisor`] is not a compile error: it is raised by
//! [`CompiledFunction::try_eval`](super::CompiledFunction::try_eval).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("f(x) cannot be parsed at line {line}, column {column}: {message}")]
    Parse { line: usize, column: usize, message: String },

    #[error("{}", invalid_variable_message(.found))]
    InvalidVariable { found: Vec<String> },

    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    #[error("function `{name}` takes {expected} argument(s), got {got}")]
    Arity { name: String, expected: &'static str, got: usize },
}

/// Evaluating the formula at `x` divided by zero somewhere in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("f(x) divides by zero at x={x}")]
pub struct ZeroDivisor {
    pub x: f64,
}

fn invalid_variable_message(found: &[String]) -> String {
    if found.is_empty() {
        "f(x) does not contain the variable \"x\"".to_string()
    } else {
        format!("f(x) contains a variable that is not \"x\": {}", found.join(", "))
    }
}
