use std::f64::consts::{E, PI};

use lazy_static::lazy_static;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

use super::ast::{BinaryOp, Expr, Function, VARIABLE};
use super::errors::CompileError;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::implicit_mul, Assoc::Left)
        )                                                // `*`, `/`, `2x`
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos)) // `-`, `+`
        .op(Op::infix(Rule::pow, Assoc::Right))          // `**`, `^` (right-assoc)
        ;
}

#[derive(Parser)]
#[grammar = "expression/grammar.pest"]
pub struct FormulaParser;

/// Parses formula text into an [`Expr`].
///
/// Only syntax and builtin names are checked here; free-variable validation
/// happens in [`super::compile`].
pub fn parse(source: &str) -> Result<Expr, CompileError> {
    let mut pairs = FormulaParser::parse(Rule::main, source).map_err(convert_pest_error)?;
    let main = pairs.next().ok_or_else(|| missing("main", source))?;
    let expression = main
        .into_inner()
        .find(|p| p.as_rule() == Rule::expression)
        .ok_or_else(|| missing("expression", source))?;
    build(expression)
}

fn build(pair: Pair<Rule>) -> Result<Expr, CompileError> {
    match pair.as_rule() {
        Rule::expression => PRATT_PARSER
            .map_primary(build)
            .map_prefix(|op, rhs| match op.as_rule() {
                Rule::neg => Ok(Expr::neg(rhs?)),
                Rule::pos => rhs,
                rule => unreachable!("unknown prefix operator: {rule:?}"),
            })
            .map_infix(|lhs, op, rhs| {
                let op = match op.as_rule() {
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::mul | Rule::implicit_mul => BinaryOp::Mul,
                    Rule::div => BinaryOp::Div,
                    Rule::pow => BinaryOp::Pow,
                    rule => unreachable!("unknown infix operator: {rule:?}"),
                };
                Ok(Expr::binary(op, lhs?, rhs?))
            })
            .parse(pair.into_inner()),

        Rule::number => {
            let text = pair.as_str();
            text.parse::<f64>().map(Expr::Number).map_err(|_| {
                let (line, column) = pair.as_span().start_pos().line_col();
                CompileError::Parse {
                    line,
                    column,
                    message: format!("invalid number literal `{text}`"),
                }
            })
        }

        Rule::ident => Ok(identifier(pair.as_str())),

        // `application` is `builtin ~ primary`, i.e. a call with one argument
        Rule::call | Rule::application => {
            let mut inner = pair.into_inner();
            let name = inner.next().map(|p| p.as_str()).unwrap_or_default().to_string();
            let args = inner.map(build).collect::<Result<Vec<_>, _>>()?;
            call(name, args)
        }

        rule => unreachable!("unexpected rule in primary position: {rule:?}"),
    }
}

fn identifier(name: &str) -> Expr {
    match name {
        "pi" => Expr::Number(PI),
        "E"  => Expr::Number(E),
        _    => Expr::Variable(name.to_string()),
    }
}

// `x(x + 1)` and `pi(x)` read as implicit multiplication, not as calls.
fn call(name: String, mut args: Vec<Expr>) -> Result<Expr, CompileError> {
    let Some(function) = Function::from_name(&name) else {
        let multiplicand = name == VARIABLE || matches!(identifier(&name), Expr::Number(_));
        if multiplicand && args.len() == 1 {
            let rhs = args.pop().unwrap_or(Expr::Number(1.0));
            return Ok(Expr::binary(BinaryOp::Mul, identifier(&name), rhs));
        }
        return Err(CompileError::UnknownFunction { name });
    };

    let (min, max) = function.arity();
    if args.len() < min || args.len() > max {
        return Err(CompileError::Arity {
            name,
            expected: function.arity_label(),
            got: args.len(),
        });
    }
    Ok(Expr::Call { function, args })
}

fn missing(rule: &str, source: &str) -> CompileError {
    CompileError::Parse {
        line: 1,
        column: 1,
        message: format!("missing `{rule}` in parse tree for `{source}`"),
    }
}

/// Convert a pest error into [`CompileError::Parse`].
fn convert_pest_error(err: pest::error::Error<Rule>) -> CompileError {
    let (line, column) = match err.line_col {
        LineColLocation::Pos(pos)     => pos,
        LineColLocation::Span(pos, _) => pos,
    };
    CompileError::Parse {
        line,
        column,
        message: err.variant.message().into_owned(),
    }
}
