#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Expressions for the NineML object model

mod builtins;
mod display;
pub mod error;
mod expr;
mod expression;
mod statement;
mod token;
mod util;

use util::{InputSpan, Result as InternalResult};

pub use builtins::{BuiltinRef, StandardBuiltins, TIME_SYMBOL};
pub use error::{ParseError, ParseErrorReason};
pub use expr::{BinaryOp, Expr, Literal, UnaryOp};
pub use statement::Equation;

/// Parses a right-hand-side expression.
///
/// # Errors
///
/// Returns an error if the input is not a complete, syntactically valid
/// expression.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    parse(input, expression::parse_complete)
}

/// Parses a time derivative of the form `dX/dt = expr`.
///
/// # Errors
///
/// Returns an error if the input is not a valid time derivative.
pub fn parse_time_derivative(input: &str) -> Result<Equation, ParseError> {
    parse(input, statement::parse_time_derivative)
}

/// Parses an alias definition of the form `A := expr`.
///
/// # Errors
///
/// Returns an error if the input is not a valid alias definition.
pub fn parse_alias(input: &str) -> Result<Equation, ParseError> {
    parse(input, statement::parse_alias)
}

/// Parses a state assignment of the form `X = expr`.
///
/// # Errors
///
/// Returns an error if the input is not a valid assignment.
pub fn parse_assignment(input: &str) -> Result<Equation, ParseError> {
    parse(input, statement::parse_assignment)
}

/// Internal parsing function that handles the common parsing logic.
fn parse<T>(
    input: &str,
    parser: impl Fn(InputSpan<'_>) -> InternalResult<'_, T>,
) -> Result<T, ParseError> {
    let input = InputSpan::new(input);

    match parser(input) {
        Ok((_rest, value)) => Ok(value),
        Err(nom::Err::Incomplete(_needed)) => unreachable!(
            "This should never happen because we use `complete` combinators rather than `stream` combinators"
        ),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(e),
    }
}

impl std::str::FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_expression(s)
    }
}
