//! Parsing of the single-line statements that make up a dynamics
//! definition: time derivatives, aliases and state assignments.

use nom::Parser as _;

use crate::{
    error::{ParseError, ParseErrorReason},
    expr::Expr,
    expression::expr,
    token::{identifier, symbol, whitespace},
    util::{InputSpan, Result, expect_end, with_reason},
};

/// A statement binding a left-hand-side name to an expression.
///
/// For a time derivative `dV/dt = rhs`, the left-hand side is the state
/// variable `V`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    lhs: String,
    rhs: Expr,
}

impl Equation {
    /// Creates a new equation.
    #[must_use]
    pub fn new(lhs: impl Into<String>, rhs: Expr) -> Self {
        Self {
            lhs: lhs.into(),
            rhs,
        }
    }

    /// Returns the name on the left-hand side.
    #[must_use]
    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    /// Returns the right-hand-side expression.
    #[must_use]
    pub const fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// Splits the equation into its left- and right-hand sides.
    #[must_use]
    pub fn into_parts(self) -> (String, Expr) {
        (self.lhs, self.rhs)
    }
}

fn time_derivative_error(input: InputSpan<'_>) -> nom::Err<ParseError> {
    nom::Err::Failure(ParseError::new(
        input.location_offset(),
        ParseErrorReason::ExpectTimeDerivative,
    ))
}

/// Parses `dX/dt = expr`.
pub fn parse_time_derivative(input: InputSpan<'_>) -> Result<'_, Equation> {
    let (rest, _) = whitespace(input)?;

    let (after_numerator, numerator) =
        identifier(rest).map_err(|_| time_derivative_error(rest))?;
    let Some(variable) = numerator
        .fragment()
        .strip_prefix('d')
        .filter(|variable| !variable.is_empty())
    else {
        return Err(time_derivative_error(rest));
    };

    let (rest, _) = symbol("/")
        .parse(after_numerator)
        .map_err(|_| time_derivative_error(after_numerator))?;

    let (after_denominator, denominator) =
        identifier(rest).map_err(|_| time_derivative_error(rest))?;
    if *denominator.fragment() != "dt" {
        return Err(time_derivative_error(rest));
    }

    let (rest, _) = symbol("=")
        .parse(after_denominator)
        .map_err(|_| time_derivative_error(after_denominator))?;

    let (rest, rhs) = expr(rest)?;
    let (rest, ()) = expect_end(rest)?;

    Ok((rest, Equation::new(variable, rhs)))
}

/// Parses `A := expr`.
pub fn parse_alias(input: InputSpan<'_>) -> Result<'_, Equation> {
    parse_binding(input, ":=")
}

/// Parses `X = expr`.
pub fn parse_assignment(input: InputSpan<'_>) -> Result<'_, Equation> {
    parse_binding(input, "=")
}

fn parse_binding<'a>(input: InputSpan<'a>, operator: &'static str) -> Result<'a, Equation> {
    let (rest, _) = whitespace(input)?;
    let (rest, lhs) = identifier(rest)?;
    let (rest, _) = with_reason(symbol(operator), ParseErrorReason::ExpectSymbol(operator))
        .parse(rest)?;
    let (rest, rhs) = expr(rest)?;
    let (rest, ()) = expect_end(rest)?;

    Ok((rest, Equation::new(*lhs.fragment(), rhs)))
}
