//! Expression parsing.
//!
//! Precedence, from loosest to tightest:
//!
//! | Operators                        | Associativity |
//! |----------------------------------|---------------|
//! | `\|\|`                           | left          |
//! | `&&`                             | left          |
//! | `!`                              | prefix        |
//! | `<` `<=` `>` `>=` `==` `!=`      | none          |
//! | `+` `-`                          | left          |
//! | `*` `/`                          | left          |
//! | unary `-` `+`                    | prefix        |
//! | `^` `**`                         | right         |

use nom::{
    Parser as _,
    branch::alt,
    combinator::{cut, map, opt, value},
    multi::{many0, separated_list0},
};

use crate::{
    error::{ParseError, ParseErrorReason},
    expr::{BinaryOp, Expr, Literal, UnaryOp},
    token::{identifier, number, symbol, whitespace},
    util::{InputSpan, Parser, Result, expect_end, with_reason},
};

fn left_associative_binary_op<'a>(
    mut operand: impl Parser<'a, Expr> + Copy,
    mut operator: impl Parser<'a, BinaryOp>,
) -> impl Parser<'a, Expr> {
    move |input| {
        let (rest, first_operand) = operand.parse(input)?;
        let (rest, rest_operands) = many0(|input| {
            let (rest, op) = operator.parse(input)?;
            let (rest, operand) =
                with_reason(cut(operand), ParseErrorReason::MissingOperand(op.symbol()))
                    .parse(rest)?;
            Ok((rest, (op, operand)))
        })
        .parse(rest)?;

        let expr = rest_operands
            .into_iter()
            .fold(first_operand, |acc, (op, expr)| Expr::binary_op(op, acc, expr));

        Ok((rest, expr))
    }
}

/// Parses an expression that spans the complete input, allowing leading
/// and trailing whitespace.
pub fn parse_complete(input: InputSpan<'_>) -> Result<'_, Expr> {
    let (rest, _) = whitespace(input)?;
    let (rest, expr) = expr(rest)?;
    let (rest, ()) = expect_end(rest)?;
    Ok((rest, expr))
}

/// Parses an expression. This function may not consume the complete input.
pub fn expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    with_reason(or_expr, ParseErrorReason::ExpectExpr).parse(input)
}

fn or_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    left_associative_binary_op(and_expr, value(BinaryOp::Or, symbol("||"))).parse(input)
}

fn and_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    left_associative_binary_op(not_expr, value(BinaryOp::And, symbol("&&"))).parse(input)
}

fn not_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    alt((
        |input| {
            let (rest, _) = symbol("!").parse(input)?;
            let (rest, expr) = with_reason(
                cut(not_expr),
                ParseErrorReason::MissingOperand(UnaryOp::Not.symbol()),
            )
            .parse(rest)?;
            Ok((rest, Expr::unary_op(UnaryOp::Not, expr)))
        },
        comparison_expr,
    ))
    .parse(input)
}

fn comparison_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    let mut op = alt((
        value(BinaryOp::LessThanEq, symbol("<=")),
        value(BinaryOp::GreaterThanEq, symbol(">=")),
        value(BinaryOp::LessThan, symbol("<")),
        value(BinaryOp::GreaterThan, symbol(">")),
        value(BinaryOp::Eq, symbol("==")),
        value(BinaryOp::NotEq, symbol("!=")),
    ));

    let (rest, first_operand) = additive_expr(input)?;
    let (rest, second_operand) = opt(|input| {
        let (rest, operator) = op.parse(input)?;
        let (rest, operand) = with_reason(
            cut(additive_expr),
            ParseErrorReason::MissingOperand(operator.symbol()),
        )
        .parse(rest)?;
        Ok((rest, (operator, operand)))
    })
    .parse(rest)?;

    let expr = match second_operand {
        Some((op, second_operand)) => Expr::binary_op(op, first_operand, second_operand),
        None => first_operand,
    };

    Ok((rest, expr))
}

fn additive_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    let op = alt((
        value(BinaryOp::Add, symbol("+")),
        value(BinaryOp::Sub, symbol("-")),
    ));
    left_associative_binary_op(multiplicative_expr, op).parse(input)
}

fn multiplicative_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    let op = alt((
        value(BinaryOp::Mul, symbol("*")),
        value(BinaryOp::Div, symbol("/")),
    ));
    left_associative_binary_op(unary_expr, op).parse(input)
}

fn unary_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    alt((
        |input| {
            let (rest, _) = symbol("-").parse(input)?;
            let (rest, expr) = with_reason(
                cut(unary_expr),
                ParseErrorReason::MissingOperand(UnaryOp::Neg.symbol()),
            )
            .parse(rest)?;
            Ok((rest, Expr::unary_op(UnaryOp::Neg, expr)))
        },
        // unary plus has no effect on the value
        |input| {
            let (rest, _) = symbol("+").parse(input)?;
            with_reason(cut(unary_expr), ParseErrorReason::MissingOperand("+")).parse(rest)
        },
        power_expr,
    ))
    .parse(input)
}

fn power_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    let (rest, base) = primary_expr(input)?;
    let (rest, exponent) = opt(|input| {
        let (rest, _) = alt((symbol("^"), symbol("**"))).parse(input)?;
        with_reason(
            cut(unary_expr),
            ParseErrorReason::MissingOperand(BinaryOp::Pow.symbol()),
        )
        .parse(rest)
    })
    .parse(rest)?;

    let expr = match exponent {
        Some(exponent) => Expr::binary_op(BinaryOp::Pow, base, exponent),
        None => base,
    };

    Ok((rest, expr))
}

fn primary_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    alt((
        map(number, |value| Expr::Literal(Literal::Number(value))),
        parenthesized_expr,
        call_or_variable,
    ))
    .parse(input)
}

/// Parses `)` after a construct opened at `open_offset`, failing with an
/// unclosed parenthesis error if it is absent.
fn close_paren(input: InputSpan<'_>, open_offset: usize) -> Result<'_, ()> {
    let (rest, _) = symbol(")").parse(input).map_err(|_| {
        nom::Err::Failure(ParseError::new(
            input.location_offset(),
            ParseErrorReason::UnclosedParen { open_offset },
        ))
    })?;
    Ok((rest, ()))
}

fn parenthesized_expr(input: InputSpan<'_>) -> Result<'_, Expr> {
    let (rest, open) = symbol("(").parse(input)?;
    let (rest, expr) = cut(expr).parse(rest)?;
    let (rest, ()) = close_paren(rest, open.location_offset())?;
    Ok((rest, expr))
}

fn call_or_variable(input: InputSpan<'_>) -> Result<'_, Expr> {
    let (rest, name) = identifier(input)?;

    match *name.fragment() {
        "true" => return Ok((rest, Expr::boolean(true))),
        "false" => return Ok((rest, Expr::boolean(false))),
        _ => {}
    }

    let (rest, open) = opt(symbol("(")).parse(rest)?;
    let Some(open) = open else {
        return Ok((rest, Expr::variable(*name.fragment())));
    };

    let (rest, args) = separated_list0(symbol(","), expr).parse(rest)?;
    let (rest, ()) = close_paren(rest, open.location_offset())?;

    Ok((rest, Expr::function_call(*name.fragment(), args)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expr {
        let (_, expr) = parse_complete(InputSpan::new(input)).expect("input should parse");
        expr
    }

    fn parse_err(input: &str) -> ParseError {
        match parse_complete(InputSpan::new(input)) {
            Err(nom::Err::Error(error) | nom::Err::Failure(error)) => error,
            result => panic!("expected an error, got {result:?}"),
        }
    }

    fn var(name: &str) -> Expr {
        Expr::variable(name)
    }

    fn num(value: f64) -> Expr {
        Expr::Literal(Literal::Number(value))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse("a + b * c"),
            Expr::binary_op(
                BinaryOp::Add,
                var("a"),
                Expr::binary_op(BinaryOp::Mul, var("b"), var("c"))
            )
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            parse("a - b - c"),
            Expr::binary_op(
                BinaryOp::Sub,
                Expr::binary_op(BinaryOp::Sub, var("a"), var("b")),
                var("c")
            )
        );
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_negation() {
        assert_eq!(
            parse("-a ^ b ** c"),
            Expr::unary_op(
                UnaryOp::Neg,
                Expr::binary_op(
                    BinaryOp::Pow,
                    var("a"),
                    Expr::binary_op(BinaryOp::Pow, var("b"), var("c"))
                )
            )
        );
    }

    #[test]
    fn unary_plus_is_dropped() {
        assert_eq!(parse("+x"), var("x"));
    }

    #[test]
    fn logical_operators() {
        assert_eq!(
            parse("a > 1 || !b && c"),
            Expr::binary_op(
                BinaryOp::Or,
                Expr::binary_op(BinaryOp::GreaterThan, var("a"), num(1.0)),
                Expr::binary_op(
                    BinaryOp::And,
                    Expr::unary_op(UnaryOp::Not, var("b")),
                    var("c")
                )
            )
        );
    }

    #[test]
    fn boolean_literals() {
        assert_eq!(parse("true"), Expr::boolean(true));
        assert_eq!(
            parse("false || x"),
            Expr::binary_op(BinaryOp::Or, Expr::boolean(false), var("x"))
        );
    }

    #[test]
    fn function_calls() {
        assert_eq!(
            parse("atan2(y, x * 2)"),
            Expr::function_call(
                "atan2",
                vec![var("y"), Expr::binary_op(BinaryOp::Mul, var("x"), num(2.0))]
            )
        );
        assert_eq!(parse("f()"), Expr::function_call("f", vec![]));
    }

    #[test]
    fn whitespace_and_newlines() {
        assert_eq!(
            parse("  g *\n (E -  V) \n"),
            Expr::binary_op(
                BinaryOp::Mul,
                var("g"),
                Expr::binary_op(BinaryOp::Sub, var("E"), var("V"))
            )
        );
    }

    #[test]
    fn empty_input_expects_expression() {
        let error = parse_err("   ");
        assert_eq!(error.reason(), ParseErrorReason::ExpectExpr);
        assert_eq!(error.offset(), 3);
    }

    #[test]
    fn missing_second_operand() {
        let error = parse_err("a +");
        assert_eq!(error.reason(), ParseErrorReason::MissingOperand("+"));
        assert_eq!(error.offset(), 3);
    }

    #[test]
    fn missing_comparison_operand() {
        let error = parse_err("V >= ");
        assert_eq!(error.reason(), ParseErrorReason::MissingOperand(">="));
    }

    #[test]
    fn unclosed_paren() {
        let error = parse_err("2 * (a + b");
        assert_eq!(
            error.reason(),
            ParseErrorReason::UnclosedParen { open_offset: 4 }
        );
        assert_eq!(error.offset(), 10);
    }

    #[test]
    fn unclosed_call() {
        let error = parse_err("exp(x");
        assert_eq!(
            error.reason(),
            ParseErrorReason::UnclosedParen { open_offset: 3 }
        );
    }

    #[test]
    fn trailing_input() {
        let error = parse_err("2 x");
        assert_eq!(error.reason(), ParseErrorReason::TrailingInput);
        assert_eq!(error.offset(), 2);
    }

    #[test]
    fn comparisons_do_not_chain() {
        let error = parse_err("a < b < c");
        assert_eq!(error.reason(), ParseErrorReason::TrailingInput);
    }

    #[test]
    fn lone_equals_is_rejected() {
        let error = parse_err("a = b");
        assert_eq!(error.reason(), ParseErrorReason::TrailingInput);
    }
}
