//! Lexical tokens for expressions and statements.
//!
//! Every token parser consumes the whitespace that follows its lexeme, so
//! callers only need to skip whitespace once at the very start of the input.

use nom::{
    Parser as _,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{opt, recognize},
};

use crate::{
    error::{ParseError, ParseErrorReason},
    util::{InputSpan, Parser, Result},
};

/// Consumes any amount of whitespace, including line breaks.
pub fn whitespace(input: InputSpan<'_>) -> Result<'_, InputSpan<'_>> {
    multispace0::<_, ParseError>(input)
}

/// Wraps a parser so that it recognizes its lexeme, then skips trailing
/// whitespace.
fn token<'a, O>(
    mut f: impl Parser<'a, O>,
    reason: ParseErrorReason,
) -> impl Parser<'a, InputSpan<'a>> {
    move |input| {
        let f = |input: InputSpan<'a>| f.parse(input);
        let (rest, lexeme) = recognize(f)
            .parse(input)
            .map_err(|err| err.map(|error: ParseError| error.with_reason(reason)))?;
        let (rest, _) = whitespace(rest)?;
        Ok((rest, lexeme))
    }
}

/// Returns true if `rest` begins with a character that would extend
/// `text` into a longer operator.
fn extends_operator(text: &str, rest: InputSpan<'_>) -> bool {
    let next = rest.fragment().chars().next();
    matches!(
        (text, next),
        ("*", Some('*')) | ("=" | "<" | ">" | "!", Some('='))
    )
}

/// Parses the given operator or punctuation symbol.
pub fn symbol<'a>(text: &'static str) -> impl Parser<'a, InputSpan<'a>> {
    token(
        move |input: InputSpan<'a>| {
            let (rest, matched) = tag::<_, _, ParseError>(text).parse(input)?;
            if extends_operator(text, rest) {
                return Err(nom::Err::Error(ParseError::new(
                    input.location_offset(),
                    ParseErrorReason::Unexpected,
                )));
            }
            Ok((rest, matched))
        },
        ParseErrorReason::ExpectSymbol(text),
    )
}

/// Parses an identifier: a letter or underscore followed by letters,
/// digits or underscores.
pub fn identifier(input: InputSpan<'_>) -> Result<'_, InputSpan<'_>> {
    token(
        (
            satisfy::<_, _, ParseError>(|c| c.is_ascii_alphabetic() || c == '_'),
            take_while::<_, _, ParseError>(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        ),
        ParseErrorReason::ExpectIdentifier,
    )
    .parse(input)
}

/// Parses a decimal number literal with an optional exponent.
pub fn number(input: InputSpan<'_>) -> Result<'_, f64> {
    let mantissa = alt((
        recognize((digit1::<_, ParseError>, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));

    let (rest, lexeme) = token((mantissa, exponent), ParseErrorReason::ExpectExpr).parse(input)?;

    match lexeme.fragment().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((rest, value)),
        _ => Err(nom::Err::Failure(ParseError::new(
            lexeme.location_offset(),
            ParseErrorReason::InvalidNumber,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use nom::Parser as _;

    use super::*;

    #[test]
    fn identifier_skips_trailing_whitespace() {
        let input = InputSpan::new("g_Na1  + x");
        let (rest, ident) = identifier(input).expect("should parse identifier");
        assert_eq!(ident.fragment(), &"g_Na1");
        assert_eq!(rest.fragment(), &"+ x");
    }

    #[test]
    fn identifier_rejects_leading_digit() {
        let input = InputSpan::new("1abc");
        let result = identifier(input);
        match result {
            Err(nom::Err::Error(error)) => {
                assert_eq!(error.reason(), ParseErrorReason::ExpectIdentifier);
                assert_eq!(error.offset(), 0);
            }
            _ => panic!("expected identifier error, got {result:?}"),
        }
    }

    #[test]
    fn number_forms() {
        for (text, expected) in [
            ("42", 42.0),
            ("3.5", 3.5),
            ("1.", 1.0),
            (".25", 0.25),
            ("1e3", 1000.0),
            ("2.5E-2", 0.025),
        ] {
            let (rest, value) = number(InputSpan::new(text)).expect("should parse number");
            assert_eq!(rest.fragment(), &"");
            assert!((value - expected).abs() < 1e-12, "{text} parsed as {value}");
        }
    }

    #[test]
    fn number_exponent_without_digits_is_left_behind() {
        let (rest, value) = number(InputSpan::new("2e")).expect("should parse mantissa");
        assert!((value - 2.0).abs() < f64::EPSILON);
        assert_eq!(rest.fragment(), &"e");
    }

    #[test]
    fn number_overflow_is_invalid() {
        let result = number(InputSpan::new("1e999"));
        match result {
            Err(nom::Err::Failure(error)) => {
                assert_eq!(error.reason(), ParseErrorReason::InvalidNumber);
            }
            _ => panic!("expected invalid number, got {result:?}"),
        }
    }

    #[test]
    fn star_does_not_match_double_star() {
        assert!(symbol("*").parse(InputSpan::new("** 2")).is_err());
        let (rest, _) = symbol("**")
            .parse(InputSpan::new("** 2"))
            .expect("should parse power");
        assert_eq!(rest.fragment(), &"2");
    }

    #[test]
    fn less_than_does_not_match_less_equal() {
        assert!(symbol("<").parse(InputSpan::new("<= 1")).is_err());
        assert!(symbol("<=").parse(InputSpan::new("<= 1")).is_ok());
    }

    #[test]
    fn symbol_error_names_the_symbol() {
        let result = symbol(")").parse(InputSpan::new("x"));
        match result {
            Err(nom::Err::Error(error)) => {
                assert_eq!(error.reason(), ParseErrorReason::ExpectSymbol(")"));
            }
            _ => panic!("expected symbol error, got {result:?}"),
        }
    }
}
