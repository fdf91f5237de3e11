use nom::{IResult, Parser as NomParser};
use nom_locate::LocatedSpan;

use crate::error::{ParseError, ParseErrorReason};

/// A span of text in the input string, carrying its offset from the start
/// of the input.
pub type InputSpan<'a> = LocatedSpan<&'a str>;

/// A result type for parser operations.
pub type Result<'a, O> = IResult<InputSpan<'a>, O, ParseError>;

/// A trait for parser implementations that work with our custom span type.
///
/// This is automatically implemented for any type that implements nom's
/// `Parser` trait over `InputSpan` with `ParseError` as the error type.
pub trait Parser<'a, O>: NomParser<InputSpan<'a>, Output = O, Error = ParseError> {}

impl<'a, O, P> Parser<'a, O> for P where
    P: NomParser<InputSpan<'a>, Output = O, Error = ParseError>
{
}

/// Replaces the reason of any error produced by `parser`, keeping its offset.
pub fn with_reason<'a, O>(
    mut parser: impl Parser<'a, O>,
    reason: ParseErrorReason,
) -> impl Parser<'a, O> {
    move |input: InputSpan<'a>| {
        parser
            .parse(input)
            .map_err(|err| err.map(|error| error.with_reason(reason)))
    }
}

/// Fails with `TrailingInput` unless `rest` is empty.
pub fn expect_end(rest: InputSpan<'_>) -> Result<'_, ()> {
    if rest.fragment().is_empty() {
        Ok((rest, ()))
    } else {
        Err(nom::Err::Failure(ParseError::new(
            rest.location_offset(),
            ParseErrorReason::TrailingInput,
        )))
    }
}
