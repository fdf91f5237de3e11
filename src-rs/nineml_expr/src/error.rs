//! Error handling for the expression parser.

use std::fmt;

use nineml_shared::error::{AsNinemlError, Context, ErrorLocation};
use nom::error::ErrorKind;

use crate::util::InputSpan;

/// An error that occurred while parsing an expression or statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    offset: usize,
    reason: ParseErrorReason,
}

/// The reason a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorReason {
    /// A low-level combinator failed without a more specific reason
    Unexpected,
    /// Expected an expression
    ExpectExpr,
    /// Expected an identifier
    ExpectIdentifier,
    /// Expected a specific symbol
    ExpectSymbol(&'static str),
    /// A binary or unary operator is missing an operand
    MissingOperand(&'static str),
    /// A parenthesis opened at the given offset is never closed
    UnclosedParen {
        /// Offset of the opening parenthesis
        open_offset: usize,
    },
    /// A numeric literal could not be represented
    InvalidNumber,
    /// The statement is not of the form `dX/dt = expr`
    ExpectTimeDerivative,
    /// Input remains after a complete expression
    TrailingInput,
}

impl ParseError {
    /// Creates a new parse error at the given byte offset.
    #[must_use]
    pub const fn new(offset: usize, reason: ParseErrorReason) -> Self {
        Self { offset, reason }
    }

    /// Returns the byte offset in the input where the error was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the reason for the error.
    #[must_use]
    pub const fn reason(&self) -> ParseErrorReason {
        self.reason
    }

    /// Returns the same error with a different reason.
    ///
    /// Errors that already carry a specific reason keep it, so that the most
    /// precise diagnosis survives as errors bubble up through the grammar.
    #[must_use]
    pub const fn with_reason(self, reason: ParseErrorReason) -> Self {
        match self.reason {
            ParseErrorReason::Unexpected
            | ParseErrorReason::ExpectExpr
            | ParseErrorReason::ExpectIdentifier
            | ParseErrorReason::ExpectSymbol(_) => Self { reason, ..self },
            ParseErrorReason::MissingOperand(_)
            | ParseErrorReason::UnclosedParen { .. }
            | ParseErrorReason::InvalidNumber
            | ParseErrorReason::ExpectTimeDerivative
            | ParseErrorReason::TrailingInput => self,
        }
    }
}

impl<'a> nom::error::ParseError<InputSpan<'a>> for ParseError {
    fn from_error_kind(input: InputSpan<'a>, _kind: ErrorKind) -> Self {
        Self::new(input.location_offset(), ParseErrorReason::Unexpected)
    }

    fn append(_input: InputSpan<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ParseErrorReason::Unexpected => write!(f, "unexpected character"),
            ParseErrorReason::ExpectExpr => write!(f, "expected an expression"),
            ParseErrorReason::ExpectIdentifier => write!(f, "expected an identifier"),
            ParseErrorReason::ExpectSymbol(symbol) => write!(f, "expected `{symbol}`"),
            ParseErrorReason::MissingOperand(op) => {
                write!(f, "expected an operand after `{op}`")
            }
            ParseErrorReason::UnclosedParen { .. } => write!(f, "unclosed parenthesis"),
            ParseErrorReason::InvalidNumber => write!(f, "invalid number literal"),
            ParseErrorReason::ExpectTimeDerivative => {
                write!(f, "expected a time derivative of the form `dX/dt = ...`")
            }
            ParseErrorReason::TrailingInput => write!(f, "unexpected input after expression"),
        }
    }
}

impl std::error::Error for ParseError {}

impl AsNinemlError for ParseError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self.reason {
            ParseErrorReason::UnclosedParen { open_offset } => vec![Context::Note(format!(
                "the parenthesis at offset {open_offset} is never closed"
            ))],
            ParseErrorReason::TrailingInput => vec![Context::Help(
                "operators must separate operands; implicit multiplication is not supported"
                    .to_string(),
            )],
            _ => vec![],
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        Some(ErrorLocation::from_source_and_offset(source, self.offset))
    }
}
