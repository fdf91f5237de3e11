//! Errors for the NineML crates

mod context;
mod location;
mod traits;

use std::fmt;

pub use context::Context;
pub use location::ErrorLocation;
pub use traits::AsNinemlError;

/// Unified error representation for NineML
///
/// This struct represents errors in a format suitable for display to users.
/// It includes a human-readable message, an optional subject (the component
/// class or document the error belongs to), optional source location
/// information and any attached context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinemlError {
    /// The component class or document the error belongs to
    subject: Option<String>,
    /// Human-readable error message
    message: String,
    /// Optional source location information
    location: Option<ErrorLocation>,
    /// Optional context information
    context: Vec<Context>,
}

impl NinemlError {
    /// Creates a new `NinemlError` from an error that implements `AsNinemlError`
    ///
    /// The report carries no source location. Use `from_error_with_source`
    /// when the text the error refers to is available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nineml_shared::error::{AsNinemlError, NinemlError};
    ///
    /// struct SimpleError(String);
    ///
    /// impl AsNinemlError for SimpleError {
    ///     fn message(&self) -> String {
    ///         self.0.clone()
    ///     }
    /// }
    ///
    /// let error = SimpleError("something went wrong".to_string());
    /// let report = NinemlError::from_error(&error);
    /// assert_eq!(report.message(), "something went wrong");
    /// ```
    pub fn from_error(error: &impl AsNinemlError) -> Self {
        Self {
            subject: None,
            message: error.message(),
            location: None,
            context: error.context(),
        }
    }

    /// Creates a new `NinemlError` with location information computed from
    /// the source text the error refers to.
    pub fn from_error_with_source(error: &impl AsNinemlError, source: &str) -> Self {
        Self {
            location: error.error_location(source),
            ..Self::from_error(error)
        }
    }

    /// Attaches the name of the component class or document the error
    /// belongs to.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Returns the component class or document the error belongs to
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the human-readable error message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the optional source location information
    #[must_use]
    pub const fn location(&self) -> Option<&ErrorLocation> {
        self.location.as_ref()
    }

    /// Returns the context information
    #[must_use]
    pub fn context(&self) -> &[Context] {
        &self.context
    }
}

impl fmt::Display for NinemlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error")?;
        if let Some(subject) = &self.subject {
            write!(f, " in `{subject}`")?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(location) = &self.location {
            let line = location.line();
            let column = location.column();
            let underline = format!(
                "{}{}",
                " ".repeat(column - 1),
                "^".repeat(location.length())
            );
            write!(
                f,
                "\n --> {line}:{column}\n  | {}\n  | {underline}",
                location.line_source()
            )?;
        }

        for context in &self.context {
            match context {
                Context::Note(note) => write!(f, "\n  = note: {note}")?,
                Context::Help(help) => write!(f, "\n  = help: {help}")?,
            }
        }

        Ok(())
    }
}
