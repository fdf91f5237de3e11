use crate::error::{Context, ErrorLocation};

/// Trait for types that can be converted to NineML error reports.
///
/// Every error kind produced by the NineML crates implements this trait so
/// that a front end can present them uniformly through
/// [`NinemlError`](crate::error::NinemlError).
pub trait AsNinemlError {
    /// Returns the primary error message.
    ///
    /// This should be a concise, user-friendly description of what went
    /// wrong.
    fn message(&self) -> String;

    /// Returns additional context information about the error.
    ///
    /// Returns an empty vector if no context is available.
    fn context(&self) -> Vec<Context> {
        vec![]
    }

    /// Returns the location of the error in the given source text, if the
    /// error refers to a position in it.
    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        let _ = source;
        None
    }
}
