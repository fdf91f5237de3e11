/// Extra information attached to an error message.
///
/// Context lets an error explain where a problem comes from or how to fix
/// it without cramming everything into the primary message.
///
/// # Examples
///
/// ```rust
/// use nineml_shared::error::Context;
///
/// let note = Context::Note("alias `A1` is defined in terms of `A2`".to_string());
/// let help = Context::Help("declare `P3` as a parameter".to_string());
///
/// let contexts = vec![note, help];
/// assert_eq!(contexts.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Additional information about the error, such as the node or scope
    /// that was being processed when it was detected.
    Note(String),

    /// A suggestion for resolving the error.
    Help(String),
}
