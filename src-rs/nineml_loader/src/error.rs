//! Errors raised while loading a serialized component class.

use std::fmt;

use nineml_ir::IrError;
use nineml_shared::error::{AsNinemlError, Context, ErrorLocation};

/// An error while turning a [`SerialNode`](crate::SerialNode) tree into a
/// component class.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The document does not start with the expected element.
    UnexpectedRoot {
        /// The tag the loader expected
        expected: &'static str,
        /// The tag that was found
        found: String,
    },
    /// An element lacks a required attribute.
    MissingAttribute {
        /// The element
        tag: String,
        /// The attribute
        attribute: &'static str,
    },
    /// An element lacks a required child element.
    MissingChild {
        /// The element
        tag: String,
        /// The expected child
        child: &'static str,
    },
    /// An element has a child the loader does not know how to handle.
    UnexpectedElement {
        /// The enclosing element
        parent: String,
        /// The unexpected child
        tag: String,
        /// The children accepted in this position
        expected: Vec<&'static str>,
    },
    /// A dimension name is not known to the registry.
    UnknownDimension {
        /// The element naming the dimension
        tag: String,
        /// The dimension name
        name: String,
    },
    /// A numeric value could not be read.
    InvalidNumber {
        /// The element carrying the value
        tag: String,
        /// The text that failed to parse
        value: String,
    },
    /// The loaded parts do not form a valid component class.
    Ir(IrError),
}

impl LoadError {
    pub(crate) fn missing_attribute(tag: &str, attribute: &'static str) -> Self {
        Self::MissingAttribute {
            tag: tag.to_string(),
            attribute,
        }
    }

    pub(crate) fn missing_child(tag: &str, child: &'static str) -> Self {
        Self::MissingChild {
            tag: tag.to_string(),
            child,
        }
    }

    pub(crate) fn unexpected_element(parent: &str, tag: &str, expected: Vec<&'static str>) -> Self {
        Self::UnexpectedElement {
            parent: parent.to_string(),
            tag: tag.to_string(),
            expected,
        }
    }

    pub(crate) fn unknown_dimension(tag: &str, name: &str) -> Self {
        Self::UnknownDimension {
            tag: tag.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_number(tag: &str, value: &str) -> Self {
        Self::InvalidNumber {
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<IrError> for LoadError {
    fn from(error: IrError) -> Self {
        Self::Ir(error)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedRoot { expected, found } => {
                write!(f, "expected a `{expected}` element, found `{found}`")
            }
            Self::MissingAttribute { tag, attribute } => {
                write!(f, "`{tag}` element is missing the `{attribute}` attribute")
            }
            Self::MissingChild { tag, child } => {
                write!(f, "`{tag}` element is missing a `{child}` element")
            }
            Self::UnexpectedElement { parent, tag, .. } => {
                write!(f, "unexpected `{tag}` element in `{parent}`")
            }
            Self::UnknownDimension { tag, name } => {
                write!(f, "unknown dimension `{name}` in `{tag}` element")
            }
            Self::InvalidNumber { tag, value } => {
                write!(f, "`{value}` in `{tag}` element is not a number")
            }
            Self::Ir(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ir(error) => Some(error),
            _ => None,
        }
    }
}

impl AsNinemlError for LoadError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::UnexpectedElement { expected, .. } if !expected.is_empty() => {
                vec![Context::Help(format!("expected one of: {}", expected.join(", ")))]
            }
            Self::Ir(error) => error.context(),
            _ => vec![],
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        match self {
            Self::Ir(error) => error.error_location(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use nineml_ir::NodeKind;

    use super::*;

    #[test]
    fn unexpected_element_lists_alternatives() {
        let error = LoadError::unexpected_element("Regime", "Alias", vec!["TimeDerivative", "OnEvent"]);
        assert_eq!(error.message(), "unexpected `Alias` element in `Regime`");
        assert_eq!(
            error.context(),
            [Context::Help("expected one of: TimeDerivative, OnEvent".to_string())]
        );
    }

    #[test]
    fn ir_errors_keep_their_message() {
        let ir = IrError::missing_handler(NodeKind::Regime);
        let error = LoadError::from(ir.clone());
        assert_eq!(error.message(), ir.to_string());
    }
}
