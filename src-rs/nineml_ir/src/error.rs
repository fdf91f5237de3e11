//! Errors raised while constructing, validating or rewriting a component
//! class.

use std::fmt;

use nineml_expr::ParseError;
use nineml_shared::error::{AsNinemlError, Context, ErrorLocation};

use crate::{connection::PortAddress, identifier::Identifier, port::PortKind, visit::NodeKind};

/// An error in the component-class object model.
#[derive(Debug, Clone, PartialEq)]
pub enum IrError {
    /// A name is not a valid identifier.
    InvalidIdentifier {
        /// The kind of entity carrying the name
        kind: NodeKind,
        /// The offending name
        name: String,
    },
    /// Two entities share a name within one uniqueness scope.
    NameCollision {
        /// The kind of the entity that collided with an earlier one
        kind: NodeKind,
        /// The shared name
        name: Identifier,
    },
    /// The declared interface disagrees with the inferred one.
    InterfaceMismatch(InterfaceMismatch),
    /// A name could not be resolved.
    UnresolvedReference(UnresolvedReference),
    /// An analog reduce port uses an unsupported reduction operator.
    UnsupportedOperator {
        /// The port
        port: Identifier,
        /// The operator as written
        operator: String,
    },
    /// The operation requires a class without sub-nodes.
    StructuralPrecondition {
        /// The operation that was attempted
        operation: &'static str,
        /// The hierarchical class
        class: Identifier,
    },
    /// A statement or expression could not be parsed.
    Parse {
        /// The text that failed to parse
        text: String,
        /// The parse error
        error: ParseError,
    },
    /// Aliases refer to each other in a cycle.
    CircularDependency {
        /// The names along the cycle, starting and ending with the same name
        cycle: Vec<Identifier>,
    },
    /// A port connection joins incompatible ports.
    PortConnectionMismatch {
        /// The sending end
        sender: PortAddress,
        /// The receiving end
        receiver: PortAddress,
        /// What is wrong with the connection
        reason: ConnectionMismatch,
    },
    /// A trigger expression does not produce a boolean.
    NonBooleanTrigger {
        /// The regime containing the transition
        regime: Identifier,
        /// The trigger as text
        trigger: String,
    },
    /// A name refers to an entity of the wrong kind.
    InvalidReference {
        /// The kind of entity making the reference
        kind: NodeKind,
        /// The referenced name
        name: Identifier,
        /// What the name was expected to refer to
        expected: &'static str,
    },
    /// A port was closed with a value that is not a finite number.
    NonFiniteValue {
        /// The port being closed
        port: Identifier,
        /// The rejected value
        value: f64,
    },
    /// A strict visitor reached a node kind it has no handler for.
    MissingHandler {
        /// The unhandled node kind
        kind: NodeKind,
    },
}

/// The declared and inferred interfaces of a class disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMismatch {
    class: Identifier,
    differences: Vec<InterfaceDifference>,
}

/// A difference in one interface category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDifference {
    category: InterfaceCategory,
    declared_only: Vec<Identifier>,
    inferred_only: Vec<Identifier>,
}

/// The interface categories that are compared after inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceCategory {
    /// Parameters
    Parameters,
    /// State variables
    StateVariables,
    /// Event send ports
    EventSendPorts,
    /// Event receive ports
    EventReceivePorts,
}

/// A name that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    kind: ReferenceKind,
    name: String,
    context: String,
}

/// What kind of thing an unresolved name should have referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// The target regime of a transition
    Regime,
    /// A sub-node namespace in a port address
    SubNode,
    /// A port
    Port,
    /// A symbol used in an expression
    Symbol,
}

/// The way a port connection is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMismatch {
    /// The sending end is not a send port, the receiving end is not a
    /// receive or reduce port, or they are of different kinds
    Kind {
        /// The kind of the sending end
        sender: PortKind,
        /// The kind of the receiving end
        receiver: PortKind,
    },
    /// The analog ports carry different dimensions
    Dimension {
        /// The dimension of the sending end
        sender: String,
        /// The dimension of the receiving end
        receiver: String,
    },
    /// The receive port already has a connection
    AlreadyConnected,
    /// An address does not name a port inside a sub-node
    NotInSubNode,
}

impl IrError {
    /// Creates an invalid identifier error.
    pub fn invalid_identifier(kind: NodeKind, name: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            name: name.into(),
        }
    }

    /// Creates a name collision error.
    #[must_use]
    pub const fn name_collision(kind: NodeKind, name: Identifier) -> Self {
        Self::NameCollision { kind, name }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved(
        kind: ReferenceKind,
        name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::UnresolvedReference(UnresolvedReference {
            kind,
            name: name.into(),
            context: context.into(),
        })
    }

    /// Creates an unsupported operator error.
    pub fn unsupported_operator(port: Identifier, operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            port,
            operator: operator.into(),
        }
    }

    /// Creates an error for an operation that requires a flat class.
    #[must_use]
    pub const fn structural_precondition(operation: &'static str, class: Identifier) -> Self {
        Self::StructuralPrecondition { operation, class }
    }

    /// Creates a parse error for the given text.
    pub fn parse(text: impl Into<String>, error: ParseError) -> Self {
        Self::Parse {
            text: text.into(),
            error,
        }
    }

    /// Creates a circular dependency error.
    #[must_use]
    pub const fn circular_dependency(cycle: Vec<Identifier>) -> Self {
        Self::CircularDependency { cycle }
    }

    /// Creates a port connection mismatch error.
    #[must_use]
    pub const fn port_connection_mismatch(
        sender: PortAddress,
        receiver: PortAddress,
        reason: ConnectionMismatch,
    ) -> Self {
        Self::PortConnectionMismatch {
            sender,
            receiver,
            reason,
        }
    }

    /// Creates a non-boolean trigger error.
    pub fn non_boolean_trigger(regime: Identifier, trigger: impl Into<String>) -> Self {
        Self::NonBooleanTrigger {
            regime,
            trigger: trigger.into(),
        }
    }

    /// Creates an invalid reference error.
    #[must_use]
    pub const fn invalid_reference(
        kind: NodeKind,
        name: Identifier,
        expected: &'static str,
    ) -> Self {
        Self::InvalidReference {
            kind,
            name,
            expected,
        }
    }

    /// Creates a non-finite value error.
    #[must_use]
    pub const fn non_finite_value(port: Identifier, value: f64) -> Self {
        Self::NonFiniteValue { port, value }
    }

    /// Creates a missing handler error.
    #[must_use]
    pub const fn missing_handler(kind: NodeKind) -> Self {
        Self::MissingHandler { kind }
    }
}

impl InterfaceMismatch {
    /// Creates a new interface mismatch report.
    #[must_use]
    pub const fn new(class: Identifier, differences: Vec<InterfaceDifference>) -> Self {
        Self { class, differences }
    }

    /// Returns the class whose interface is inconsistent.
    #[must_use]
    pub const fn class(&self) -> &Identifier {
        &self.class
    }

    /// Returns the categories that differ.
    #[must_use]
    pub fn differences(&self) -> &[InterfaceDifference] {
        &self.differences
    }

    /// Returns the difference in the given category, if there is one.
    #[must_use]
    pub fn difference(&self, category: InterfaceCategory) -> Option<&InterfaceDifference> {
        self.differences
            .iter()
            .find(|difference| difference.category == category)
    }
}

impl InterfaceDifference {
    /// Creates a new difference for a category.
    #[must_use]
    pub const fn new(
        category: InterfaceCategory,
        declared_only: Vec<Identifier>,
        inferred_only: Vec<Identifier>,
    ) -> Self {
        Self {
            category,
            declared_only,
            inferred_only,
        }
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> InterfaceCategory {
        self.category
    }

    /// Returns names that were declared but not inferred.
    #[must_use]
    pub fn declared_only(&self) -> &[Identifier] {
        &self.declared_only
    }

    /// Returns names that were inferred but not declared.
    #[must_use]
    pub fn inferred_only(&self) -> &[Identifier] {
        &self.inferred_only
    }
}

impl UnresolvedReference {
    /// Returns the kind of thing that was referenced.
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Returns the unresolved name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a description of where the reference occurred.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl From<UnresolvedReference> for IrError {
    fn from(error: UnresolvedReference) -> Self {
        Self::UnresolvedReference(error)
    }
}

impl From<InterfaceMismatch> for IrError {
    fn from(error: InterfaceMismatch) -> Self {
        Self::InterfaceMismatch(error)
    }
}

fn join(names: &[Identifier]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for InterfaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameters => write!(f, "parameters"),
            Self::StateVariables => write!(f, "state variables"),
            Self::EventSendPorts => write!(f, "event send ports"),
            Self::EventReceivePorts => write!(f, "event receive ports"),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regime => write!(f, "regime"),
            Self::SubNode => write!(f, "sub-node"),
            Self::Port => write!(f, "port"),
            Self::Symbol => write!(f, "symbol"),
        }
    }
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier { kind, name } => {
                write!(f, "`{name}` is not a valid name for a {kind}")
            }
            Self::NameCollision { kind, name } => {
                write!(f, "duplicate {kind} name `{name}`")
            }
            Self::InterfaceMismatch(mismatch) => write!(
                f,
                "declared interface of `{}` does not match the interface inferred from its dynamics",
                mismatch.class
            ),
            Self::UnresolvedReference(reference) => write!(
                f,
                "unresolved {} `{}` in {}",
                reference.kind, reference.name, reference.context
            ),
            Self::UnsupportedOperator { port, operator } => write!(
                f,
                "analog reduce port `{port}` uses unsupported operator `{operator}`"
            ),
            Self::StructuralPrecondition { operation, class } => write!(
                f,
                "cannot {operation} `{class}` because it has sub-nodes; flatten it first"
            ),
            Self::Parse { text, error } => write!(f, "cannot parse `{text}`: {error}"),
            Self::CircularDependency { cycle } => {
                let chain = cycle
                    .iter()
                    .map(Identifier::as_str)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                write!(f, "circular dependency between aliases - {chain}")
            }
            Self::PortConnectionMismatch {
                sender,
                receiver,
                reason,
            } => {
                write!(f, "cannot connect `{sender}` to `{receiver}`: ")?;
                match reason {
                    ConnectionMismatch::Kind { sender, receiver } => {
                        write!(f, "{sender} cannot send to {receiver}")
                    }
                    ConnectionMismatch::Dimension { sender, receiver } => {
                        write!(f, "dimension `{sender}` does not match `{receiver}`")
                    }
                    ConnectionMismatch::AlreadyConnected => {
                        write!(f, "the receive port is already connected")
                    }
                    ConnectionMismatch::NotInSubNode => {
                        write!(f, "both ends must name a port inside a sub-node")
                    }
                }
            }
            Self::NonBooleanTrigger { regime, trigger } => write!(
                f,
                "trigger `{trigger}` in regime `{regime}` is not a boolean expression"
            ),
            Self::InvalidReference {
                kind,
                name,
                expected,
            } => write!(f, "{kind} refers to `{name}`, which is not {expected}"),
            Self::NonFiniteValue { port, value } => {
                write!(f, "cannot close port `{port}` with the non-finite value {value}")
            }
            Self::MissingHandler { kind } => {
                write!(f, "visitor has no handler for {kind} nodes")
            }
        }
    }
}

impl std::error::Error for IrError {}

impl AsNinemlError for IrError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::InterfaceMismatch(mismatch) => {
                let mut context = Vec::new();
                for difference in &mismatch.differences {
                    if !difference.declared_only.is_empty() {
                        context.push(Context::Note(format!(
                            "{} declared but not used: {}",
                            difference.category,
                            join(&difference.declared_only)
                        )));
                    }
                    if !difference.inferred_only.is_empty() {
                        context.push(Context::Note(format!(
                            "{} used but not declared: {}",
                            difference.category,
                            join(&difference.inferred_only)
                        )));
                    }
                }
                context
            }
            Self::UnsupportedOperator { .. } => vec![Context::Help(
                "the only supported reduction operator is `+`".to_string(),
            )],
            Self::InvalidIdentifier { .. } => vec![Context::Note(
                "names must start with a letter, end with a letter or digit, and contain only letters, digits and underscores"
                    .to_string(),
            )],
            Self::NonFiniteValue { .. } => vec![Context::Note(
                "infinities and NaN have no literal form in expressions".to_string(),
            )],
            Self::Parse { error, .. } => error.context(),
            _ => vec![],
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        match self {
            Self::Parse { error, .. } => error.error_location(source),
            _ => None,
        }
    }
}
