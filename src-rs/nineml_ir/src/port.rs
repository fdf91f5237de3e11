//! Analog and event ports.

use std::fmt;

use crate::{dimension::Dimension, error::IrError, identifier::Identifier, into_node::IntoNode};

/// The five kinds of port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Sends a continuous value
    AnalogSend,
    /// Receives a continuous value from exactly one sender
    AnalogReceive,
    /// Receives continuous values from any number of senders and combines them
    AnalogReduce,
    /// Emits discrete events
    EventSend,
    /// Accepts discrete events
    EventReceive,
}

impl PortKind {
    /// Returns true for analog ports.
    #[must_use]
    pub const fn is_analog(self) -> bool {
        matches!(
            self,
            Self::AnalogSend | Self::AnalogReceive | Self::AnalogReduce
        )
    }

    /// Returns true for ports that send.
    #[must_use]
    pub const fn is_send(self) -> bool {
        matches!(self, Self::AnalogSend | Self::EventSend)
    }

    /// Returns true if a port of this kind can accept a connection from a
    /// port of kind `sender`.
    #[must_use]
    pub const fn accepts(self, sender: Self) -> bool {
        matches!(
            (sender, self),
            (Self::AnalogSend, Self::AnalogReceive | Self::AnalogReduce)
                | (Self::EventSend, Self::EventReceive)
        )
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnalogSend => write!(f, "analog send port"),
            Self::AnalogReceive => write!(f, "analog receive port"),
            Self::AnalogReduce => write!(f, "analog reduce port"),
            Self::EventSend => write!(f, "event send port"),
            Self::EventReceive => write!(f, "event receive port"),
        }
    }
}

/// The operator an analog reduce port uses to combine its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Summation
    Add,
}

impl ReduceOp {
    /// Parses a reduction operator.
    ///
    /// Returns `None` for anything other than `+`.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "+" => Some(Self::Add),
            _ => None,
        }
    }

    /// Returns the textual form of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
        }
    }
}

/// An analog port exposing the value of an alias or state variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogSendPort {
    name: Identifier,
    dimension: Dimension,
}

/// An analog port whose value is supplied by a single sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogReceivePort {
    name: Identifier,
    dimension: Dimension,
}

/// An analog port combining the values of any number of senders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogReducePort {
    name: Identifier,
    dimension: Dimension,
    operator: ReduceOp,
}

/// A port emitting events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSendPort {
    name: Identifier,
}

/// A port accepting events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventReceivePort {
    name: Identifier,
}

impl AnalogSendPort {
    /// Creates a new analog send port.
    pub fn new(name: impl Into<Identifier>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
        }
    }

    /// Returns the name of the port.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the dimension of the port.
    #[must_use]
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }
}

impl AnalogReceivePort {
    /// Creates a new analog receive port.
    pub fn new(name: impl Into<Identifier>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
        }
    }

    /// Returns the name of the port.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the dimension of the port.
    #[must_use]
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }
}

impl AnalogReducePort {
    /// Creates a new analog reduce port from the textual operator.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::UnsupportedOperator`] for any operator other than
    /// `+`.
    pub fn new(
        name: impl Into<Identifier>,
        dimension: Dimension,
        operator: &str,
    ) -> Result<Self, IrError> {
        let name = name.into();
        let Some(operator) = ReduceOp::from_symbol(operator) else {
            return Err(IrError::unsupported_operator(name, operator));
        };
        Ok(Self::with_operator(name, dimension, operator))
    }

    /// Creates a new analog reduce port with an already parsed operator.
    pub fn with_operator(
        name: impl Into<Identifier>,
        dimension: Dimension,
        operator: ReduceOp,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            operator,
        }
    }

    /// Returns the name of the port.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the dimension of the port.
    #[must_use]
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    /// Returns the reduction operator.
    #[must_use]
    pub const fn operator(&self) -> ReduceOp {
        self.operator
    }
}

impl EventSendPort {
    /// Creates a new event send port.
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the port.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }
}

impl EventReceivePort {
    /// Creates a new event receive port.
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the port.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }
}

impl IntoNode<EventSendPort> for &str {
    fn into_node(self) -> Result<EventSendPort, IrError> {
        Ok(EventSendPort::new(self))
    }
}

impl IntoNode<EventReceivePort> for &str {
    fn into_node(self) -> Result<EventReceivePort, IrError> {
        Ok(EventReceivePort::new(self))
    }
}
