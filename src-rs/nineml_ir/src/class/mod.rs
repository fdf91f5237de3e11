//! The dynamics component class.

mod builder;
mod infer;
mod resolve;

use indexmap::IndexMap;
use nineml_expr::Expr;

pub use builder::DynamicsClassBuilder;

use crate::{
    alias::{Alias, Constant, RandomVariable},
    connection::{PortAddress, PortConnection},
    dimension::Dimension,
    error::{IrError, ReferenceKind},
    identifier::Identifier,
    index::IndexBook,
    parameter::Parameter,
    port::{
        AnalogReducePort, AnalogReceivePort, AnalogSendPort, EventReceivePort, EventSendPort,
        PortKind,
    },
    regime::Regime,
    state::StateVariable,
    transition::TransitionRef,
    visit::NodeKind,
};

/// A dynamics component class: the interface (parameters and ports), the
/// internal state, the regime state machine, and optionally a hierarchy of
/// named sub-nodes joined by port connections.
///
/// A class is only ever constructed through [`DynamicsClassBuilder`], which
/// infers the interface implied by the dynamics, resolves transition
/// targets and validates the result. Sub-nodes are owned by value; a class
/// without sub-nodes is *flat*.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsClass {
    name: Identifier,
    parameters: IndexMap<Identifier, Parameter>,
    analog_send_ports: IndexMap<Identifier, AnalogSendPort>,
    analog_receive_ports: IndexMap<Identifier, AnalogReceivePort>,
    analog_reduce_ports: IndexMap<Identifier, AnalogReducePort>,
    event_send_ports: IndexMap<Identifier, EventSendPort>,
    event_receive_ports: IndexMap<Identifier, EventReceivePort>,
    state_variables: IndexMap<Identifier, StateVariable>,
    aliases: IndexMap<Identifier, Alias>,
    constants: IndexMap<Identifier, Constant>,
    random_variables: IndexMap<Identifier, RandomVariable>,
    regimes: IndexMap<Identifier, Regime>,
    sub_nodes: IndexMap<Identifier, DynamicsClass>,
    port_connections: Vec<PortConnection>,
    indices: IndexBook,
}

impl DynamicsClass {
    /// Starts building a class.
    pub fn builder(name: impl Into<Identifier>) -> DynamicsClassBuilder {
        DynamicsClassBuilder::new(name)
    }

    /// Returns the name of the class.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns true if the class has no sub-nodes.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.sub_nodes.is_empty()
    }

    /// Returns the parameters, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    /// Returns the parameter with the given name, if any.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Returns the analog send ports, in declaration order.
    pub fn analog_send_ports(&self) -> impl Iterator<Item = &AnalogSendPort> {
        self.analog_send_ports.values()
    }

    /// Returns the analog send port with the given name, if any.
    #[must_use]
    pub fn analog_send_port(&self, name: &str) -> Option<&AnalogSendPort> {
        self.analog_send_ports.get(name)
    }

    /// Returns the analog receive ports, in declaration order.
    pub fn analog_receive_ports(&self) -> impl Iterator<Item = &AnalogReceivePort> {
        self.analog_receive_ports.values()
    }

    /// Returns the analog receive port with the given name, if any.
    #[must_use]
    pub fn analog_receive_port(&self, name: &str) -> Option<&AnalogReceivePort> {
        self.analog_receive_ports.get(name)
    }

    /// Returns the analog reduce ports, in declaration order.
    pub fn analog_reduce_ports(&self) -> impl Iterator<Item = &AnalogReducePort> {
        self.analog_reduce_ports.values()
    }

    /// Returns the analog reduce port with the given name, if any.
    #[must_use]
    pub fn analog_reduce_port(&self, name: &str) -> Option<&AnalogReducePort> {
        self.analog_reduce_ports.get(name)
    }

    /// Returns the event send ports, in declaration order.
    pub fn event_send_ports(&self) -> impl Iterator<Item = &EventSendPort> {
        self.event_send_ports.values()
    }

    /// Returns the event send port with the given name, if any.
    #[must_use]
    pub fn event_send_port(&self, name: &str) -> Option<&EventSendPort> {
        self.event_send_ports.get(name)
    }

    /// Returns the event receive ports, in declaration order.
    pub fn event_receive_ports(&self) -> impl Iterator<Item = &EventReceivePort> {
        self.event_receive_ports.values()
    }

    /// Returns the event receive port with the given name, if any.
    #[must_use]
    pub fn event_receive_port(&self, name: &str) -> Option<&EventReceivePort> {
        self.event_receive_ports.get(name)
    }

    /// Returns the state variables, in declaration order.
    pub fn state_variables(&self) -> impl Iterator<Item = &StateVariable> {
        self.state_variables.values()
    }

    /// Returns the state variable with the given name, if any.
    #[must_use]
    pub fn state_variable(&self, name: &str) -> Option<&StateVariable> {
        self.state_variables.get(name)
    }

    /// Returns the aliases, in declaration order.
    pub fn aliases(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.values()
    }

    /// Returns the alias with the given name, if any.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    /// Returns the constants, in declaration order.
    pub fn constants(&self) -> impl Iterator<Item = &Constant> {
        self.constants.values()
    }

    /// Returns the constant with the given name, if any.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.get(name)
    }

    /// Returns the random variables, in declaration order.
    pub fn random_variables(&self) -> impl Iterator<Item = &RandomVariable> {
        self.random_variables.values()
    }

    /// Returns the random variable with the given name, if any.
    #[must_use]
    pub fn random_variable(&self, name: &str) -> Option<&RandomVariable> {
        self.random_variables.get(name)
    }

    /// Returns the regimes in the order they were declared.
    pub fn regimes(&self) -> impl Iterator<Item = &Regime> {
        self.regimes.values()
    }

    /// Returns the regime with the given name, if any.
    #[must_use]
    pub fn regime(&self, name: &str) -> Option<&Regime> {
        self.regimes.get(name)
    }

    /// Returns the regime at the given position, as recorded by resolved
    /// transitions.
    #[must_use]
    pub fn regime_at(&self, index: usize) -> Option<&Regime> {
        self.regimes.get_index(index).map(|(_, regime)| regime)
    }

    /// Returns the position of the named regime.
    #[must_use]
    pub fn regime_index(&self, name: &str) -> Option<usize> {
        self.regimes.get_index_of(name)
    }

    /// Returns the number of regimes.
    #[must_use]
    pub fn regime_count(&self) -> usize {
        self.regimes.len()
    }

    /// Returns every transition together with the regime it leaves.
    pub fn transitions(&self) -> impl Iterator<Item = (&Regime, TransitionRef<'_>)> {
        self.regimes
            .values()
            .flat_map(|regime| regime.transitions().map(move |transition| (regime, transition)))
    }

    /// Returns the sub-nodes with their namespaces.
    pub fn sub_nodes(&self) -> impl Iterator<Item = (&Identifier, &Self)> {
        self.sub_nodes.iter()
    }

    /// Returns the sub-node with the given namespace, if any.
    #[must_use]
    pub fn sub_node(&self, namespace: &str) -> Option<&Self> {
        self.sub_nodes.get(namespace)
    }

    /// Returns the port connections, in declaration order.
    #[must_use]
    pub fn port_connections(&self) -> &[PortConnection] {
        &self.port_connections
    }

    /// Returns the index book holding ordinal positions of named nodes.
    #[must_use]
    pub const fn indices(&self) -> &IndexBook {
        &self.indices
    }

    /// Returns the ordinal position of a named node, if one was assigned.
    #[must_use]
    pub fn index_of(&self, kind: NodeKind, name: &str) -> Option<usize> {
        self.indices.get(kind, name)
    }

    /// Replaces the index book.
    pub fn set_indices(&mut self, indices: IndexBook) {
        self.indices = indices;
    }

    /// Returns the kind of the port with the given name.
    #[must_use]
    pub fn port_kind(&self, name: &str) -> Option<PortKind> {
        if self.analog_send_ports.contains_key(name) {
            Some(PortKind::AnalogSend)
        } else if self.analog_receive_ports.contains_key(name) {
            Some(PortKind::AnalogReceive)
        } else if self.analog_reduce_ports.contains_key(name) {
            Some(PortKind::AnalogReduce)
        } else if self.event_send_ports.contains_key(name) {
            Some(PortKind::EventSend)
        } else if self.event_receive_ports.contains_key(name) {
            Some(PortKind::EventReceive)
        } else {
            None
        }
    }

    /// Returns the dimension of the analog port with the given name.
    #[must_use]
    pub fn analog_port_dimension(&self, name: &str) -> Option<&Dimension> {
        self.analog_send_ports
            .get(name)
            .map(AnalogSendPort::dimension)
            .or_else(|| {
                self.analog_receive_ports
                    .get(name)
                    .map(AnalogReceivePort::dimension)
            })
            .or_else(|| {
                self.analog_reduce_ports
                    .get(name)
                    .map(AnalogReducePort::dimension)
            })
    }

    /// Resolves a port address relative to this class, descending through
    /// nested sub-nodes. Returns the class owning the port and the kind of
    /// the port.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::UnresolvedReference`] if a namespace segment or
    /// the port does not exist.
    pub fn resolve_port(&self, address: &PortAddress) -> Result<(&Self, PortKind), IrError> {
        let mut owner = self;
        for segment in address.namespace() {
            owner = owner.sub_nodes.get(segment).ok_or_else(|| {
                IrError::unresolved(
                    ReferenceKind::SubNode,
                    segment.as_str(),
                    format!("port address `{address}`"),
                )
            })?;
        }

        let kind = owner.port_kind(address.port().as_str()).ok_or_else(|| {
            IrError::unresolved(
                ReferenceKind::Port,
                address.port().as_str(),
                format!("port address `{address}`"),
            )
        })?;

        Ok((owner, kind))
    }

    /// Returns every expression of the local dynamics: aliases, then per
    /// regime the time derivatives, state assignments and triggers.
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        self.aliases
            .values()
            .map(Alias::rhs)
            .chain(self.regimes.values().flat_map(Regime::expressions))
    }
}
