//! Read-only traversal of a component class.
//!
//! [`walk`] visits every node of a class in a fixed order, calling one
//! [`Visit`] method per node. A visitor overrides only the methods for the
//! node kinds it cares about; every other kind falls through to
//! [`Visit::check_pass`], which ignores the node in
//! [`VisitMode::Permissive`] mode and fails with
//! [`IrError::MissingHandler`] in [`VisitMode::Strict`] mode.
//!
//! The walk order is:
//!
//! 1. the class itself
//! 2. parameters, then analog send, receive and reduce ports, then event
//!    send and receive ports
//! 3. state variables, aliases, constants and random variables
//! 4. each regime: its time derivatives, then its event transitions (state
//!    assignments, then output events), then its condition transitions
//!    (trigger, then state assignments, then output events)
//! 5. sub-nodes, then port connections
//!
//! Sub-nodes are not descended into; a visitor that needs their contents
//! calls [`walk`] on them from [`Visit::visit_sub_node`].

use std::fmt;

use crate::{
    alias::{Alias, Constant, RandomVariable},
    class::DynamicsClass,
    connection::PortConnection,
    error::IrError,
    identifier::Identifier,
    parameter::Parameter,
    port::{AnalogReducePort, AnalogReceivePort, AnalogSendPort, EventReceivePort, EventSendPort},
    regime::Regime,
    state::{StateVariable, TimeDerivative},
    transition::{OnCondition, OnEvent, OutputEvent, StateAssignment, Trigger},
};

/// The kinds of node reachable from a component class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A component class
    DynamicsClass,
    /// A parameter
    Parameter,
    /// An analog send port
    AnalogSendPort,
    /// An analog receive port
    AnalogReceivePort,
    /// An analog reduce port
    AnalogReducePort,
    /// An event send port
    EventSendPort,
    /// An event receive port
    EventReceivePort,
    /// A state variable
    StateVariable,
    /// An alias
    Alias,
    /// A constant
    Constant,
    /// A random variable
    RandomVariable,
    /// A regime
    Regime,
    /// A time derivative
    TimeDerivative,
    /// An event transition
    OnEvent,
    /// A condition transition
    OnCondition,
    /// A trigger
    Trigger,
    /// A state assignment
    StateAssignment,
    /// An output event
    OutputEvent,
    /// A sub-node
    SubNode,
    /// A port connection
    PortConnection,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DynamicsClass => "dynamics class",
            Self::Parameter => "parameter",
            Self::AnalogSendPort => "analog send port",
            Self::AnalogReceivePort => "analog receive port",
            Self::AnalogReducePort => "analog reduce port",
            Self::EventSendPort => "event send port",
            Self::EventReceivePort => "event receive port",
            Self::StateVariable => "state variable",
            Self::Alias => "alias",
            Self::Constant => "constant",
            Self::RandomVariable => "random variable",
            Self::Regime => "regime",
            Self::TimeDerivative => "time derivative",
            Self::OnEvent => "event transition",
            Self::OnCondition => "condition transition",
            Self::Trigger => "trigger",
            Self::StateAssignment => "state assignment",
            Self::OutputEvent => "output event",
            Self::SubNode => "sub-node",
            Self::PortConnection => "port connection",
        };
        f.write_str(name)
    }
}

/// How a visitor treats node kinds it does not handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitMode {
    /// Unhandled nodes are skipped
    #[default]
    Permissive,
    /// Unhandled nodes are an error
    Strict,
}

/// A visitor over the nodes of a component class. See the module
/// documentation for the traversal order.
pub trait Visit {
    /// Returns how unhandled node kinds are treated.
    fn mode(&self) -> VisitMode {
        VisitMode::Permissive
    }

    /// Called for every node kind the visitor does not handle.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::MissingHandler`] in strict mode.
    fn check_pass(&mut self, kind: NodeKind) -> Result<(), IrError> {
        match self.mode() {
            VisitMode::Permissive => Ok(()),
            VisitMode::Strict => Err(IrError::missing_handler(kind)),
        }
    }

    /// Visits the class before any of its contents.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_class(&mut self, class: &DynamicsClass) -> Result<(), IrError> {
        let _ = class;
        self.check_pass(NodeKind::DynamicsClass)
    }

    /// Visits a parameter.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), IrError> {
        let _ = parameter;
        self.check_pass(NodeKind::Parameter)
    }

    /// Visits an analog send port.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_analog_send_port(&mut self, port: &AnalogSendPort) -> Result<(), IrError> {
        let _ = port;
        self.check_pass(NodeKind::AnalogSendPort)
    }

    /// Visits an analog receive port.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Result<(), IrError> {
        let _ = port;
        self.check_pass(NodeKind::AnalogReceivePort)
    }

    /// Visits an analog reduce port.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Result<(), IrError> {
        let _ = port;
        self.check_pass(NodeKind::AnalogReducePort)
    }

    /// Visits an event send port.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_event_send_port(&mut self, port: &EventSendPort) -> Result<(), IrError> {
        let _ = port;
        self.check_pass(NodeKind::EventSendPort)
    }

    /// Visits an event receive port.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_event_receive_port(&mut self, port: &EventReceivePort) -> Result<(), IrError> {
        let _ = port;
        self.check_pass(NodeKind::EventReceivePort)
    }

    /// Visits a state variable.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_state_variable(&mut self, state_variable: &StateVariable) -> Result<(), IrError> {
        let _ = state_variable;
        self.check_pass(NodeKind::StateVariable)
    }

    /// Visits an alias.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_alias(&mut self, alias: &Alias) -> Result<(), IrError> {
        let _ = alias;
        self.check_pass(NodeKind::Alias)
    }

    /// Visits a constant.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_constant(&mut self, constant: &Constant) -> Result<(), IrError> {
        let _ = constant;
        self.check_pass(NodeKind::Constant)
    }

    /// Visits a random variable.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_random_variable(&mut self, random_variable: &RandomVariable) -> Result<(), IrError> {
        let _ = random_variable;
        self.check_pass(NodeKind::RandomVariable)
    }

    /// Visits a regime before its contents.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_regime(&mut self, regime: &Regime) -> Result<(), IrError> {
        let _ = regime;
        self.check_pass(NodeKind::Regime)
    }

    /// Called after the contents of a regime have been visited.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn leave_regime(&mut self, regime: &Regime) -> Result<(), IrError> {
        let _ = regime;
        Ok(())
    }

    /// Visits a time derivative.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_time_derivative(&mut self, time_derivative: &TimeDerivative) -> Result<(), IrError> {
        let _ = time_derivative;
        self.check_pass(NodeKind::TimeDerivative)
    }

    /// Visits an event transition before its contents.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_on_event(&mut self, on_event: &OnEvent) -> Result<(), IrError> {
        let _ = on_event;
        self.check_pass(NodeKind::OnEvent)
    }

    /// Called after the contents of an event transition have been visited.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn leave_on_event(&mut self, on_event: &OnEvent) -> Result<(), IrError> {
        let _ = on_event;
        Ok(())
    }

    /// Visits a condition transition before its contents.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_on_condition(&mut self, on_condition: &OnCondition) -> Result<(), IrError> {
        let _ = on_condition;
        self.check_pass(NodeKind::OnCondition)
    }

    /// Called after the contents of a condition transition have been
    /// visited.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn leave_on_condition(&mut self, on_condition: &OnCondition) -> Result<(), IrError> {
        let _ = on_condition;
        Ok(())
    }

    /// Visits a trigger.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_trigger(&mut self, trigger: &Trigger) -> Result<(), IrError> {
        let _ = trigger;
        self.check_pass(NodeKind::Trigger)
    }

    /// Visits a state assignment.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_state_assignment(&mut self, assignment: &StateAssignment) -> Result<(), IrError> {
        let _ = assignment;
        self.check_pass(NodeKind::StateAssignment)
    }

    /// Visits an output event.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_output_event(&mut self, event: &OutputEvent) -> Result<(), IrError> {
        let _ = event;
        self.check_pass(NodeKind::OutputEvent)
    }

    /// Visits a sub-node. Its contents are not walked automatically.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_sub_node(
        &mut self,
        namespace: &Identifier,
        sub_node: &DynamicsClass,
    ) -> Result<(), IrError> {
        let _ = (namespace, sub_node);
        self.check_pass(NodeKind::SubNode)
    }

    /// Visits a port connection.
    ///
    /// # Errors
    ///
    /// Implementations return an error to stop the walk.
    fn visit_port_connection(&mut self, connection: &PortConnection) -> Result<(), IrError> {
        let _ = connection;
        self.check_pass(NodeKind::PortConnection)
    }
}

/// Walks `class` with `visitor`, stopping at the first error.
///
/// # Errors
///
/// Returns the first error produced by the visitor.
pub fn walk<V: Visit + ?Sized>(visitor: &mut V, class: &DynamicsClass) -> Result<(), IrError> {
    visitor.visit_class(class)?;

    for parameter in class.parameters() {
        visitor.visit_parameter(parameter)?;
    }
    for port in class.analog_send_ports() {
        visitor.visit_analog_send_port(port)?;
    }
    for port in class.analog_receive_ports() {
        visitor.visit_analog_receive_port(port)?;
    }
    for port in class.analog_reduce_ports() {
        visitor.visit_analog_reduce_port(port)?;
    }
    for port in class.event_send_ports() {
        visitor.visit_event_send_port(port)?;
    }
    for port in class.event_receive_ports() {
        visitor.visit_event_receive_port(port)?;
    }

    for state_variable in class.state_variables() {
        visitor.visit_state_variable(state_variable)?;
    }
    for alias in class.aliases() {
        visitor.visit_alias(alias)?;
    }
    for constant in class.constants() {
        visitor.visit_constant(constant)?;
    }
    for random_variable in class.random_variables() {
        visitor.visit_random_variable(random_variable)?;
    }

    for regime in class.regimes() {
        walk_regime(visitor, regime)?;
    }

    for (namespace, sub_node) in class.sub_nodes() {
        visitor.visit_sub_node(namespace, sub_node)?;
    }
    for connection in class.port_connections() {
        visitor.visit_port_connection(connection)?;
    }

    Ok(())
}

fn walk_regime<V: Visit + ?Sized>(visitor: &mut V, regime: &Regime) -> Result<(), IrError> {
    visitor.visit_regime(regime)?;

    for time_derivative in regime.time_derivatives() {
        visitor.visit_time_derivative(time_derivative)?;
    }

    for on_event in regime.on_events() {
        visitor.visit_on_event(on_event)?;
        for assignment in on_event.transition().state_assignments() {
            visitor.visit_state_assignment(assignment)?;
        }
        for event in on_event.transition().output_events() {
            visitor.visit_output_event(event)?;
        }
        visitor.leave_on_event(on_event)?;
    }

    for on_condition in regime.on_conditions() {
        visitor.visit_on_condition(on_condition)?;
        visitor.visit_trigger(on_condition.trigger())?;
        for assignment in on_condition.transition().state_assignments() {
            visitor.visit_state_assignment(assignment)?;
        }
        for event in on_condition.transition().output_events() {
            visitor.visit_output_event(event)?;
        }
        visitor.leave_on_condition(on_condition)?;
    }

    visitor.leave_regime(regime)
}
