//! Constructive rebuild of a component class.
//!
//! Where [`Visit`](crate::visit::Visit) only reads a class, [`Fold`] produces
//! a new one. Every `fold_*` method returns a fresh copy of its node by
//! default, routing names through [`Fold::fold_symbol`] and expressions
//! through [`Fold::fold_expr`], so an implementation that only overrides
//! those two methods renames consistently across the whole class.
//! [`fold_class`] passes the folded parts back through the validating
//! builder.

use nineml_expr::{BuiltinRef, Expr};

use crate::{
    alias::{Alias, Constant, RandomVariable},
    class::DynamicsClass,
    connection::PortConnection,
    error::IrError,
    identifier::Identifier,
    index::IndexBook,
    parameter::Parameter,
    port::{AnalogReducePort, AnalogReceivePort, AnalogSendPort, EventReceivePort, EventSendPort},
    regime::Regime,
    state::{StateVariable, TimeDerivative},
    transition::{OnCondition, OnEvent, OutputEvent, StateAssignment, Transition, Trigger},
    visit::NodeKind,
};

/// A rebuild of a component class. See the module documentation.
pub trait Fold {
    /// Maps a variable-like name: a parameter, port, state variable, alias,
    /// constant or random variable name, or an expression atom.
    fn fold_symbol(&mut self, name: &Identifier) -> Identifier {
        name.clone()
    }

    fn fold_expr(&mut self, expr: &Expr) -> Expr {
        expr.map_symbols(&mut |atom| self.fold_symbol(&Identifier::new(atom)).into_string())
    }

    fn fold_parameter(&mut self, parameter: &Parameter) -> Parameter {
        Parameter::new(
            self.fold_symbol(parameter.name()),
            parameter.dimension().clone(),
        )
    }

    fn fold_analog_send_port(&mut self, port: &AnalogSendPort) -> AnalogSendPort {
        AnalogSendPort::new(self.fold_symbol(port.name()), port.dimension().clone())
    }

    /// Returning `None` removes the port.
    fn fold_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Option<AnalogReceivePort> {
        Some(AnalogReceivePort::new(
            self.fold_symbol(port.name()),
            port.dimension().clone(),
        ))
    }

    /// Returning `None` removes the port.
    fn fold_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Option<AnalogReducePort> {
        Some(AnalogReducePort::with_operator(
            self.fold_symbol(port.name()),
            port.dimension().clone(),
            port.operator(),
        ))
    }

    fn fold_event_send_port(&mut self, port: &EventSendPort) -> EventSendPort {
        EventSendPort::new(self.fold_symbol(port.name()))
    }

    fn fold_event_receive_port(&mut self, port: &EventReceivePort) -> EventReceivePort {
        EventReceivePort::new(self.fold_symbol(port.name()))
    }

    fn fold_state_variable(&mut self, state_variable: &StateVariable) -> StateVariable {
        StateVariable::new(
            self.fold_symbol(state_variable.name()),
            state_variable.dimension().clone(),
        )
    }

    fn fold_alias(&mut self, alias: &Alias) -> Alias {
        Alias::new(self.fold_symbol(alias.name()), self.fold_expr(alias.rhs()))
    }

    fn fold_constant(&mut self, constant: &Constant) -> Constant {
        Constant::new(
            self.fold_symbol(constant.name()),
            constant.value(),
            constant.units(),
        )
    }

    fn fold_random_variable(&mut self, random_variable: &RandomVariable) -> RandomVariable {
        RandomVariable::new(
            self.fold_symbol(random_variable.name()),
            random_variable.distribution(),
            random_variable.parameters().clone(),
            random_variable.units(),
        )
    }

    /// Regime names are kept as they are by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the folded regime is inconsistent, for instance
    /// when two time derivatives end up on the same state variable.
    fn fold_regime(&mut self, regime: &Regime) -> Result<Regime, IrError> {
        let time_derivatives = regime
            .time_derivatives()
            .map(|td| self.fold_time_derivative(td))
            .collect();
        let on_events = regime
            .on_events()
            .iter()
            .map(|on_event| self.fold_on_event(on_event))
            .collect::<Result<_, _>>()?;
        let on_conditions = regime
            .on_conditions()
            .iter()
            .map(|on_condition| self.fold_on_condition(on_condition))
            .collect::<Result<_, _>>()?;
        Regime::new(
            regime.name().clone(),
            time_derivatives,
            on_events,
            on_conditions,
        )
    }

    fn fold_time_derivative(&mut self, time_derivative: &TimeDerivative) -> TimeDerivative {
        TimeDerivative::new(
            self.fold_symbol(time_derivative.variable()),
            self.fold_expr(time_derivative.rhs()),
        )
    }

    /// # Errors
    ///
    /// Returns an error if the folded transition is inconsistent.
    fn fold_on_event(&mut self, on_event: &OnEvent) -> Result<OnEvent, IrError> {
        Ok(OnEvent::new(
            self.fold_symbol(on_event.src_port()),
            self.fold_transition(on_event.transition())?,
        ))
    }

    /// # Errors
    ///
    /// Returns an error if the folded transition is inconsistent.
    fn fold_on_condition(&mut self, on_condition: &OnCondition) -> Result<OnCondition, IrError> {
        Ok(OnCondition::new(
            self.fold_trigger(on_condition.trigger()),
            self.fold_transition(on_condition.transition())?,
        ))
    }

    /// Folds the body shared by both transition kinds. The target regime
    /// name is kept.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::NameCollision`] if two state assignments end up on
    /// the same state variable.
    fn fold_transition(&mut self, transition: &Transition) -> Result<Transition, IrError> {
        let state_assignments = transition
            .state_assignments()
            .map(|assignment| self.fold_state_assignment(assignment))
            .collect();
        let output_events = transition
            .output_events()
            .iter()
            .map(|event| self.fold_output_event(event))
            .collect();
        Transition::new(
            state_assignments,
            output_events,
            transition.target_regime_name().cloned(),
        )
    }

    fn fold_trigger(&mut self, trigger: &Trigger) -> Trigger {
        Trigger::new(self.fold_expr(trigger.rhs()))
    }

    fn fold_state_assignment(&mut self, assignment: &StateAssignment) -> StateAssignment {
        StateAssignment::new(
            self.fold_symbol(assignment.variable()),
            self.fold_expr(assignment.rhs()),
        )
    }

    fn fold_output_event(&mut self, event: &OutputEvent) -> OutputEvent {
        OutputEvent::new(self.fold_symbol(event.port()))
    }

    /// Sub-nodes are copied unchanged by default.
    fn fold_sub_node(
        &mut self,
        namespace: &Identifier,
        sub_node: &DynamicsClass,
    ) -> (Identifier, DynamicsClass) {
        (namespace.clone(), sub_node.clone())
    }

    fn fold_port_connection(&mut self, connection: &PortConnection) -> PortConnection {
        connection.clone()
    }

    /// Carries index positions over to the folded names. Regime and
    /// sub-node names are not symbols and keep their entries.
    fn fold_indices(&mut self, indices: &IndexBook) -> IndexBook {
        indices.map_names(
            |kind| !matches!(kind, NodeKind::Regime | NodeKind::SubNode),
            |name| self.fold_symbol(&Identifier::new(name)).into_string(),
        )
    }
}

/// Folds every part of `class` with `folder` and rebuilds the result.
///
/// The folded class declares its parameters, state variables and event
/// ports explicitly, so the rebuild also checks that the fold kept the
/// interface consistent with the dynamics.
///
/// # Errors
///
/// Returns the first error raised by a fold method or by the rebuild.
pub fn fold_class<F: Fold + ?Sized>(
    folder: &mut F,
    class: &DynamicsClass,
    builtins: &impl BuiltinRef,
) -> Result<DynamicsClass, IrError> {
    let parameters: Vec<_> = class
        .parameters()
        .map(|parameter| folder.fold_parameter(parameter))
        .collect();
    let state_variables: Vec<_> = class
        .state_variables()
        .map(|state_variable| folder.fold_state_variable(state_variable))
        .collect();
    let event_send_ports: Vec<_> = class
        .event_send_ports()
        .map(|port| folder.fold_event_send_port(port))
        .collect();
    let event_receive_ports: Vec<_> = class
        .event_receive_ports()
        .map(|port| folder.fold_event_receive_port(port))
        .collect();

    let mut builder = DynamicsClass::builder(class.name().clone())
        .parameters(parameters)
        .state_variables(state_variables)
        .event_send_ports(event_send_ports)
        .event_receive_ports(event_receive_ports);

    for port in class.analog_send_ports() {
        builder = builder.analog_send_port(folder.fold_analog_send_port(port));
    }
    for port in class.analog_receive_ports() {
        if let Some(port) = folder.fold_analog_receive_port(port) {
            builder = builder.analog_receive_port(port);
        }
    }
    for port in class.analog_reduce_ports() {
        if let Some(port) = folder.fold_analog_reduce_port(port) {
            builder = builder.analog_reduce_port(port);
        }
    }
    for alias in class.aliases() {
        builder = builder.alias(folder.fold_alias(alias));
    }
    for constant in class.constants() {
        builder = builder.constant(folder.fold_constant(constant));
    }
    for random_variable in class.random_variables() {
        builder = builder.random_variable(folder.fold_random_variable(random_variable));
    }
    for regime in class.regimes() {
        builder = builder.regime(folder.fold_regime(regime));
    }
    for (namespace, sub_node) in class.sub_nodes() {
        let (namespace, sub_node) = folder.fold_sub_node(namespace, sub_node);
        builder = builder.sub_node(namespace, sub_node);
    }
    for connection in class.port_connections() {
        builder = builder.port_connection(folder.fold_port_connection(connection));
    }

    builder
        .indices(folder.fold_indices(class.indices()))
        .build(builtins)
}

#[cfg(test)]
mod tests {
    use nineml_expr::StandardBuiltins;

    use super::*;
    use crate::test::construct;

    struct Identity;

    impl Fold for Identity {}

    struct Upper;

    impl Fold for Upper {
        fn fold_symbol(&mut self, name: &Identifier) -> Identifier {
            if name.as_str() == "t" {
                name.clone()
            } else {
                Identifier::new(name.as_str().to_uppercase())
            }
        }
    }

    #[test]
    fn identity_fold_reproduces_class() {
        let class = construct::leaky_integrate_and_fire();
        let folded =
            fold_class(&mut Identity, &class, &StandardBuiltins).expect("fold should succeed");
        assert_eq!(folded, class);
    }

    #[test]
    fn symbol_fold_reaches_every_name() {
        let class = construct::exponential_synapse();
        let folded = fold_class(&mut Upper, &class, &StandardBuiltins).expect("fold should succeed");

        assert!(folded.state_variable("G").is_some());
        assert!(folded.parameter("TAU_SYN").is_some());
        assert!(folded.event_receive_port("INPUT").is_some());
        assert_eq!(
            folded.alias("I").map(|alias| alias.rhs().to_string()),
            Some("G * W".to_string())
        );
        let regime = folded.regime("default").expect("regime name should be kept");
        assert_eq!(regime.on_events()[0].src_port().as_str(), "INPUT");
    }

    #[test]
    fn indices_follow_renamed_symbols() {
        let mut book = IndexBook::new();
        book.index_of(NodeKind::Parameter, "tau_syn");
        book.index_of(NodeKind::Regime, "default");

        let folded = Upper.fold_indices(&book);
        assert_eq!(folded.get(NodeKind::Parameter, "TAU_SYN"), Some(0));
        assert_eq!(folded.get(NodeKind::Regime, "default"), Some(0));
    }
}
