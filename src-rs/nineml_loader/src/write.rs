//! Writing a component class to its serialized form.

use nineml_expr::Expr;
use nineml_ir::{
    Alias, AnalogReceivePort, AnalogReducePort, AnalogSendPort, Constant, DynamicsClass,
    EventReceivePort, EventSendPort, Identifier, IrError, NodeKind, OnCondition, OnEvent,
    OutputEvent, Parameter, PortConnection, RandomVariable, Regime, StateAssignment,
    StateVariable, TimeDerivative, Transition, Trigger, Visit, VisitMode, walk,
};
use tracing::debug;

use crate::{
    node::SerialNode,
    tag::{self, attr},
};

/// Writes a dynamics class, including its sub-nodes, as a `Dynamics`
/// element that [`load_dynamics`](crate::load_dynamics) reads back into an
/// equal class. Index assignments are not written.
///
/// # Errors
///
/// Returns [`IrError::MissingHandler`] if the class contains a kind of node
/// the writer cannot represent.
pub fn write_dynamics(class: &DynamicsClass) -> Result<SerialNode, IrError> {
    debug!(class = %class.name(), "writing class");
    let mut writer = DynamicsWriter::default();
    walk(&mut writer, class)?;
    writer
        .open
        .pop()
        .ok_or_else(|| IrError::missing_handler(NodeKind::DynamicsClass))
}

/// Builds the element tree while the class is walked. Regimes and
/// transitions stay open until their `leave_*` hook.
#[derive(Debug, Default)]
struct DynamicsWriter {
    open: Vec<SerialNode>,
}

impl DynamicsWriter {
    fn append(&mut self, node: SerialNode) {
        if let Some(parent) = self.open.last_mut() {
            parent.push_child(node);
        }
    }

    fn close(&mut self) {
        if let Some(node) = self.open.pop() {
            self.append(node);
        }
    }
}

fn named(tag: &str, name: &Identifier) -> SerialNode {
    SerialNode::new(tag).with_attribute(attr::NAME, name.as_str())
}

fn math(expr: &Expr) -> SerialNode {
    SerialNode::new(tag::MATH_INLINE).with_text(expr.to_string())
}

fn with_target(node: SerialNode, transition: &Transition) -> SerialNode {
    match transition.target_regime_name() {
        Some(target) => node.with_attribute(attr::TARGET_REGIME, target.as_str()),
        None => node,
    }
}

impl Visit for DynamicsWriter {
    fn mode(&self) -> VisitMode {
        VisitMode::Strict
    }

    fn visit_class(&mut self, class: &DynamicsClass) -> Result<(), IrError> {
        self.open.push(named(tag::DYNAMICS, class.name()));
        Ok(())
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), IrError> {
        self.append(
            named(tag::PARAMETER, parameter.name())
                .with_attribute(attr::DIMENSION, parameter.dimension().name()),
        );
        Ok(())
    }

    fn visit_analog_send_port(&mut self, port: &AnalogSendPort) -> Result<(), IrError> {
        self.append(
            named(tag::ANALOG_SEND_PORT, port.name())
                .with_attribute(attr::DIMENSION, port.dimension().name()),
        );
        Ok(())
    }

    fn visit_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Result<(), IrError> {
        self.append(
            named(tag::ANALOG_RECEIVE_PORT, port.name())
                .with_attribute(attr::DIMENSION, port.dimension().name()),
        );
        Ok(())
    }

    fn visit_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Result<(), IrError> {
        self.append(
            named(tag::ANALOG_REDUCE_PORT, port.name())
                .with_attribute(attr::DIMENSION, port.dimension().name())
                .with_attribute(attr::OPERATOR, port.operator().symbol()),
        );
        Ok(())
    }

    fn visit_event_send_port(&mut self, port: &EventSendPort) -> Result<(), IrError> {
        self.append(named(tag::EVENT_SEND_PORT, port.name()));
        Ok(())
    }

    fn visit_event_receive_port(&mut self, port: &EventReceivePort) -> Result<(), IrError> {
        self.append(named(tag::EVENT_RECEIVE_PORT, port.name()));
        Ok(())
    }

    fn visit_state_variable(&mut self, state_variable: &StateVariable) -> Result<(), IrError> {
        self.append(
            named(tag::STATE_VARIABLE, state_variable.name())
                .with_attribute(attr::DIMENSION, state_variable.dimension().name()),
        );
        Ok(())
    }

    fn visit_alias(&mut self, alias: &Alias) -> Result<(), IrError> {
        self.append(named(tag::ALIAS, alias.name()).with_child(math(alias.rhs())));
        Ok(())
    }

    fn visit_constant(&mut self, constant: &Constant) -> Result<(), IrError> {
        self.append(
            named(tag::CONSTANT, constant.name())
                .with_attribute(attr::UNITS, constant.units())
                .with_text(constant.value().to_string()),
        );
        Ok(())
    }

    fn visit_random_variable(&mut self, random_variable: &RandomVariable) -> Result<(), IrError> {
        let mut node = named(tag::RANDOM_VARIABLE, random_variable.name())
            .with_attribute(attr::DISTRIBUTION, random_variable.distribution())
            .with_attribute(attr::UNITS, random_variable.units());
        for (name, value) in random_variable.parameters() {
            node.push_child(
                SerialNode::new(tag::DISTRIBUTION_PARAMETER)
                    .with_attribute(attr::NAME, name.as_str())
                    .with_attribute(attr::VALUE, value.to_string()),
            );
        }
        self.append(node);
        Ok(())
    }

    fn visit_regime(&mut self, regime: &Regime) -> Result<(), IrError> {
        self.open.push(named(tag::REGIME, regime.name()));
        Ok(())
    }

    fn leave_regime(&mut self, _regime: &Regime) -> Result<(), IrError> {
        self.close();
        Ok(())
    }

    fn visit_time_derivative(&mut self, time_derivative: &TimeDerivative) -> Result<(), IrError> {
        self.append(
            SerialNode::new(tag::TIME_DERIVATIVE)
                .with_attribute(attr::VARIABLE, time_derivative.variable().as_str())
                .with_child(math(time_derivative.rhs())),
        );
        Ok(())
    }

    fn visit_on_event(&mut self, on_event: &OnEvent) -> Result<(), IrError> {
        let node = SerialNode::new(tag::ON_EVENT)
            .with_attribute(attr::SRC_PORT, on_event.src_port().as_str());
        self.open.push(with_target(node, on_event.transition()));
        Ok(())
    }

    fn leave_on_event(&mut self, _on_event: &OnEvent) -> Result<(), IrError> {
        self.close();
        Ok(())
    }

    fn visit_on_condition(&mut self, on_condition: &OnCondition) -> Result<(), IrError> {
        let node = SerialNode::new(tag::ON_CONDITION);
        self.open.push(with_target(node, on_condition.transition()));
        Ok(())
    }

    fn leave_on_condition(&mut self, _on_condition: &OnCondition) -> Result<(), IrError> {
        self.close();
        Ok(())
    }

    fn visit_trigger(&mut self, trigger: &Trigger) -> Result<(), IrError> {
        self.append(SerialNode::new(tag::TRIGGER).with_child(math(trigger.rhs())));
        Ok(())
    }

    fn visit_state_assignment(&mut self, assignment: &StateAssignment) -> Result<(), IrError> {
        self.append(
            SerialNode::new(tag::STATE_ASSIGNMENT)
                .with_attribute(attr::VARIABLE, assignment.variable().as_str())
                .with_child(math(assignment.rhs())),
        );
        Ok(())
    }

    fn visit_output_event(&mut self, event: &OutputEvent) -> Result<(), IrError> {
        self.append(
            SerialNode::new(tag::OUTPUT_EVENT).with_attribute(attr::PORT, event.port().as_str()),
        );
        Ok(())
    }

    fn visit_sub_node(
        &mut self,
        namespace: &Identifier,
        sub_node: &DynamicsClass,
    ) -> Result<(), IrError> {
        let class = write_dynamics(sub_node)?;
        self.append(
            SerialNode::new(tag::SUB_NODE)
                .with_attribute(attr::NAMESPACE, namespace.as_str())
                .with_child(class),
        );
        Ok(())
    }

    fn visit_port_connection(&mut self, connection: &PortConnection) -> Result<(), IrError> {
        self.append(
            SerialNode::new(tag::PORT_CONNECTION)
                .with_attribute(attr::SEND_PORT, connection.sender().to_string())
                .with_attribute(attr::RECEIVE_PORT, connection.receiver().to_string()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nineml_expr::StandardBuiltins;
    use nineml_ir::StandardDimensions;

    use super::*;
    use crate::{load_dynamics, test::construct};

    fn write(class: &DynamicsClass) -> SerialNode {
        write_dynamics(class).expect("class should write")
    }

    fn round_trip(class: &DynamicsClass) -> DynamicsClass {
        load_dynamics(&write(class), &StandardDimensions, &StandardBuiltins)
            .expect("written class should load")
    }

    fn child_tags(node: &SerialNode) -> Vec<&str> {
        node.children().iter().map(SerialNode::tag).collect()
    }

    #[test]
    fn write_follows_walk_order() {
        let node = write(&construct::leaky_integrate_and_fire());

        assert_eq!(node.tag(), tag::DYNAMICS);
        assert_eq!(node.attribute(attr::NAME), Some("LeakyIntegrateAndFire"));
        assert_eq!(
            child_tags(&node),
            [
                "Parameter",
                "Parameter",
                "Parameter",
                "Parameter",
                "Parameter",
                "Parameter",
                "AnalogSendPort",
                "EventSendPort",
                "StateVariable",
                "Alias",
                "Regime",
            ]
        );
        assert_eq!(
            node.children()[0].attribute(attr::DIMENSION),
            Some("time")
        );
    }

    #[test]
    fn transitions_nest_inside_their_regime() {
        let node = write(&construct::leaky_integrate_and_fire());
        let regime = node.child(tag::REGIME).expect("regime should be written");
        assert_eq!(child_tags(regime), ["TimeDerivative", "OnCondition"]);

        let on_condition = regime.child(tag::ON_CONDITION).expect("transition should be written");
        assert_eq!(
            child_tags(on_condition),
            ["Trigger", "StateAssignment", "OutputEvent"]
        );
        assert_eq!(on_condition.attribute(attr::TARGET_REGIME), None);

        let trigger = on_condition
            .child(tag::TRIGGER)
            .and_then(|trigger| trigger.child(tag::MATH_INLINE))
            .and_then(SerialNode::text);
        assert_eq!(trigger, Some("V > V_th"));
    }

    #[test]
    fn round_trip_flat_class() {
        let class = construct::leaky_integrate_and_fire();
        assert_eq!(round_trip(&class), class);
    }

    #[test]
    fn round_trip_constants_and_random_variables() {
        let class = construct::noisy_synapse();
        let node = write(&class);

        let constant = node.child(tag::CONSTANT).expect("constant should be written");
        assert_eq!(constant.text(), Some("2.5"));
        assert_eq!(constant.attribute(attr::UNITS), Some("nS"));
        let on_event = node
            .child(tag::REGIME)
            .and_then(|regime| regime.child(tag::ON_EVENT))
            .expect("transition should be written");
        assert_eq!(on_event.attribute(attr::TARGET_REGIME), Some("default"));

        assert_eq!(round_trip(&class), class);
    }

    #[test]
    fn round_trip_hierarchy() {
        let class = construct::network();
        let node = write(&class);

        let sub_node = node.child(tag::SUB_NODE).expect("sub-node should be written");
        assert_eq!(sub_node.attribute(attr::NAMESPACE), Some("pre"));
        assert!(sub_node.child(tag::DYNAMICS).is_some());
        let connection = node
            .child(tag::PORT_CONNECTION)
            .expect("connection should be written");
        assert_eq!(connection.attribute(attr::SEND_PORT), Some("pre.spike"));

        assert_eq!(round_trip(&class), class);
    }

    #[test]
    fn round_trip_loaded_document() {
        let class = load_dynamics(
            &construct::serial_network(),
            &StandardDimensions,
            &StandardBuiltins,
        )
        .expect("document should load");
        assert_eq!(round_trip(&class), class);
    }
}
