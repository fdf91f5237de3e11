use nineml_ir::{
    DimensionRegistry, Identifier, OnCondition, OnEvent, OutputEvent, PortConnection, Regime,
    StateAssignment, StateVariable, TimeDerivative, Transition, Trigger,
};

use super::{Element, dimension, math, name, required, unexpected};
use crate::{
    error::LoadError,
    node::SerialNode,
    tag::{self, attr},
};

pub(super) fn state_variable<'n>(
    node: &'n SerialNode,
    registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::StateVariable(StateVariable::new(
        name(node)?,
        dimension(node, registry)?,
    )))
}

pub(super) fn regime<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    const EXPECTED: &[&str] = &[tag::TIME_DERIVATIVE, tag::ON_EVENT, tag::ON_CONDITION];

    let mut time_derivatives = Vec::new();
    let mut on_events = Vec::new();
    let mut on_conditions = Vec::new();

    for child in node.children() {
        match child.tag() {
            tag::TIME_DERIVATIVE => time_derivatives.push(TimeDerivative::new(
                required(child, attr::VARIABLE)?,
                math(child)?,
            )),
            tag::ON_EVENT => on_events.push(on_event(child)?),
            tag::ON_CONDITION => on_conditions.push(on_condition(child)?),
            _ => return Err(unexpected(node, child, EXPECTED)),
        }
    }

    let regime = Regime::new(name(node)?, time_derivatives, on_events, on_conditions)?;
    Ok(Element::Regime(regime))
}

fn on_event(node: &SerialNode) -> Result<OnEvent, LoadError> {
    let src_port = required(node, attr::SRC_PORT)?;
    let transition = transition(node, &[tag::STATE_ASSIGNMENT, tag::OUTPUT_EVENT])?;
    Ok(OnEvent::new(src_port, transition))
}

fn on_condition(node: &SerialNode) -> Result<OnCondition, LoadError> {
    let trigger = node
        .child(tag::TRIGGER)
        .ok_or_else(|| LoadError::missing_child(node.tag(), tag::TRIGGER))?;
    let trigger = Trigger::new(math(trigger)?);
    let transition = transition(
        node,
        &[tag::TRIGGER, tag::STATE_ASSIGNMENT, tag::OUTPUT_EVENT],
    )?;
    Ok(OnCondition::new(trigger, transition))
}

/// Reads the state assignments, output events and target regime shared by
/// both kinds of transition. A missing `target_regime` makes a self-loop.
fn transition(node: &SerialNode, expected: &[&'static str]) -> Result<Transition, LoadError> {
    let mut state_assignments = Vec::new();
    let mut output_events = Vec::new();

    for child in node.children() {
        match child.tag() {
            tag::STATE_ASSIGNMENT => state_assignments.push(StateAssignment::new(
                required(child, attr::VARIABLE)?,
                math(child)?,
            )),
            tag::OUTPUT_EVENT => output_events.push(OutputEvent::new(required(child, attr::PORT)?)),
            tag::TRIGGER if expected.contains(&tag::TRIGGER) => {}
            _ => return Err(unexpected(node, child, expected)),
        }
    }

    let target = node.attribute(attr::TARGET_REGIME).map(Identifier::new);
    Transition::new(state_assignments, output_events, target).map_err(LoadError::from)
}

pub(super) fn sub_node<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    let namespace = Identifier::new(required(node, attr::NAMESPACE)?);
    let class = node
        .child(tag::DYNAMICS)
        .ok_or_else(|| LoadError::missing_child(node.tag(), tag::DYNAMICS))?;
    Ok(Element::SubNode(namespace, class))
}

pub(super) fn port_connection<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    let connection = PortConnection::parse(
        required(node, attr::SEND_PORT)?,
        required(node, attr::RECEIVE_PORT)?,
    )?;
    Ok(Element::PortConnection(connection))
}
