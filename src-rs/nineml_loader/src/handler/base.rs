use indexmap::IndexMap;
use nineml_ir::{
    Alias, AnalogReceivePort, AnalogReducePort, AnalogSendPort, Constant, DimensionRegistry,
    EventReceivePort, EventSendPort, Parameter, RandomVariable,
};

use super::{Element, dimension, math, name, number, required, unexpected};
use crate::{
    error::LoadError,
    node::SerialNode,
    tag::{self, attr},
};

pub(super) fn parameter<'n>(
    node: &'n SerialNode,
    registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::Parameter(Parameter::new(
        name(node)?,
        dimension(node, registry)?,
    )))
}

pub(super) fn analog_send_port<'n>(
    node: &'n SerialNode,
    registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::AnalogSendPort(AnalogSendPort::new(
        name(node)?,
        dimension(node, registry)?,
    )))
}

pub(super) fn analog_receive_port<'n>(
    node: &'n SerialNode,
    registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::AnalogReceivePort(AnalogReceivePort::new(
        name(node)?,
        dimension(node, registry)?,
    )))
}

pub(super) fn analog_reduce_port<'n>(
    node: &'n SerialNode,
    registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    let port = AnalogReducePort::new(
        name(node)?,
        dimension(node, registry)?,
        required(node, attr::OPERATOR)?,
    )?;
    Ok(Element::AnalogReducePort(port))
}

pub(super) fn event_send_port<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::EventSendPort(EventSendPort::new(name(node)?)))
}

pub(super) fn event_receive_port<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::EventReceivePort(EventReceivePort::new(name(node)?)))
}

pub(super) fn alias<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::Alias(Alias::new(name(node)?, math(node)?)))
}

/// The value is the text of the element, or its `value` attribute.
pub(super) fn constant<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    let value = node
        .text()
        .or_else(|| node.attribute(attr::VALUE))
        .ok_or_else(|| LoadError::missing_attribute(node.tag(), attr::VALUE))?;
    Ok(Element::Constant(Constant::new(
        name(node)?,
        number(node, value)?,
        node.attribute(attr::UNITS).unwrap_or_default(),
    )))
}

pub(super) fn random_variable<'n>(
    node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    let mut parameters = IndexMap::new();
    for child in node.children() {
        if child.tag() != tag::DISTRIBUTION_PARAMETER {
            return Err(unexpected(node, child, &[tag::DISTRIBUTION_PARAMETER]));
        }
        let value = required(child, attr::VALUE)?;
        parameters.insert(
            required(child, attr::NAME)?.to_string(),
            number(child, value)?,
        );
    }

    Ok(Element::RandomVariable(RandomVariable::new(
        name(node)?,
        required(node, attr::DISTRIBUTION)?,
        parameters,
        node.attribute(attr::UNITS).unwrap_or_default(),
    )))
}

pub(super) fn annotations<'n>(
    _node: &'n SerialNode,
    _registry: &dyn DimensionRegistry,
) -> Result<Element<'n>, LoadError> {
    Ok(Element::Ignored)
}
