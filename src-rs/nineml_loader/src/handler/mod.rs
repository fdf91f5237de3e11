//! Dispatch from element tags to the code that loads them.
//!
//! The elements shared by every kind of component class are handled by the
//! base table. A component-class variant composes its own table by merging
//! the base table with its overrides, so the set of accepted elements is
//! always spelled out in one place.

mod base;
mod dynamics;

use std::fmt;

use indexmap::IndexMap;
use nineml_expr::Expr;
use nineml_ir::{
    Alias, AnalogReceivePort, AnalogReducePort, AnalogSendPort, Constant, Dimension,
    DimensionRegistry, EventReceivePort, EventSendPort, Identifier, IrError, Parameter,
    PortConnection, RandomVariable, Regime, StateVariable,
};

use crate::{
    error::LoadError,
    node::SerialNode,
    tag::{self, attr},
};

/// A class-level element, loaded but not yet added to a class.
#[derive(Debug)]
pub(crate) enum Element<'n> {
    Parameter(Parameter),
    AnalogSendPort(AnalogSendPort),
    AnalogReceivePort(AnalogReceivePort),
    AnalogReducePort(AnalogReducePort),
    EventSendPort(EventSendPort),
    EventReceivePort(EventReceivePort),
    Alias(Alias),
    Constant(Constant),
    RandomVariable(RandomVariable),
    StateVariable(StateVariable),
    Regime(Regime),
    /// A namespace and the serialized class nested under it
    SubNode(Identifier, &'n SerialNode),
    PortConnection(PortConnection),
    /// Content that carries no meaning for the object model
    Ignored,
}

pub(crate) type Handler =
    for<'n> fn(&'n SerialNode, &dyn DimensionRegistry) -> Result<Element<'n>, LoadError>;

/// The elements a loader accepts directly inside a component class, keyed
/// by tag.
#[derive(Clone)]
pub struct HandlerTable {
    handlers: IndexMap<&'static str, Handler>,
}

impl HandlerTable {
    fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    fn with(mut self, tag: &'static str, handler: Handler) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// The elements every kind of component class accepts: parameters,
    /// ports, aliases, constants, random variables and annotations.
    #[must_use]
    pub fn base() -> Self {
        Self::empty()
            .with(tag::PARAMETER, base::parameter)
            .with(tag::ANALOG_SEND_PORT, base::analog_send_port)
            .with(tag::ANALOG_RECEIVE_PORT, base::analog_receive_port)
            .with(tag::ANALOG_REDUCE_PORT, base::analog_reduce_port)
            .with(tag::EVENT_SEND_PORT, base::event_send_port)
            .with(tag::EVENT_RECEIVE_PORT, base::event_receive_port)
            .with(tag::ALIAS, base::alias)
            .with(tag::CONSTANT, base::constant)
            .with(tag::RANDOM_VARIABLE, base::random_variable)
            .with(tag::ANNOTATIONS, base::annotations)
    }

    fn dynamics_overrides() -> Self {
        Self::empty()
            .with(tag::STATE_VARIABLE, dynamics::state_variable)
            .with(tag::REGIME, dynamics::regime)
            .with(tag::SUB_NODE, dynamics::sub_node)
            .with(tag::PORT_CONNECTION, dynamics::port_connection)
    }

    /// The elements accepted by a dynamics class.
    #[must_use]
    pub fn dynamics() -> Self {
        Self::base().merge(Self::dynamics_overrides())
    }

    /// Adds every handler of `overrides`, replacing the handlers of this
    /// table for the same tags.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        self.handlers.extend(overrides.handlers);
        self
    }

    /// Returns true if the table handles elements with the given tag.
    #[must_use]
    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Returns the handled tags in the order they were added.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub(crate) fn get(&self, tag: &str) -> Option<Handler> {
        self.handlers.get(tag).copied()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags()).finish()
    }
}

fn required<'n>(node: &'n SerialNode, attribute: &'static str) -> Result<&'n str, LoadError> {
    node.attribute(attribute)
        .ok_or_else(|| LoadError::missing_attribute(node.tag(), attribute))
}

fn name(node: &SerialNode) -> Result<Identifier, LoadError> {
    required(node, attr::NAME).map(Identifier::new)
}

/// Reads the optional `dimension` attribute; an element without one is
/// dimensionless.
fn dimension(node: &SerialNode, registry: &dyn DimensionRegistry) -> Result<Dimension, LoadError> {
    match node.attribute(attr::DIMENSION) {
        None => Ok(Dimension::dimensionless()),
        Some(dimension) => registry
            .dimension(dimension)
            .ok_or_else(|| LoadError::unknown_dimension(node.tag(), dimension)),
    }
}

/// Parses the expression in the `MathInline` child of `node`.
fn math(node: &SerialNode) -> Result<Expr, LoadError> {
    let inline = node
        .child(tag::MATH_INLINE)
        .ok_or_else(|| LoadError::missing_child(node.tag(), tag::MATH_INLINE))?;
    let text = inline.text().unwrap_or_default();
    nineml_expr::parse_expression(text).map_err(|error| IrError::parse(text, error).into())
}

fn number(node: &SerialNode, text: &str) -> Result<f64, LoadError> {
    text.trim()
        .parse()
        .map_err(|_| LoadError::invalid_number(node.tag(), text))
}

fn unexpected(parent: &SerialNode, child: &SerialNode, expected: &[&'static str]) -> LoadError {
    LoadError::unexpected_element(parent.tag(), child.tag(), expected.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamics_table_extends_the_base_table() {
        let base = HandlerTable::base();
        let dynamics = HandlerTable::dynamics();

        assert!(!base.handles(tag::REGIME));
        assert!(dynamics.handles(tag::REGIME));
        assert!(dynamics.handles(tag::SUB_NODE));
        assert!(base.tags().all(|tag| dynamics.handles(tag)));
        assert_eq!(
            dynamics.tags().count(),
            base.tags().count() + HandlerTable::dynamics_overrides().tags().count()
        );
    }

    #[test]
    fn merge_replaces_handlers_for_the_same_tag() {
        let overrides = HandlerTable::empty().with(tag::ALIAS, base::annotations);
        let table = HandlerTable::base().merge(overrides);

        let handler = table.get(tag::ALIAS).expect("alias should be handled");
        let node = SerialNode::new(tag::ALIAS);
        let registry = nineml_ir::StandardDimensions;
        assert!(matches!(handler(&node, &registry), Ok(Element::Ignored)));
        assert_eq!(table.tags().count(), HandlerTable::base().tags().count());
    }

    #[test]
    fn math_reads_the_inline_child() {
        let node = SerialNode::new(tag::ALIAS)
            .with_child(SerialNode::new(tag::MATH_INLINE).with_text("g * (E - V)"));
        let expr = math(&node).expect("expression should parse");
        assert_eq!(expr.to_string(), "g * (E - V)");

        let missing = SerialNode::new(tag::ALIAS);
        assert_eq!(
            math(&missing),
            Err(LoadError::missing_child(tag::ALIAS, tag::MATH_INLINE))
        );
    }

    #[test]
    fn absent_dimension_is_dimensionless() {
        let registry = nineml_ir::StandardDimensions;
        let node = SerialNode::new(tag::PARAMETER).with_attribute(attr::NAME, "w");
        assert_eq!(dimension(&node, &registry), Ok(Dimension::dimensionless()));

        let node = node.with_attribute(attr::DIMENSION, "furlong");
        assert_eq!(
            dimension(&node, &registry),
            Err(LoadError::unknown_dimension(tag::PARAMETER, "furlong"))
        );
    }
}
