//! Loading a component class from its serialized form.

use nineml_expr::BuiltinRef;
use nineml_ir::{DimensionRegistry, DynamicsClass, DynamicsClassBuilder, Identifier};
use tracing::{debug, trace};

use crate::{
    error::LoadError,
    handler::{Element, HandlerTable},
    node::SerialNode,
    tag::{self, attr},
};

/// Loads a dynamics class, including all of its sub-nodes, from a
/// `Dynamics` element.
///
/// Parameters, state variables and event ports are declared by their
/// elements; a category without any elements is inferred from the
/// dynamics instead.
///
/// # Errors
///
/// Returns a [`LoadError`] for malformed elements, and
/// [`LoadError::Ir`] if the loaded parts do not form a valid class.
pub fn load_dynamics(
    node: &SerialNode,
    registry: &impl DimensionRegistry,
    builtins: &impl BuiltinRef,
) -> Result<DynamicsClass, LoadError> {
    DynamicsLoader::new(registry, builtins).load(node)
}

/// Loads dynamics classes with a fixed dimension registry and builtin
/// table.
#[derive(Debug)]
pub struct DynamicsLoader<'a, R, B> {
    registry: &'a R,
    builtins: &'a B,
    handlers: HandlerTable,
}

impl<'a, R: DimensionRegistry, B: BuiltinRef> DynamicsLoader<'a, R, B> {
    /// Creates a loader accepting the elements of
    /// [`HandlerTable::dynamics`].
    #[must_use]
    pub fn new(registry: &'a R, builtins: &'a B) -> Self {
        Self {
            registry,
            builtins,
            handlers: HandlerTable::dynamics(),
        }
    }

    /// Loads one class. See [`load_dynamics`].
    ///
    /// # Errors
    ///
    /// See [`load_dynamics`].
    pub fn load(&self, node: &SerialNode) -> Result<DynamicsClass, LoadError> {
        if node.tag() != tag::DYNAMICS {
            return Err(LoadError::UnexpectedRoot {
                expected: tag::DYNAMICS,
                found: node.tag().to_string(),
            });
        }
        let name = node
            .attribute(attr::NAME)
            .ok_or_else(|| LoadError::missing_attribute(node.tag(), attr::NAME))?;
        debug!(class = name, "loading class");

        let mut builder = DynamicsClass::builder(name);
        for child in node.children() {
            let Some(handler) = self.handlers.get(child.tag()) else {
                return Err(LoadError::unexpected_element(
                    node.tag(),
                    child.tag(),
                    self.handlers.tags().collect(),
                ));
            };
            trace!(tag = child.tag(), "loading element");
            builder = self.add(builder, handler(child, self.registry)?)?;
        }

        let class = builder.build(self.builtins)?;
        debug!(
            class = %class.name(),
            regimes = class.regime_count(),
            sub_nodes = class.sub_nodes().count(),
            "loaded class"
        );
        Ok(class)
    }

    fn add(
        &self,
        builder: DynamicsClassBuilder,
        element: Element<'_>,
    ) -> Result<DynamicsClassBuilder, LoadError> {
        let builder = match element {
            Element::Parameter(parameter) => builder.parameter(parameter),
            Element::AnalogSendPort(port) => builder.analog_send_port(port),
            Element::AnalogReceivePort(port) => builder.analog_receive_port(port),
            Element::AnalogReducePort(port) => builder.analog_reduce_port(port),
            Element::EventSendPort(port) => builder.event_send_port(port),
            Element::EventReceivePort(port) => builder.event_receive_port(port),
            Element::Alias(alias) => builder.alias(alias),
            Element::Constant(constant) => builder.constant(constant),
            Element::RandomVariable(random_variable) => builder.random_variable(random_variable),
            Element::StateVariable(state_variable) => builder.state_variable(state_variable),
            Element::Regime(regime) => builder.regime(regime),
            Element::SubNode(namespace, node) => {
                trace!(namespace = %namespace, "loading sub-node");
                builder.sub_node(namespace, self.load(node)?)
            }
            Element::PortConnection(connection) => builder.port_connection(connection),
            Element::Ignored => builder,
        };
        Ok(builder)
    }
}

/// Returns the class name a `Dynamics` element declares, without loading
/// it.
#[must_use]
pub fn class_name(node: &SerialNode) -> Option<Identifier> {
    (node.tag() == tag::DYNAMICS)
        .then(|| node.attribute(attr::NAME))
        .flatten()
        .map(Identifier::new)
}

#[cfg(test)]
mod tests {
    use nineml_expr::StandardBuiltins;
    use nineml_ir::{
        InterfaceCategory, IrError, PortKind, ReferenceKind, StandardDimensions,
    };

    use super::*;
    use crate::test::construct;

    fn load(node: &SerialNode) -> Result<DynamicsClass, LoadError> {
        load_dynamics(node, &StandardDimensions, &StandardBuiltins)
    }

    #[test]
    fn load_leaky_cell() {
        let class = load(&construct::serial_leaky_cell()).expect("class should load");

        assert_eq!(class.name().as_str(), "LeakyCell");
        let tau = class.parameter("tau").expect("parameter should exist");
        assert_eq!(tau.dimension().name(), "time");
        assert_eq!(class.port_kind("I_syn"), Some(PortKind::AnalogReduce));
        assert_eq!(class.port_kind("V"), Some(PortKind::AnalogSend));
        assert!(class.state_variable("V").is_some());
        assert_eq!(class.regime_count(), 2);

        let subthreshold = class.regime("subthreshold").expect("regime should exist");
        assert_eq!(
            subthreshold
                .time_derivative("V")
                .map(|derivative| derivative.rhs().to_string()),
            Some("(E - V) / tau + I_syn / C".to_string())
        );
        let [spike] = subthreshold.on_conditions() else {
            panic!("expected one condition transition");
        };
        assert_eq!(spike.trigger().rhs().to_string(), "V > theta");
        assert_eq!(spike.transition().target_regime(), class.regime_index("refractory"));
        assert_eq!(spike.transition().output_events()[0].port().as_str(), "spike");
    }

    #[test]
    fn undeclared_categories_are_inferred() {
        let class = load(&construct::serial_leaky_cell()).expect("class should load");

        // no event port elements in the document
        assert!(class.event_send_port("spike").is_some());
        assert!(class.event_receive_ports().next().is_none());
    }

    #[test]
    fn constants_and_random_variables() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "Noisy")
            .with_child(
                SerialNode::new(tag::CONSTANT)
                    .with_attribute(attr::NAME, "g_max")
                    .with_attribute(attr::UNITS, "nS")
                    .with_text("2.5"),
            )
            .with_child(
                SerialNode::new(tag::RANDOM_VARIABLE)
                    .with_attribute(attr::NAME, "noise")
                    .with_attribute(attr::DISTRIBUTION, "normal")
                    .with_child(
                        SerialNode::new(tag::DISTRIBUTION_PARAMETER)
                            .with_attribute(attr::NAME, "variance")
                            .with_attribute(attr::VALUE, "0.25"),
                    ),
            )
            .with_child(construct::serial_alias("drive", "g_max * noise"))
            .with_child(SerialNode::new(tag::ANNOTATIONS).with_child(SerialNode::new("Author")));

        let class = load(&node).expect("class should load");

        let constant = class.constant("g_max").expect("constant should exist");
        assert!((constant.value() - 2.5).abs() < f64::EPSILON);
        assert_eq!(constant.units(), "nS");
        let random_variable = class.random_variable("noise").expect("random variable should exist");
        assert_eq!(random_variable.distribution(), "normal");
        assert_eq!(random_variable.parameters().get("variance"), Some(&0.25));
        assert!(class.parameters().next().is_none());
    }

    #[test]
    fn sub_nodes_and_connections() {
        let class = load(&construct::serial_network()).expect("class should load");

        let cell = class.sub_node("cell").expect("sub-node should exist");
        assert_eq!(cell.name().as_str(), "LeakyCell");
        assert_eq!(class.port_connections().len(), 1);
        assert_eq!(
            class.port_connections()[0].receiver().to_string(),
            "cell.I_syn"
        );
    }

    #[test]
    fn wrong_root_is_rejected() {
        let result = load(&SerialNode::new(tag::REGIME));
        assert_eq!(
            result,
            Err(LoadError::UnexpectedRoot {
                expected: tag::DYNAMICS,
                found: tag::REGIME.to_string(),
            })
        );
    }

    #[test]
    fn missing_attribute() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(SerialNode::new(tag::PARAMETER).with_attribute(attr::DIMENSION, "time"));
        assert_eq!(
            load(&node),
            Err(LoadError::missing_attribute(tag::PARAMETER, attr::NAME))
        );
    }

    #[test]
    fn unexpected_element_in_class() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(SerialNode::new(tag::TIME_DERIVATIVE));
        let Err(LoadError::UnexpectedElement {
            parent,
            tag: found,
            expected,
        }) = load(&node)
        else {
            panic!("expected an unexpected element error");
        };
        assert_eq!(parent, "Dynamics");
        assert_eq!(found, "TimeDerivative");
        assert!(expected.contains(&"Regime"));
    }

    #[test]
    fn unexpected_element_in_transition() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(
                SerialNode::new(tag::REGIME)
                    .with_attribute(attr::NAME, "R")
                    .with_child(
                        SerialNode::new(tag::ON_EVENT)
                            .with_attribute(attr::SRC_PORT, "input")
                            .with_child(SerialNode::new(tag::TRIGGER)),
                    ),
            );
        assert_eq!(
            load(&node),
            Err(LoadError::unexpected_element(
                tag::ON_EVENT,
                tag::TRIGGER,
                vec![tag::STATE_ASSIGNMENT, tag::OUTPUT_EVENT],
            ))
        );
    }

    #[test]
    fn invalid_number() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(
                SerialNode::new(tag::CONSTANT)
                    .with_attribute(attr::NAME, "c")
                    .with_text("1.5.2"),
            );
        assert_eq!(
            load(&node),
            Err(LoadError::invalid_number(tag::CONSTANT, "1.5.2"))
        );
    }

    #[test]
    fn unknown_dimension() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(
                SerialNode::new(tag::STATE_VARIABLE)
                    .with_attribute(attr::NAME, "x")
                    .with_attribute(attr::DIMENSION, "furlong"),
            );
        assert_eq!(
            load(&node),
            Err(LoadError::unknown_dimension(tag::STATE_VARIABLE, "furlong"))
        );
    }

    #[test]
    fn object_model_errors_are_wrapped() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(
                SerialNode::new(tag::PARAMETER).with_attribute(attr::NAME, "unused"),
            )
            .with_child(construct::serial_alias("x", "2 * y"));

        let Err(LoadError::Ir(IrError::InterfaceMismatch(mismatch))) = load(&node) else {
            panic!("expected an interface mismatch");
        };
        let [difference] = mismatch.differences() else {
            panic!("expected one difference");
        };
        assert_eq!(difference.category(), InterfaceCategory::Parameters);
        assert_eq!(difference.declared_only(), [Identifier::new("unused")]);
        assert_eq!(difference.inferred_only(), [Identifier::new("y")]);
    }

    #[test]
    fn unresolved_target_regime() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(
                SerialNode::new(tag::REGIME)
                    .with_attribute(attr::NAME, "R")
                    .with_child(
                        SerialNode::new(tag::ON_EVENT)
                            .with_attribute(attr::SRC_PORT, "input")
                            .with_attribute(attr::TARGET_REGIME, "missing"),
                    ),
            );
        let Err(LoadError::Ir(IrError::UnresolvedReference(reference))) = load(&node) else {
            panic!("expected an unresolved reference");
        };
        assert_eq!(reference.kind(), ReferenceKind::Regime);
        assert_eq!(reference.name(), "missing");
    }

    #[test]
    fn malformed_expression_is_a_parse_error() {
        let node = SerialNode::new(tag::DYNAMICS)
            .with_attribute(attr::NAME, "A")
            .with_child(construct::serial_alias("x", "(1 +"));
        assert!(matches!(
            load(&node),
            Err(LoadError::Ir(IrError::Parse { .. }))
        ));
    }

    #[test]
    fn class_name_peeks_at_the_root() {
        assert_eq!(
            class_name(&construct::serial_leaky_cell()),
            Some(Identifier::new("LeakyCell"))
        );
        assert_eq!(class_name(&SerialNode::new(tag::REGIME)), None);
    }
}
