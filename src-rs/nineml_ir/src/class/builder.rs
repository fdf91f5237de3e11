use indexmap::{IndexMap, IndexSet};
use nineml_expr::BuiltinRef;
use tracing::debug;

use super::{
    DynamicsClass,
    infer::{self, Bound},
    resolve::resolve_transitions,
};
use crate::{
    alias::{Alias, Constant, RandomVariable},
    connection::PortConnection,
    error::{InterfaceCategory, InterfaceDifference, InterfaceMismatch, IrError},
    identifier::Identifier,
    index::IndexBook,
    into_node::IntoNode,
    parameter::Parameter,
    port::{AnalogReducePort, AnalogReceivePort, AnalogSendPort, EventReceivePort, EventSendPort},
    regime::Regime,
    state::StateVariable,
    validate,
    visit::NodeKind,
};

/// Builds a [`DynamicsClass`], remembering the first error encountered.
///
/// Parameters, state variables and event ports may be declared or left for
/// the builder to infer. A category counts as declared as soon as one
/// element of it is added, or when it is set as a whole (possibly empty);
/// a declared category must then match the inferred one exactly.
#[derive(Debug, Clone)]
pub struct DynamicsClassBuilder {
    name: Identifier,
    parameters: Option<Vec<Parameter>>,
    state_variables: Option<Vec<StateVariable>>,
    event_send_ports: Option<Vec<EventSendPort>>,
    event_receive_ports: Option<Vec<EventReceivePort>>,
    analog_send_ports: Vec<AnalogSendPort>,
    analog_receive_ports: Vec<AnalogReceivePort>,
    analog_reduce_ports: Vec<AnalogReducePort>,
    aliases: Vec<Alias>,
    constants: Vec<Constant>,
    random_variables: Vec<RandomVariable>,
    regimes: Vec<Regime>,
    sub_nodes: Vec<(Identifier, DynamicsClass)>,
    port_connections: Vec<PortConnection>,
    indices: IndexBook,
    error: Option<IrError>,
}

impl DynamicsClassBuilder {
    pub(super) fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            parameters: None,
            state_variables: None,
            event_send_ports: None,
            event_receive_ports: None,
            analog_send_ports: Vec::new(),
            analog_receive_ports: Vec::new(),
            analog_reduce_ports: Vec::new(),
            aliases: Vec::new(),
            constants: Vec::new(),
            random_variables: Vec::new(),
            regimes: Vec::new(),
            sub_nodes: Vec::new(),
            port_connections: Vec::new(),
            indices: IndexBook::new(),
            error: None,
        }
    }

    fn record<T>(&mut self, node: Result<T, IrError>, nodes: impl FnOnce(&mut Self) -> &mut Vec<T>) {
        match node {
            Ok(node) => nodes(self).push(node),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }

    /// Declares a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: impl IntoNode<Parameter>) -> Self {
        self.record(parameter.into_node(), |builder| {
            builder.parameters.get_or_insert_with(Vec::new)
        });
        self
    }

    /// Declares the complete parameter list.
    #[must_use]
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters = Some(parameters.into_iter().collect());
        self
    }

    /// Declares a state variable.
    #[must_use]
    pub fn state_variable(mut self, state_variable: impl IntoNode<StateVariable>) -> Self {
        self.record(state_variable.into_node(), |builder| {
            builder.state_variables.get_or_insert_with(Vec::new)
        });
        self
    }

    /// Declares the complete state variable list.
    #[must_use]
    pub fn state_variables(
        mut self,
        state_variables: impl IntoIterator<Item = StateVariable>,
    ) -> Self {
        self.state_variables = Some(state_variables.into_iter().collect());
        self
    }

    /// Declares an event send port.
    #[must_use]
    pub fn event_send_port(mut self, port: impl IntoNode<EventSendPort>) -> Self {
        self.record(port.into_node(), |builder| {
            builder.event_send_ports.get_or_insert_with(Vec::new)
        });
        self
    }

    /// Declares the complete event send port list.
    #[must_use]
    pub fn event_send_ports(mut self, ports: impl IntoIterator<Item = EventSendPort>) -> Self {
        self.event_send_ports = Some(ports.into_iter().collect());
        self
    }

    /// Declares an event receive port.
    #[must_use]
    pub fn event_receive_port(mut self, port: impl IntoNode<EventReceivePort>) -> Self {
        self.record(port.into_node(), |builder| {
            builder.event_receive_ports.get_or_insert_with(Vec::new)
        });
        self
    }

    /// Declares the complete event receive port list.
    #[must_use]
    pub fn event_receive_ports(
        mut self,
        ports: impl IntoIterator<Item = EventReceivePort>,
    ) -> Self {
        self.event_receive_ports = Some(ports.into_iter().collect());
        self
    }

    /// Declares an analog send port.
    #[must_use]
    pub fn analog_send_port(mut self, port: impl IntoNode<AnalogSendPort>) -> Self {
        self.record(port.into_node(), |builder| &mut builder.analog_send_ports);
        self
    }

    /// Declares an analog receive port.
    #[must_use]
    pub fn analog_receive_port(mut self, port: impl IntoNode<AnalogReceivePort>) -> Self {
        self.record(port.into_node(), |builder| &mut builder.analog_receive_ports);
        self
    }

    /// Declares an analog reduce port.
    #[must_use]
    pub fn analog_reduce_port(mut self, port: impl IntoNode<AnalogReducePort>) -> Self {
        self.record(port.into_node(), |builder| &mut builder.analog_reduce_ports);
        self
    }

    /// Adds an alias.
    #[must_use]
    pub fn alias(mut self, alias: impl IntoNode<Alias>) -> Self {
        self.record(alias.into_node(), |builder| &mut builder.aliases);
        self
    }

    /// Adds a constant.
    #[must_use]
    pub fn constant(mut self, constant: impl IntoNode<Constant>) -> Self {
        self.record(constant.into_node(), |builder| &mut builder.constants);
        self
    }

    /// Adds a random variable.
    #[must_use]
    pub fn random_variable(mut self, random_variable: impl IntoNode<RandomVariable>) -> Self {
        self.record(random_variable.into_node(), |builder| {
            &mut builder.random_variables
        });
        self
    }

    /// Adds a regime. Regimes keep the order in which they are added.
    #[must_use]
    pub fn regime(mut self, regime: impl IntoNode<Regime>) -> Self {
        self.record(regime.into_node(), |builder| &mut builder.regimes);
        self
    }

    /// Adds a sub-node under the given namespace.
    #[must_use]
    pub fn sub_node(mut self, namespace: impl Into<Identifier>, class: DynamicsClass) -> Self {
        self.sub_nodes.push((namespace.into(), class));
        self
    }

    /// Connects two ports of sub-nodes.
    #[must_use]
    pub fn port_connection(mut self, connection: impl IntoNode<PortConnection>) -> Self {
        self.record(connection.into_node(), |builder| {
            &mut builder.port_connections
        });
        self
    }

    /// Sets the index book of the class.
    #[must_use]
    pub fn indices(mut self, indices: IndexBook) -> Self {
        self.indices = indices;
        self
    }

    /// Builds the class.
    ///
    /// Construction runs in order: collision checks within each name scope,
    /// interface inference and comparison with the declared interface,
    /// resolution of transition targets, and finally validation.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while adding parts, otherwise the
    /// first error raised by the stages above.
    pub fn build(self, builtins: &impl BuiltinRef) -> Result<DynamicsClass, IrError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let aliases = unique(self.aliases, NodeKind::Alias, Alias::name)?;
        let constants = unique(self.constants, NodeKind::Constant, Constant::name)?;
        let random_variables = unique(
            self.random_variables,
            NodeKind::RandomVariable,
            RandomVariable::name,
        )?;
        let analog_send_ports = unique(
            self.analog_send_ports,
            NodeKind::AnalogSendPort,
            AnalogSendPort::name,
        )?;
        let analog_receive_ports = unique(
            self.analog_receive_ports,
            NodeKind::AnalogReceivePort,
            AnalogReceivePort::name,
        )?;
        let analog_reduce_ports = unique(
            self.analog_reduce_ports,
            NodeKind::AnalogReducePort,
            AnalogReducePort::name,
        )?;
        let mut regimes = unique(self.regimes, NodeKind::Regime, Regime::name)?;

        let time_symbol = builtins.time_symbol();
        let declared_parameters = self
            .parameters
            .map(|parameters| {
                let parameters = parameters
                    .into_iter()
                    .filter(|parameter| parameter.name().as_str() != time_symbol)
                    .collect();
                unique(parameters, NodeKind::Parameter, Parameter::name)
            })
            .transpose()?;
        let declared_state_variables = self
            .state_variables
            .map(|svs| unique(svs, NodeKind::StateVariable, StateVariable::name))
            .transpose()?;
        let declared_event_send_ports = self
            .event_send_ports
            .map(|ports| unique(ports, NodeKind::EventSendPort, EventSendPort::name))
            .transpose()?;
        let declared_event_receive_ports = self
            .event_receive_ports
            .map(|ports| unique(ports, NodeKind::EventReceivePort, EventReceivePort::name))
            .transpose()?;

        let mut sub_nodes = IndexMap::with_capacity(self.sub_nodes.len());
        for (namespace, class) in self.sub_nodes {
            if sub_nodes.contains_key(&namespace) {
                return Err(IrError::name_collision(NodeKind::SubNode, namespace));
            }
            sub_nodes.insert(namespace, class);
        }

        let declared_state_variable_names: Option<Vec<Identifier>> = declared_state_variables
            .as_ref()
            .map(|svs| svs.keys().cloned().collect());
        let bound = Bound {
            aliases: &aliases,
            declared_state_variables: declared_state_variable_names.as_deref(),
            others: constants
                .keys()
                .chain(random_variables.keys())
                .chain(analog_receive_ports.keys())
                .chain(analog_reduce_ports.keys())
                .map(Identifier::as_str)
                .collect::<IndexSet<_>>(),
        };
        let inferred = infer::infer_interface(&aliases, &regimes, &bound, builtins);

        let mut differences = Vec::new();
        let parameters = reconcile(
            InterfaceCategory::Parameters,
            declared_parameters,
            &inferred.parameters,
            Parameter::dimensionless,
            &mut differences,
        );
        let state_variables = reconcile(
            InterfaceCategory::StateVariables,
            declared_state_variables,
            &inferred.state_variables,
            StateVariable::dimensionless,
            &mut differences,
        );
        let event_send_ports = reconcile(
            InterfaceCategory::EventSendPorts,
            declared_event_send_ports,
            &inferred.event_send_ports,
            EventSendPort::new,
            &mut differences,
        );
        let event_receive_ports = reconcile(
            InterfaceCategory::EventReceivePorts,
            declared_event_receive_ports,
            &inferred.event_receive_ports,
            EventReceivePort::new,
            &mut differences,
        );
        if !differences.is_empty() {
            return Err(InterfaceMismatch::new(self.name, differences).into());
        }

        resolve_transitions(&mut regimes)?;

        let class = DynamicsClass {
            name: self.name,
            parameters,
            analog_send_ports,
            analog_receive_ports,
            analog_reduce_ports,
            event_send_ports,
            event_receive_ports,
            state_variables,
            aliases,
            constants,
            random_variables,
            regimes,
            sub_nodes,
            port_connections: self.port_connections,
            indices: self.indices,
        };

        validate::validate(&class, builtins)?;

        debug!(
            class = %class.name,
            parameters = class.parameters.len(),
            state_variables = class.state_variables.len(),
            regimes = class.regimes.len(),
            sub_nodes = class.sub_nodes.len(),
            "built dynamics class"
        );

        Ok(class)
    }
}

fn unique<T>(
    nodes: Vec<T>,
    kind: NodeKind,
    name: impl Fn(&T) -> &Identifier,
) -> Result<IndexMap<Identifier, T>, IrError> {
    let mut unique = IndexMap::with_capacity(nodes.len());
    for node in nodes {
        let key = name(&node).clone();
        if unique.contains_key(&key) {
            return Err(IrError::name_collision(kind, key));
        }
        unique.insert(key, node);
    }
    Ok(unique)
}

/// Returns the declared nodes if present, recording any disagreement with
/// the inferred names, or else creates one node per inferred name.
fn reconcile<T>(
    category: InterfaceCategory,
    declared: Option<IndexMap<Identifier, T>>,
    inferred: &IndexSet<Identifier>,
    create: impl Fn(Identifier) -> T,
    differences: &mut Vec<InterfaceDifference>,
) -> IndexMap<Identifier, T> {
    match declared {
        Some(declared) => {
            let names: Vec<Identifier> = declared.keys().cloned().collect();
            if let Some(difference) = infer::compare(category, &names, inferred) {
                differences.push(difference);
            }
            declared
        }
        None => inferred
            .iter()
            .map(|name| (name.clone(), create(name.clone())))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use nineml_expr::StandardBuiltins;

    use super::*;
    use crate::{dimension::Dimension, transition::OnCondition};

    #[test]
    fn first_recorded_error_wins() {
        let result = DynamicsClass::builder("A")
            .alias("broken := (1 +")
            .alias("also broken :=")
            .build(&StandardBuiltins);

        let Err(IrError::Parse { text, .. }) = result else {
            panic!("expected a parse error, got {result:?}");
        };
        assert_eq!(text, "broken := (1 +");
    }

    #[test]
    fn duplicate_alias_collides() {
        let result = DynamicsClass::builder("A")
            .alias("x := 1")
            .alias("x := 2")
            .build(&StandardBuiltins);

        assert_eq!(
            result,
            Err(IrError::name_collision(NodeKind::Alias, Identifier::new("x")))
        );
    }

    #[test]
    fn duplicate_regime_collides() {
        let result = DynamicsClass::builder("A")
            .regime(Regime::builder("R").time_derivative("dx/dt = 1"))
            .regime(Regime::builder("R").time_derivative("dx/dt = 2"))
            .build(&StandardBuiltins);

        assert_eq!(
            result,
            Err(IrError::name_collision(NodeKind::Regime, Identifier::new("R")))
        );
    }

    #[test]
    fn declared_empty_list_must_match() {
        let result = DynamicsClass::builder("A")
            .parameters([])
            .regime(Regime::builder("R").time_derivative("dx/dt = -x / tau"))
            .build(&StandardBuiltins);

        let Err(IrError::InterfaceMismatch(mismatch)) = result else {
            panic!("expected an interface mismatch, got {result:?}");
        };
        let difference = mismatch
            .difference(InterfaceCategory::Parameters)
            .expect("parameters should differ");
        assert!(difference.declared_only().is_empty());
        assert_eq!(difference.inferred_only(), [Identifier::new("tau")]);
    }

    #[test]
    fn declared_dimensions_are_kept() {
        let voltage = Dimension::new("voltage", [1, 2, -3, -1, 0, 0, 0]);
        let class = DynamicsClass::builder("A")
            .parameter(Parameter::new("E", voltage.clone()))
            .state_variable(StateVariable::new("V", voltage.clone()))
            .regime(Regime::builder("R").time_derivative("dV/dt = E - V"))
            .build(&StandardBuiltins)
            .expect("class should build");

        assert_eq!(class.parameter("E").map(Parameter::dimension), Some(&voltage));
        assert_eq!(
            class.state_variable("V").map(StateVariable::dimension),
            Some(&voltage)
        );
    }

    #[test]
    fn every_mismatched_category_is_reported() {
        let result = DynamicsClass::builder("A")
            .state_variable("W")
            .event_send_port("other")
            .regime(
                Regime::builder("R")
                    .time_derivative("dV/dt = 1")
                    .on_condition(OnCondition::builder("V > 1").emit("spike")),
            )
            .build(&StandardBuiltins);

        let Err(IrError::InterfaceMismatch(mismatch)) = result else {
            panic!("expected an interface mismatch, got {result:?}");
        };
        let categories: Vec<_> = mismatch
            .differences()
            .iter()
            .map(InterfaceDifference::category)
            .collect();
        assert_eq!(
            categories,
            [
                InterfaceCategory::StateVariables,
                InterfaceCategory::EventSendPorts
            ]
        );
    }
}
