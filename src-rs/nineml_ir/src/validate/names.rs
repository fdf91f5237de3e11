use std::collections::HashMap;

use nineml_expr::BuiltinRef;

use crate::{
    alias::{Alias, Constant, RandomVariable},
    class::DynamicsClass,
    error::IrError,
    identifier::Identifier,
    parameter::Parameter,
    port::{AnalogReducePort, AnalogReceivePort, AnalogSendPort, EventReceivePort, EventSendPort},
    regime::Regime,
    state::StateVariable,
    visit::{NodeKind, Visit},
};

/// Rejects names that are not valid identifiers.
pub(super) struct IdentifierValidator;

impl IdentifierValidator {
    fn check(kind: NodeKind, name: &Identifier) -> Result<(), IrError> {
        if name.is_valid() {
            Ok(())
        } else {
            Err(IrError::invalid_identifier(kind, name.as_str()))
        }
    }
}

impl Visit for IdentifierValidator {
    fn visit_class(&mut self, class: &DynamicsClass) -> Result<(), IrError> {
        Self::check(NodeKind::DynamicsClass, class.name())
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), IrError> {
        Self::check(NodeKind::Parameter, parameter.name())
    }

    fn visit_analog_send_port(&mut self, port: &AnalogSendPort) -> Result<(), IrError> {
        Self::check(NodeKind::AnalogSendPort, port.name())
    }

    fn visit_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Result<(), IrError> {
        Self::check(NodeKind::AnalogReceivePort, port.name())
    }

    fn visit_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Result<(), IrError> {
        Self::check(NodeKind::AnalogReducePort, port.name())
    }

    fn visit_event_send_port(&mut self, port: &EventSendPort) -> Result<(), IrError> {
        Self::check(NodeKind::EventSendPort, port.name())
    }

    fn visit_event_receive_port(&mut self, port: &EventReceivePort) -> Result<(), IrError> {
        Self::check(NodeKind::EventReceivePort, port.name())
    }

    fn visit_state_variable(&mut self, state_variable: &StateVariable) -> Result<(), IrError> {
        Self::check(NodeKind::StateVariable, state_variable.name())
    }

    fn visit_alias(&mut self, alias: &Alias) -> Result<(), IrError> {
        Self::check(NodeKind::Alias, alias.name())
    }

    fn visit_constant(&mut self, constant: &Constant) -> Result<(), IrError> {
        Self::check(NodeKind::Constant, constant.name())
    }

    fn visit_random_variable(&mut self, random_variable: &RandomVariable) -> Result<(), IrError> {
        Self::check(NodeKind::RandomVariable, random_variable.name())
    }

    fn visit_regime(&mut self, regime: &Regime) -> Result<(), IrError> {
        Self::check(NodeKind::Regime, regime.name())
    }

    fn visit_sub_node(
        &mut self,
        namespace: &Identifier,
        _sub_node: &DynamicsClass,
    ) -> Result<(), IrError> {
        Self::check(NodeKind::SubNode, namespace)
    }
}

/// Enforces the shared symbol namespace and the port namespace.
///
/// Parameters, analog receive and reduce ports, state variables, aliases,
/// constants and random variables are all referred to from expressions, so
/// their names must be distinct from each other and from the builtins.
/// Port names must be distinct across all port kinds.
pub(super) struct NamespaceValidator<'b, B: BuiltinRef> {
    builtins: &'b B,
    symbols: HashMap<Identifier, NodeKind>,
    ports: HashMap<Identifier, NodeKind>,
}

impl<'b, B: BuiltinRef> NamespaceValidator<'b, B> {
    pub(super) fn new(builtins: &'b B) -> Self {
        Self {
            builtins,
            symbols: HashMap::new(),
            ports: HashMap::new(),
        }
    }

    fn symbol(&mut self, kind: NodeKind, name: &Identifier) -> Result<(), IrError> {
        if self.builtins.is_reserved(name.as_str()) {
            return Err(IrError::invalid_identifier(kind, name.as_str()));
        }
        if self.symbols.insert(name.clone(), kind).is_some() {
            return Err(IrError::name_collision(kind, name.clone()));
        }
        Ok(())
    }

    fn port(&mut self, kind: NodeKind, name: &Identifier) -> Result<(), IrError> {
        if self.ports.insert(name.clone(), kind).is_some() {
            return Err(IrError::name_collision(kind, name.clone()));
        }
        Ok(())
    }
}

impl<B: BuiltinRef> Visit for NamespaceValidator<'_, B> {
    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), IrError> {
        self.symbol(NodeKind::Parameter, parameter.name())
    }

    fn visit_analog_send_port(&mut self, port: &AnalogSendPort) -> Result<(), IrError> {
        self.port(NodeKind::AnalogSendPort, port.name())
    }

    fn visit_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Result<(), IrError> {
        self.port(NodeKind::AnalogReceivePort, port.name())?;
        self.symbol(NodeKind::AnalogReceivePort, port.name())
    }

    fn visit_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Result<(), IrError> {
        self.port(NodeKind::AnalogReducePort, port.name())?;
        self.symbol(NodeKind::AnalogReducePort, port.name())
    }

    fn visit_event_send_port(&mut self, port: &EventSendPort) -> Result<(), IrError> {
        self.port(NodeKind::EventSendPort, port.name())
    }

    fn visit_event_receive_port(&mut self, port: &EventReceivePort) -> Result<(), IrError> {
        self.port(NodeKind::EventReceivePort, port.name())
    }

    fn visit_state_variable(&mut self, state_variable: &StateVariable) -> Result<(), IrError> {
        self.symbol(NodeKind::StateVariable, state_variable.name())
    }

    fn visit_alias(&mut self, alias: &Alias) -> Result<(), IrError> {
        self.symbol(NodeKind::Alias, alias.name())
    }

    fn visit_constant(&mut self, constant: &Constant) -> Result<(), IrError> {
        self.symbol(NodeKind::Constant, constant.name())
    }

    fn visit_random_variable(&mut self, random_variable: &RandomVariable) -> Result<(), IrError> {
        self.symbol(NodeKind::RandomVariable, random_variable.name())
    }
}
