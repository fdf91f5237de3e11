use crate::{
    class::DynamicsClass,
    error::IrError,
    identifier::Identifier,
    port::AnalogSendPort,
    regime::Regime,
    state::TimeDerivative,
    transition::{OnEvent, OutputEvent, StateAssignment, Trigger},
    visit::{NodeKind, Visit},
};

/// Checks that names used inside the dynamics refer to entities of the
/// right kind, and that triggers are boolean.
pub(super) struct ReferenceValidator<'a> {
    class: &'a DynamicsClass,
    regime: Option<Identifier>,
}

impl<'a> ReferenceValidator<'a> {
    pub(super) const fn new(class: &'a DynamicsClass) -> Self {
        Self {
            class,
            regime: None,
        }
    }

    fn state_variable(&self, kind: NodeKind, name: &Identifier) -> Result<(), IrError> {
        if self.class.state_variable(name.as_str()).is_some() {
            Ok(())
        } else {
            Err(IrError::invalid_reference(
                kind,
                name.clone(),
                "a state variable",
            ))
        }
    }
}

impl Visit for ReferenceValidator<'_> {
    fn visit_analog_send_port(&mut self, port: &AnalogSendPort) -> Result<(), IrError> {
        let name = port.name().as_str();
        if self.class.alias(name).is_some() || self.class.state_variable(name).is_some() {
            Ok(())
        } else {
            Err(IrError::invalid_reference(
                NodeKind::AnalogSendPort,
                port.name().clone(),
                "an alias or state variable",
            ))
        }
    }

    fn visit_regime(&mut self, regime: &Regime) -> Result<(), IrError> {
        self.regime = Some(regime.name().clone());
        Ok(())
    }

    fn leave_regime(&mut self, _regime: &Regime) -> Result<(), IrError> {
        self.regime = None;
        Ok(())
    }

    fn visit_time_derivative(&mut self, time_derivative: &TimeDerivative) -> Result<(), IrError> {
        self.state_variable(NodeKind::TimeDerivative, time_derivative.variable())
    }

    fn visit_state_assignment(&mut self, assignment: &StateAssignment) -> Result<(), IrError> {
        self.state_variable(NodeKind::StateAssignment, assignment.variable())
    }

    fn visit_on_event(&mut self, on_event: &OnEvent) -> Result<(), IrError> {
        if self.class.event_receive_port(on_event.src_port().as_str()).is_some() {
            Ok(())
        } else {
            Err(IrError::invalid_reference(
                NodeKind::OnEvent,
                on_event.src_port().clone(),
                "an event receive port",
            ))
        }
    }

    fn visit_output_event(&mut self, event: &OutputEvent) -> Result<(), IrError> {
        if self.class.event_send_port(event.port().as_str()).is_some() {
            Ok(())
        } else {
            Err(IrError::invalid_reference(
                NodeKind::OutputEvent,
                event.port().clone(),
                "an event send port",
            ))
        }
    }

    fn visit_trigger(&mut self, trigger: &Trigger) -> Result<(), IrError> {
        if trigger.rhs().is_boolean() {
            return Ok(());
        }
        let regime = self
            .regime
            .clone()
            .unwrap_or_else(|| self.class.name().clone());
        Err(IrError::non_boolean_trigger(regime, trigger.rhs().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use nineml_expr::StandardBuiltins;

    use crate::{
        class::DynamicsClass, dimension::Dimension, error::IrError, identifier::Identifier,
        port::AnalogSendPort, regime::Regime, transition::OnCondition, visit::NodeKind,
    };

    #[test]
    fn trigger_must_be_boolean() {
        let result = DynamicsClass::builder("A")
            .regime(
                Regime::builder("R1")
                    .time_derivative("dV/dt = 1")
                    .on_condition(OnCondition::builder("V + 1").assign("V = 0")),
            )
            .build(&StandardBuiltins);

        assert_eq!(
            result,
            Err(IrError::non_boolean_trigger(Identifier::new("R1"), "V + 1"))
        );
    }

    #[test]
    fn send_port_must_name_alias_or_state_variable() {
        let result = DynamicsClass::builder("A")
            .analog_send_port(AnalogSendPort::new("nothing", Dimension::dimensionless()))
            .build(&StandardBuiltins);

        assert_eq!(
            result,
            Err(IrError::invalid_reference(
                NodeKind::AnalogSendPort,
                Identifier::new("nothing"),
                "an alias or state variable",
            ))
        );
    }

    #[test]
    fn send_port_may_expose_an_alias() {
        let class = DynamicsClass::builder("A")
            .alias("I := g * 2")
            .analog_send_port(AnalogSendPort::new("I", Dimension::dimensionless()))
            .build(&StandardBuiltins);

        assert!(class.is_ok());
    }
}
