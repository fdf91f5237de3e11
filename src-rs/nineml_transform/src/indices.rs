//! Ordinal positions for code generation.

use nineml_ir::{
    Alias, AnalogReducePort, AnalogReceivePort, AnalogSendPort, Constant, DynamicsClass,
    EventReceivePort, EventSendPort, Identifier, IndexBook, IrError, NodeKind, OnCondition,
    OnEvent, OutputEvent, Parameter, PortConnection, RandomVariable, Regime, StateAssignment,
    StateVariable, TimeDerivative, Trigger, Visit, VisitMode, walk,
};
use tracing::debug;

/// Assigns positions to every named node in walk order.
///
/// The visitor is strict, so a node kind added to the walk without a
/// handler here is reported instead of silently skipped.
#[derive(Debug, Default)]
struct IndexAssigner {
    book: IndexBook,
}

impl IndexAssigner {
    fn assign(&mut self, kind: NodeKind, name: &Identifier) -> Result<(), IrError> {
        self.book.index_of(kind, name.as_str());
        Ok(())
    }
}

impl Visit for IndexAssigner {
    fn mode(&self) -> VisitMode {
        VisitMode::Strict
    }

    fn visit_class(&mut self, _class: &DynamicsClass) -> Result<(), IrError> {
        Ok(())
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), IrError> {
        self.assign(NodeKind::Parameter, parameter.name())
    }

    fn visit_analog_send_port(&mut self, port: &AnalogSendPort) -> Result<(), IrError> {
        self.assign(NodeKind::AnalogSendPort, port.name())
    }

    fn visit_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Result<(), IrError> {
        self.assign(NodeKind::AnalogReceivePort, port.name())
    }

    fn visit_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Result<(), IrError> {
        self.assign(NodeKind::AnalogReducePort, port.name())
    }

    fn visit_event_send_port(&mut self, port: &EventSendPort) -> Result<(), IrError> {
        self.assign(NodeKind::EventSendPort, port.name())
    }

    fn visit_event_receive_port(&mut self, port: &EventReceivePort) -> Result<(), IrError> {
        self.assign(NodeKind::EventReceivePort, port.name())
    }

    fn visit_state_variable(&mut self, state_variable: &StateVariable) -> Result<(), IrError> {
        self.assign(NodeKind::StateVariable, state_variable.name())
    }

    fn visit_alias(&mut self, alias: &Alias) -> Result<(), IrError> {
        self.assign(NodeKind::Alias, alias.name())
    }

    fn visit_constant(&mut self, constant: &Constant) -> Result<(), IrError> {
        self.assign(NodeKind::Constant, constant.name())
    }

    fn visit_random_variable(&mut self, random_variable: &RandomVariable) -> Result<(), IrError> {
        self.assign(NodeKind::RandomVariable, random_variable.name())
    }

    fn visit_regime(&mut self, regime: &Regime) -> Result<(), IrError> {
        self.assign(NodeKind::Regime, regime.name())
    }

    fn visit_time_derivative(&mut self, _time_derivative: &TimeDerivative) -> Result<(), IrError> {
        Ok(())
    }

    fn visit_on_event(&mut self, on_event: &OnEvent) -> Result<(), IrError> {
        self.assign(NodeKind::OnEvent, on_event.src_port())
    }

    fn visit_on_condition(&mut self, _on_condition: &OnCondition) -> Result<(), IrError> {
        Ok(())
    }

    fn visit_trigger(&mut self, _trigger: &Trigger) -> Result<(), IrError> {
        Ok(())
    }

    fn visit_state_assignment(&mut self, _assignment: &StateAssignment) -> Result<(), IrError> {
        Ok(())
    }

    fn visit_output_event(&mut self, event: &OutputEvent) -> Result<(), IrError> {
        self.assign(NodeKind::OutputEvent, event.port())
    }

    fn visit_sub_node(
        &mut self,
        _namespace: &Identifier,
        _sub_node: &DynamicsClass,
    ) -> Result<(), IrError> {
        Ok(())
    }

    fn visit_port_connection(&mut self, _connection: &PortConnection) -> Result<(), IrError> {
        Ok(())
    }
}

/// Recomputes the index book of `class`: dense, zero-based positions per
/// node kind, in walk order. Running it again on an unchanged class yields
/// the same positions.
///
/// # Errors
///
/// Returns [`IrError::StructuralPrecondition`] if `class` has sub-nodes.
pub fn assign_indices(class: &mut DynamicsClass) -> Result<(), IrError> {
    if !class.is_flat() {
        return Err(IrError::structural_precondition(
            "assign indices in",
            class.name().clone(),
        ));
    }

    let mut assigner = IndexAssigner::default();
    walk(&mut assigner, class)?;
    debug!(class = %class.name(), "assigned indices");
    class.set_indices(assigner.book);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::construct;

    #[test]
    fn indices_are_dense_and_ordered() {
        let mut class = construct::leaky_integrate_and_fire();
        assign_indices(&mut class).expect("class is flat");

        let parameters: Vec<_> = class
            .parameters()
            .map(|parameter| class.index_of(NodeKind::Parameter, parameter.name().as_str()))
            .collect();
        assert_eq!(
            parameters,
            (0..class.parameters().count()).map(Some).collect::<Vec<_>>()
        );
        assert_eq!(class.index_of(NodeKind::StateVariable, "V"), Some(0));
        assert_eq!(class.index_of(NodeKind::Regime, "subthreshold"), Some(0));
        assert_eq!(class.index_of(NodeKind::EventSendPort, "spike"), Some(0));
    }

    #[test]
    fn assignment_is_idempotent() {
        let mut class = construct::leaky_integrate_and_fire();
        assign_indices(&mut class).expect("class is flat");
        let first = class.indices().clone();

        assign_indices(&mut class).expect("class is flat");
        assert_eq!(class.indices(), &first);
    }

    #[test]
    fn requires_flat_class() {
        let mut class = construct::cell_and_synapse();
        assert!(matches!(
            assign_indices(&mut class),
            Err(IrError::StructuralPrecondition { .. })
        ));
    }
}
