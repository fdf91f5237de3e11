use indexmap::IndexMap;
use nineml_expr::Expr;

use crate::{
    error::IrError,
    identifier::Identifier,
    into_node::IntoNode,
    state::TimeDerivative,
    transition::{OnCondition, OnEvent, StateAssignment, Transition, TransitionRef},
    visit::NodeKind,
};

/// One mode of the dynamics state machine, with its own time derivatives
/// and outgoing transitions.
///
/// State variables without a time derivative in a regime are held constant
/// while that regime is active.
#[derive(Debug, Clone, PartialEq)]
pub struct Regime {
    name: Identifier,
    time_derivatives: IndexMap<Identifier, TimeDerivative>,
    on_events: Vec<OnEvent>,
    on_conditions: Vec<OnCondition>,
}

impl Regime {
    /// Creates a new regime.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::NameCollision`] if a state variable has more than
    /// one time derivative.
    pub fn new(
        name: impl Into<Identifier>,
        time_derivatives: Vec<TimeDerivative>,
        on_events: Vec<OnEvent>,
        on_conditions: Vec<OnCondition>,
    ) -> Result<Self, IrError> {
        let mut derivatives = IndexMap::with_capacity(time_derivatives.len());
        for time_derivative in time_derivatives {
            let variable = time_derivative.variable().clone();
            if derivatives
                .insert(variable.clone(), time_derivative)
                .is_some()
            {
                return Err(IrError::name_collision(NodeKind::TimeDerivative, variable));
            }
        }

        Ok(Self {
            name: name.into(),
            time_derivatives: derivatives,
            on_events,
            on_conditions,
        })
    }

    /// Starts building a regime.
    pub fn builder(name: impl Into<Identifier>) -> RegimeBuilder {
        RegimeBuilder {
            name: name.into(),
            time_derivatives: Vec::new(),
            on_events: Vec::new(),
            on_conditions: Vec::new(),
            error: None,
        }
    }

    /// Returns the name of the regime.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the time derivatives, in the order they were written.
    pub fn time_derivatives(&self) -> impl Iterator<Item = &TimeDerivative> {
        self.time_derivatives.values()
    }

    /// Returns the time derivative of the given state variable, if any.
    #[must_use]
    pub fn time_derivative(&self, variable: &str) -> Option<&TimeDerivative> {
        self.time_derivatives.get(variable)
    }

    /// Returns the event transitions.
    #[must_use]
    pub fn on_events(&self) -> &[OnEvent] {
        &self.on_events
    }

    /// Returns the condition transitions.
    #[must_use]
    pub fn on_conditions(&self) -> &[OnCondition] {
        &self.on_conditions
    }

    /// Returns every transition: event transitions first, then condition
    /// transitions.
    pub fn transitions(&self) -> impl Iterator<Item = TransitionRef<'_>> {
        self.on_events
            .iter()
            .map(TransitionRef::OnEvent)
            .chain(self.on_conditions.iter().map(TransitionRef::OnCondition))
    }

    /// Returns the expressions of the regime: time derivatives first, then
    /// for each transition its trigger and state assignments.
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        let time_derivatives = self.time_derivatives().map(TimeDerivative::rhs);
        let transitions = self.transitions().flat_map(|transition| {
            let trigger = match transition {
                TransitionRef::OnCondition(on_condition) => Some(on_condition.trigger().rhs()),
                TransitionRef::OnEvent(_) => None,
            };
            trigger.into_iter().chain(
                transition
                    .transition()
                    .state_assignments()
                    .map(StateAssignment::rhs),
            )
        });
        time_derivatives.chain(transitions)
    }

    pub(crate) fn transitions_mut(&mut self) -> impl Iterator<Item = &mut Transition> {
        self.on_events
            .iter_mut()
            .map(OnEvent::transition_mut)
            .chain(self.on_conditions.iter_mut().map(OnCondition::transition_mut))
    }
}

/// Builds a [`Regime`], remembering the first error encountered.
#[derive(Debug)]
pub struct RegimeBuilder {
    name: Identifier,
    time_derivatives: Vec<TimeDerivative>,
    on_events: Vec<OnEvent>,
    on_conditions: Vec<OnCondition>,
    error: Option<IrError>,
}

impl RegimeBuilder {
    fn record<T>(&mut self, node: Result<T, IrError>, nodes: impl FnOnce(&mut Self) -> &mut Vec<T>) {
        match node {
            Ok(node) => nodes(self).push(node),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }

    /// Adds a time derivative.
    #[must_use]
    pub fn time_derivative(mut self, time_derivative: impl IntoNode<TimeDerivative>) -> Self {
        self.record(time_derivative.into_node(), |builder| {
            &mut builder.time_derivatives
        });
        self
    }

    /// Adds an event transition.
    #[must_use]
    pub fn on_event(mut self, on_event: impl IntoNode<OnEvent>) -> Self {
        self.record(on_event.into_node(), |builder| &mut builder.on_events);
        self
    }

    /// Adds a condition transition.
    #[must_use]
    pub fn on_condition(mut self, on_condition: impl IntoNode<OnCondition>) -> Self {
        self.record(on_condition.into_node(), |builder| {
            &mut builder.on_conditions
        });
        self
    }

    /// Builds the regime.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding parts, or a name
    /// collision between time derivatives.
    pub fn build(self) -> Result<Regime, IrError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Regime::new(
            self.name,
            self.time_derivatives,
            self.on_events,
            self.on_conditions,
        )
    }
}

impl IntoNode<Regime> for Regime {
    fn into_node(self) -> Result<Regime, IrError> {
        Ok(self)
    }
}

impl IntoNode<Regime> for RegimeBuilder {
    fn into_node(self) -> Result<Regime, IrError> {
        self.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regime_builder() {
        let regime = Regime::builder("R1")
            .time_derivative("dSV1/dt = -SV1 / P2")
            .on_condition(OnCondition::builder("SV1 > P1").emit("emit"))
            .on_event(OnEvent::builder("reset").assign("SV1 = 0"))
            .build()
            .expect("regime should build");

        assert_eq!(regime.name().as_str(), "R1");
        assert!(regime.time_derivative("SV1").is_some());
        assert_eq!(regime.transitions().count(), 2);
        assert!(matches!(
            regime.transitions().next(),
            Some(TransitionRef::OnEvent(_))
        ));
    }

    #[test]
    fn duplicate_time_derivative() {
        let result = Regime::builder("R1")
            .time_derivative("dV/dt = 1")
            .time_derivative("dV/dt = 2")
            .build();
        let Err(IrError::NameCollision { kind, name }) = result else {
            panic!("expected a name collision, got {result:?}");
        };
        assert_eq!(kind, NodeKind::TimeDerivative);
        assert_eq!(name.as_str(), "V");
    }
}
