//! The edges of the regime state machine.

use indexmap::IndexMap;
use nineml_expr::Expr;

use crate::{
    error::IrError, identifier::Identifier, into_node::IntoNode, visit::NodeKind,
};

/// A boolean expression guarding an [`OnCondition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    rhs: Expr,
}

impl Trigger {
    /// Creates a new trigger.
    #[must_use]
    pub const fn new(rhs: Expr) -> Self {
        Self { rhs }
    }

    /// Parses a trigger expression.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::Parse`] if the text is malformed.
    pub fn parse(text: &str) -> Result<Self, IrError> {
        let rhs = nineml_expr::parse_expression(text).map_err(|error| IrError::parse(text, error))?;
        Ok(Self::new(rhs))
    }

    /// Returns the trigger expression.
    #[must_use]
    pub const fn rhs(&self) -> &Expr {
        &self.rhs
    }
}

impl IntoNode<Trigger> for &str {
    fn into_node(self) -> Result<Trigger, IrError> {
        Trigger::parse(self)
    }
}

/// An instantaneous update of a state variable performed by a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct StateAssignment {
    variable: Identifier,
    rhs: Expr,
}

impl StateAssignment {
    /// Creates a new state assignment.
    pub fn new(variable: impl Into<Identifier>, rhs: Expr) -> Self {
        Self {
            variable: variable.into(),
            rhs,
        }
    }

    /// Parses a state assignment written as `X = expr`.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::Parse`] if the text is malformed.
    pub fn parse(text: &str) -> Result<Self, IrError> {
        let equation =
            nineml_expr::parse_assignment(text).map_err(|error| IrError::parse(text, error))?;
        let (variable, rhs) = equation.into_parts();
        Ok(Self::new(variable, rhs))
    }

    /// Returns the state variable being assigned.
    #[must_use]
    pub const fn variable(&self) -> &Identifier {
        &self.variable
    }

    /// Returns the assigned expression.
    #[must_use]
    pub const fn rhs(&self) -> &Expr {
        &self.rhs
    }
}

impl IntoNode<StateAssignment> for &str {
    fn into_node(self) -> Result<StateAssignment, IrError> {
        StateAssignment::parse(self)
    }
}

/// An event emitted on an event send port when a transition fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    port: Identifier,
}

impl OutputEvent {
    /// Creates a new output event.
    pub fn new(port: impl Into<Identifier>) -> Self {
        Self { port: port.into() }
    }

    /// Returns the port the event is emitted on.
    #[must_use]
    pub const fn port(&self) -> &Identifier {
        &self.port
    }
}

impl IntoNode<OutputEvent> for &str {
    fn into_node(self) -> Result<OutputEvent, IrError> {
        Ok(OutputEvent::new(self))
    }
}

/// What happens when a transition fires: state assignments, output events
/// and the regime entered afterwards.
///
/// The target regime is written by name. After the owning class is built,
/// the transition also records the positions of its source and target
/// regimes within the class.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    state_assignments: IndexMap<Identifier, StateAssignment>,
    output_events: Vec<OutputEvent>,
    target_regime_name: Option<Identifier>,
    resolved: Option<(usize, usize)>,
}

impl Transition {
    /// Creates a new transition. A `target_regime_name` of `None` means the
    /// transition returns to the regime it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::NameCollision`] if two state assignments update
    /// the same state variable.
    pub fn new(
        state_assignments: Vec<StateAssignment>,
        output_events: Vec<OutputEvent>,
        target_regime_name: Option<Identifier>,
    ) -> Result<Self, IrError> {
        let mut assignments = IndexMap::with_capacity(state_assignments.len());
        for assignment in state_assignments {
            let variable = assignment.variable.clone();
            if assignments.insert(variable.clone(), assignment).is_some() {
                return Err(IrError::name_collision(NodeKind::StateAssignment, variable));
            }
        }

        Ok(Self {
            state_assignments: assignments,
            output_events,
            target_regime_name,
            resolved: None,
        })
    }

    /// Returns the state assignments in the order they were written.
    pub fn state_assignments(&self) -> impl Iterator<Item = &StateAssignment> {
        self.state_assignments.values()
    }

    /// Returns the assignment to the given state variable, if any.
    #[must_use]
    pub fn state_assignment(&self, variable: &str) -> Option<&StateAssignment> {
        self.state_assignments.get(variable)
    }

    /// Returns the output events.
    #[must_use]
    pub fn output_events(&self) -> &[OutputEvent] {
        &self.output_events
    }

    /// Returns the name of the target regime, or `None` for a self-loop.
    #[must_use]
    pub const fn target_regime_name(&self) -> Option<&Identifier> {
        self.target_regime_name.as_ref()
    }

    /// Returns the position of the source regime within the owning class.
    #[must_use]
    pub fn source_regime(&self) -> Option<usize> {
        self.resolved.map(|(source, _)| source)
    }

    /// Returns the position of the target regime within the owning class.
    #[must_use]
    pub fn target_regime(&self) -> Option<usize> {
        self.resolved.map(|(_, target)| target)
    }

    pub(crate) const fn resolve(&mut self, source: usize, target: usize) {
        self.resolved = Some((source, target));
    }
}

/// A transition fired by an event arriving on an event receive port.
#[derive(Debug, Clone, PartialEq)]
pub struct OnEvent {
    src_port: Identifier,
    transition: Transition,
}

/// A transition fired when its trigger becomes true.
#[derive(Debug, Clone, PartialEq)]
pub struct OnCondition {
    trigger: Trigger,
    transition: Transition,
}

/// Either kind of transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionRef<'a> {
    /// An event transition
    OnEvent(&'a OnEvent),
    /// A condition transition
    OnCondition(&'a OnCondition),
}

impl OnEvent {
    /// Creates a new event transition.
    pub fn new(src_port: impl Into<Identifier>, transition: Transition) -> Self {
        Self {
            src_port: src_port.into(),
            transition,
        }
    }

    /// Starts building an event transition on the given port.
    pub fn builder(src_port: impl Into<Identifier>) -> OnEventBuilder {
        OnEventBuilder {
            src_port: src_port.into(),
            parts: TransitionParts::default(),
        }
    }

    /// Returns the port whose events fire the transition.
    #[must_use]
    pub const fn src_port(&self) -> &Identifier {
        &self.src_port
    }

    /// Returns the transition body.
    #[must_use]
    pub const fn transition(&self) -> &Transition {
        &self.transition
    }

    pub(crate) const fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }
}

impl OnCondition {
    /// Creates a new condition transition.
    #[must_use]
    pub const fn new(trigger: Trigger, transition: Transition) -> Self {
        Self {
            trigger,
            transition,
        }
    }

    /// Starts building a condition transition with the given trigger.
    pub fn builder(trigger: impl IntoNode<Trigger>) -> OnConditionBuilder {
        OnConditionBuilder {
            trigger: trigger.into_node(),
            parts: TransitionParts::default(),
        }
    }

    /// Returns the trigger.
    #[must_use]
    pub const fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Returns the transition body.
    #[must_use]
    pub const fn transition(&self) -> &Transition {
        &self.transition
    }

    pub(crate) const fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }
}

impl<'a> TransitionRef<'a> {
    /// Returns the transition body.
    #[must_use]
    pub const fn transition(self) -> &'a Transition {
        match self {
            Self::OnEvent(on_event) => &on_event.transition,
            Self::OnCondition(on_condition) => &on_condition.transition,
        }
    }
}

#[derive(Debug, Default)]
struct TransitionParts {
    state_assignments: Vec<StateAssignment>,
    output_events: Vec<OutputEvent>,
    target_regime_name: Option<Identifier>,
    error: Option<IrError>,
}

impl TransitionParts {
    fn push_assignment(&mut self, assignment: Result<StateAssignment, IrError>) {
        match assignment {
            Ok(assignment) => self.state_assignments.push(assignment),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }

    fn push_output_event(&mut self, event: Result<OutputEvent, IrError>) {
        match event {
            Ok(event) => self.output_events.push(event),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }

    fn build(self) -> Result<Transition, IrError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Transition::new(
            self.state_assignments,
            self.output_events,
            self.target_regime_name,
        )
    }
}

/// Builds an [`OnEvent`], remembering the first error encountered.
#[derive(Debug)]
pub struct OnEventBuilder {
    src_port: Identifier,
    parts: TransitionParts,
}

impl OnEventBuilder {
    /// Adds a state assignment.
    #[must_use]
    pub fn assign(mut self, assignment: impl IntoNode<StateAssignment>) -> Self {
        self.parts.push_assignment(assignment.into_node());
        self
    }

    /// Adds an output event.
    #[must_use]
    pub fn emit(mut self, event: impl IntoNode<OutputEvent>) -> Self {
        self.parts.push_output_event(event.into_node());
        self
    }

    /// Sets the target regime.
    #[must_use]
    pub fn to(mut self, regime: impl Into<Identifier>) -> Self {
        self.parts.target_regime_name = Some(regime.into());
        self
    }

    /// Builds the transition.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding parts, or a name
    /// collision between state assignments.
    pub fn build(self) -> Result<OnEvent, IrError> {
        Ok(OnEvent::new(self.src_port, self.parts.build()?))
    }
}

/// Builds an [`OnCondition`], remembering the first error encountered.
#[derive(Debug)]
pub struct OnConditionBuilder {
    trigger: Result<Trigger, IrError>,
    parts: TransitionParts,
}

impl OnConditionBuilder {
    /// Adds a state assignment.
    #[must_use]
    pub fn assign(mut self, assignment: impl IntoNode<StateAssignment>) -> Self {
        self.parts.push_assignment(assignment.into_node());
        self
    }

    /// Adds an output event.
    #[must_use]
    pub fn emit(mut self, event: impl IntoNode<OutputEvent>) -> Self {
        self.parts.push_output_event(event.into_node());
        self
    }

    /// Sets the target regime.
    #[must_use]
    pub fn to(mut self, regime: impl Into<Identifier>) -> Self {
        self.parts.target_regime_name = Some(regime.into());
        self
    }

    /// Builds the transition.
    ///
    /// # Errors
    ///
    /// Returns the trigger parse error, the first error encountered while
    /// adding parts, or a name collision between state assignments.
    pub fn build(self) -> Result<OnCondition, IrError> {
        let trigger = self.trigger?;
        Ok(OnCondition::new(trigger, self.parts.build()?))
    }
}

impl IntoNode<OnEvent> for OnEvent {
    fn into_node(self) -> Result<OnEvent, IrError> {
        Ok(self)
    }
}

impl IntoNode<OnEvent> for OnEventBuilder {
    fn into_node(self) -> Result<OnEvent, IrError> {
        self.build()
    }
}

impl IntoNode<OnCondition> for OnCondition {
    fn into_node(self) -> Result<OnCondition, IrError> {
        Ok(self)
    }
}

impl IntoNode<OnCondition> for OnConditionBuilder {
    fn into_node(self) -> Result<OnCondition, IrError> {
        self.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_condition_builder() {
        let on_condition = OnCondition::builder("V > V_th")
            .assign("V = V_reset")
            .emit("spike")
            .to("refractory")
            .build()
            .expect("transition should build");

        assert!(on_condition.trigger().rhs().is_boolean());
        let transition = on_condition.transition();
        assert_eq!(
            transition.state_assignment("V").map(StateAssignment::rhs),
            Some(&Expr::variable("V_reset"))
        );
        assert_eq!(transition.output_events(), [OutputEvent::new("spike")]);
        assert_eq!(
            transition.target_regime_name().map(Identifier::as_str),
            Some("refractory")
        );
        assert_eq!(transition.target_regime(), None);
    }

    #[test]
    fn duplicate_assignment_is_a_collision() {
        let result = OnEvent::builder("spike_in")
            .assign("g = g + w")
            .assign("g = 0")
            .build();
        let Err(IrError::NameCollision { kind, name }) = result else {
            panic!("expected a name collision, got {result:?}");
        };
        assert_eq!(kind, NodeKind::StateAssignment);
        assert_eq!(name.as_str(), "g");
    }

    #[test]
    fn builder_reports_first_error() {
        let result = OnCondition::builder("V >")
            .assign("V = ")
            .build();
        let Err(IrError::Parse { text, .. }) = result else {
            panic!("expected a parse error, got {result:?}");
        };
        assert_eq!(text, "V >");
    }
}
