//! Inference of the interface implied by a class's dynamics.

use indexmap::{IndexMap, IndexSet};
use nineml_expr::BuiltinRef;

use crate::{
    alias::Alias,
    error::{InterfaceCategory, InterfaceDifference},
    identifier::Identifier,
    regime::Regime,
    transition::TransitionRef,
};

/// The interface implied by the dynamics of a class.
#[derive(Debug, Default)]
pub(super) struct InferredInterface {
    pub parameters: IndexSet<Identifier>,
    pub state_variables: IndexSet<Identifier>,
    pub event_send_ports: IndexSet<Identifier>,
    pub event_receive_ports: IndexSet<Identifier>,
}

/// Names that are bound by something other than a parameter.
pub(super) struct Bound<'a> {
    pub aliases: &'a IndexMap<Identifier, Alias>,
    pub declared_state_variables: Option<&'a [Identifier]>,
    pub others: IndexSet<&'a str>,
}

impl Bound<'_> {
    fn contains(&self, name: &str, inferred_state_variables: &IndexSet<Identifier>) -> bool {
        self.aliases.contains_key(name)
            || inferred_state_variables.contains(name)
            || self
                .declared_state_variables
                .is_some_and(|declared| declared.iter().any(|sv| sv.as_str() == name))
            || self.others.contains(name)
    }
}

/// Infers state variables, event ports and parameters from the aliases and
/// regimes of a class.
///
/// State variables are the left-hand sides of time derivatives and state
/// assignments. Event send ports are the ports named by output events and
/// event receive ports are the source ports of event transitions. Every
/// free atom that is neither builtin nor bound otherwise is a parameter.
pub(super) fn infer_interface(
    aliases: &IndexMap<Identifier, Alias>,
    regimes: &IndexMap<Identifier, Regime>,
    bound: &Bound<'_>,
    builtins: &impl BuiltinRef,
) -> InferredInterface {
    let mut inferred = InferredInterface::default();

    for regime in regimes.values() {
        for time_derivative in regime.time_derivatives() {
            inferred
                .state_variables
                .insert(time_derivative.variable().clone());
        }
        for transition in regime.transitions() {
            if let TransitionRef::OnEvent(on_event) = transition {
                inferred
                    .event_receive_ports
                    .insert(on_event.src_port().clone());
            }
            for assignment in transition.transition().state_assignments() {
                inferred
                    .state_variables
                    .insert(assignment.variable().clone());
            }
            for event in transition.transition().output_events() {
                inferred.event_send_ports.insert(event.port().clone());
            }
        }
    }

    let expressions = aliases
        .values()
        .map(Alias::rhs)
        .chain(regimes.values().flat_map(Regime::expressions));

    for expr in expressions {
        for atom in expr.atoms() {
            if builtins.has_builtin_value(atom) || bound.contains(atom, &inferred.state_variables) {
                continue;
            }
            inferred.parameters.insert(Identifier::new(atom));
        }
    }

    inferred
}

/// Compares a declared name set against the inferred one. Returns `None` if
/// they agree.
pub(super) fn compare(
    category: InterfaceCategory,
    declared: &[Identifier],
    inferred: &IndexSet<Identifier>,
) -> Option<InterfaceDifference> {
    let declared_only: Vec<_> = declared
        .iter()
        .filter(|name| !inferred.contains(*name))
        .cloned()
        .collect();
    let inferred_only: Vec<_> = inferred
        .iter()
        .filter(|name| !declared.contains(name))
        .cloned()
        .collect();

    if declared_only.is_empty() && inferred_only.is_empty() {
        None
    } else {
        Some(InterfaceDifference::new(category, declared_only, inferred_only))
    }
}
