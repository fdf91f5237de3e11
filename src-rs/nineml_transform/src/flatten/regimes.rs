//! The regime cross product of a flattened class.
//!
//! Every component that owns regimes is one factor of the product, in
//! component order. A merged regime is named by joining the names of its
//! constituent regimes with `_`, and a combination of regimes is written as
//! a tuple with one regime position per factor.
//!
//! Each transition of a constituent regime becomes a transition of the
//! merged regime that moves only its own factor. When the transition emits
//! an event that is connected to an event receive port of another factor,
//! the matching event transition of that factor's current regime fires in
//! the same step: its assignments and output events are appended and its
//! target replaces that factor's slot. Chaining continues through the
//! newly emitted events, with every factor taking part at most once.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use nineml_ir::{DynamicsClass, Identifier, IrError, OnCondition, OnEvent, Regime, Transition};
use tracing::trace;

/// One part of a flattened class: the local dynamics of the parent, or a
/// flattened and prefixed sub-node.
#[derive(Debug)]
pub(super) struct Component {
    namespace: Option<Identifier>,
    class: DynamicsClass,
}

impl Component {
    pub(super) fn local(class: &DynamicsClass) -> Self {
        Self {
            namespace: None,
            class: class.clone(),
        }
    }

    pub(super) const fn sub_node(namespace: Identifier, class: DynamicsClass) -> Self {
        Self {
            namespace: Some(namespace),
            class,
        }
    }

    pub(super) const fn namespace(&self) -> Option<&Identifier> {
        self.namespace.as_ref()
    }

    pub(super) const fn class(&self) -> &DynamicsClass {
        &self.class
    }
}

/// Event connections between components, keyed by the prefixed name of the
/// sending port.
#[derive(Debug, Default)]
pub(super) struct EventRoutes {
    routes: IndexMap<Identifier, Vec<(usize, Identifier)>>,
    receivers: HashSet<Identifier>,
}

impl EventRoutes {
    pub(super) fn connect(&mut self, sender: Identifier, component: usize, receiver: Identifier) {
        self.receivers.insert(receiver.clone());
        self.routes
            .entry(sender)
            .or_default()
            .push((component, receiver));
    }

    pub(super) fn is_connected_receiver(&self, port: &Identifier) -> bool {
        self.receivers.contains(port)
    }

    fn targets(&self, sender: &Identifier) -> &[(usize, Identifier)] {
        self.routes
            .get(sender)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Builds one merged regime per combination of component regimes.
pub(super) fn merge_regimes(
    components: &[Component],
    routes: &EventRoutes,
) -> Result<Vec<Regime>, IrError> {
    let factors: Vec<usize> = components
        .iter()
        .enumerate()
        .filter(|(_, component)| component.class.regime_count() > 0)
        .map(|(index, _)| index)
        .collect();
    if factors.is_empty() {
        return Ok(Vec::new());
    }

    let product = Product {
        components,
        routes,
        factors,
    };
    product
        .combinations()
        .iter()
        .map(|combination| product.merge(combination))
        .collect()
}

struct Product<'a> {
    components: &'a [Component],
    routes: &'a EventRoutes,
    /// Component index of each factor
    factors: Vec<usize>,
}

impl<'a> Product<'a> {
    /// Enumerates the combinations with the first factor varying slowest.
    fn combinations(&self) -> Vec<Vec<usize>> {
        let sizes: Vec<usize> = self
            .factors
            .iter()
            .map(|&component| self.components[component].class.regime_count())
            .collect();

        let mut combinations = Vec::new();
        let mut current = vec![0; sizes.len()];
        loop {
            combinations.push(current.clone());

            let mut slot = sizes.len();
            loop {
                if slot == 0 {
                    return combinations;
                }
                slot -= 1;
                current[slot] += 1;
                if current[slot] < sizes[slot] {
                    break;
                }
                current[slot] = 0;
            }
        }
    }

    fn regime(&self, slot: usize, index: usize) -> Option<&'a Regime> {
        self.components[self.factors[slot]].class.regime_at(index)
    }

    fn slot_of(&self, component: usize) -> Option<usize> {
        self.factors.iter().position(|&factor| factor == component)
    }

    fn name(&self, combination: &[usize]) -> Identifier {
        let names: Vec<&str> = combination
            .iter()
            .enumerate()
            .filter_map(|(slot, &index)| self.regime(slot, index))
            .map(|regime| regime.name().as_str())
            .collect();
        Identifier::new(names.join("_"))
    }

    fn merge(&self, combination: &[usize]) -> Result<Regime, IrError> {
        let name = self.name(combination);
        trace!(regime = %name, "merging regime combination");

        let mut time_derivatives = Vec::new();
        let mut on_events = Vec::new();
        let mut on_conditions = Vec::new();

        for (slot, &index) in combination.iter().enumerate() {
            let Some(regime) = self.regime(slot, index) else {
                continue;
            };

            time_derivatives.extend(regime.time_derivatives().cloned());

            for on_event in regime.on_events() {
                if self.routes.is_connected_receiver(on_event.src_port()) {
                    continue;
                }
                let transition = self.chain(combination, slot, on_event.transition())?;
                on_events.push(OnEvent::new(on_event.src_port().clone(), transition));
            }

            for on_condition in regime.on_conditions() {
                let transition = self.chain(combination, slot, on_condition.transition())?;
                on_conditions.push(OnCondition::new(on_condition.trigger().clone(), transition));
            }
        }

        Regime::new(name, time_derivatives, on_events, on_conditions)
    }

    /// Merges `transition`, leaving the regime at `slot` of `source`, with
    /// every event transition its output events set off.
    fn chain(
        &self,
        source: &[usize],
        slot: usize,
        transition: &'a Transition,
    ) -> Result<Transition, IrError> {
        let mut target = source.to_vec();
        let mut fired = vec![false; source.len()];
        let mut state_assignments = Vec::new();
        let mut output_events = Vec::new();

        let mut queue = VecDeque::from([(slot, transition)]);
        fired[slot] = true;

        while let Some((slot, transition)) = queue.pop_front() {
            state_assignments.extend(transition.state_assignments().cloned());
            target[slot] = transition.target_regime().unwrap_or(source[slot]);

            for event in transition.output_events() {
                output_events.push(event.clone());

                for (component, receiver) in self.routes.targets(event.port()) {
                    let Some(receiving_slot) = self.slot_of(*component) else {
                        continue;
                    };
                    if fired[receiving_slot] {
                        continue;
                    }
                    let Some(regime) = self.regime(receiving_slot, source[receiving_slot]) else {
                        continue;
                    };
                    if let Some(on_event) = regime
                        .on_events()
                        .iter()
                        .find(|on_event| on_event.src_port() == receiver)
                    {
                        trace!(
                            sender = %event.port(),
                            receiver = %receiver,
                            regime = %regime.name(),
                            "chaining event transition"
                        );
                        fired[receiving_slot] = true;
                        queue.push_back((receiving_slot, on_event.transition()));
                    }
                }
            }
        }

        let target_regime = (target != source).then(|| self.name(&target));
        Transition::new(state_assignments, output_events, target_regime)
    }
}
