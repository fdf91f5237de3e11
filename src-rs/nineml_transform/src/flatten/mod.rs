//! Flattening a hierarchy of sub-nodes into a single class.
//!
//! Every sub-node is flattened first and then copied into the parent with
//! its namespace as a name prefix, so a port `V` of sub-node `cell` becomes
//! `cell_V`. Analog connections turn into aliases: a receive port is
//! defined as the sending quantity and a reduce port as the sum of all its
//! senders. Event connections are resolved when the regimes are merged
//! (see [`regimes`]).

mod regimes;

use indexmap::{IndexMap, map::Entry};
use nineml_expr::{BuiltinRef, Expr};
use nineml_ir::{
    Alias, DynamicsClass, DynamicsClassBuilder, Identifier, IrError, PortConnection, PortKind,
    ReferenceKind,
};
use tracing::{debug, trace};

use self::regimes::{Component, EventRoutes, merge_regimes};
use crate::clone::clone_class;

/// Returns a flat class equivalent to `class`. A flat class is returned as
/// an unchanged copy.
///
/// # Errors
///
/// Returns the structural errors construction would raise on the merged
/// class, for instance a name collision between merged regimes.
pub fn flatten(
    class: &DynamicsClass,
    builtins: &impl BuiltinRef,
) -> Result<DynamicsClass, IrError> {
    if class.is_flat() {
        return Ok(class.clone());
    }

    debug!(class = %class.name(), "flattening class");

    let excludes = [builtins.time_symbol()];
    let mut components = vec![Component::local(class)];
    for (namespace, sub_node) in class.sub_nodes() {
        let flat = flatten(sub_node, builtins)?;
        let prefix = format!("{namespace}_");
        let prefixed = clone_class(&flat, &prefix, &excludes, builtins)?;
        components.push(Component::sub_node(namespace.clone(), prefixed));
    }

    let wiring = Wiring::collect(class, &components)?;

    let mut builder = DynamicsClass::builder(class.name().clone());
    for component in &components {
        builder = add_component(builder, component.class(), &wiring);
    }
    for alias in wiring.aliases() {
        trace!(alias = %alias.name(), rhs = %alias.rhs(), "connection alias");
        builder = builder.alias(alias);
    }
    for regime in merge_regimes(&components, &wiring.events)? {
        builder = builder.regime(regime);
    }

    let draft = builder.clone().build(builtins)?;
    let flat = declare_interface(builder, &components, &draft).build(builtins)?;

    debug!(
        class = %flat.name(),
        regimes = flat.regime_count(),
        parameters = flat.parameters().count(),
        "flattened class"
    );
    Ok(flat)
}

/// How the ports of the components are joined.
struct Wiring {
    /// Connected receive and reduce ports and the terms they receive
    analog: IndexMap<Identifier, (PortKind, Vec<Expr>)>,
    events: EventRoutes,
}

impl Wiring {
    fn collect(class: &DynamicsClass, components: &[Component]) -> Result<Self, IrError> {
        let mut analog: IndexMap<Identifier, (PortKind, Vec<Expr>)> = IndexMap::new();
        let mut events = EventRoutes::default();

        for connection in class.port_connections() {
            let (_, sender_kind) = class.resolve_port(connection.sender())?;
            let (_, receiver_kind) = class.resolve_port(connection.receiver())?;
            let sender = connection.sender().flattened_name();
            let receiver = connection.receiver().flattened_name();

            if sender_kind.is_analog() {
                let terms = match analog.entry(receiver) {
                    Entry::Occupied(entry) => &mut entry.into_mut().1,
                    Entry::Vacant(entry) => {
                        let inner = inner_sum(entry.key(), receiver_kind, components);
                        &mut entry.insert((receiver_kind, inner)).1
                    }
                };
                terms.push(Expr::variable(sender.as_str()));
            } else {
                let component = receiving_component(connection, components)?;
                events.connect(sender, component, receiver);
            }
        }

        Ok(Self { analog, events })
    }

    fn is_analog_input(&self, name: &Identifier) -> bool {
        self.analog.contains_key(name)
    }

    fn is_connected_input(&self, name: &Identifier) -> bool {
        self.analog.contains_key(name) || self.events.is_connected_receiver(name)
    }

    /// Aliases standing in for the connected analog inputs.
    fn aliases(&self) -> impl Iterator<Item = Alias> + '_ {
        self.analog
            .iter()
            .filter_map(|(receiver, (kind, terms))| {
                let mut terms = terms.iter().cloned();
                let rhs = if *kind == PortKind::AnalogReduce {
                    Expr::sum(terms)
                } else {
                    terms.next()
                }?;
                Some(Alias::new(receiver.clone(), rhs))
            })
    }
}

/// The sum a reduce port inside a nested sub-node already receives there.
/// Flattening that sub-node turned the sum into an alias of the port's
/// name; senders connected from further out are added to it.
fn inner_sum(name: &Identifier, kind: PortKind, components: &[Component]) -> Vec<Expr> {
    if kind != PortKind::AnalogReduce {
        return Vec::new();
    }
    components
        .iter()
        .find_map(|component| component.class().alias(name.as_str()))
        .map(|alias| alias.rhs().clone())
        .into_iter()
        .collect()
}

fn receiving_component(
    connection: &PortConnection,
    components: &[Component],
) -> Result<usize, IrError> {
    let namespace = connection.receiver().namespace().first();
    components
        .iter()
        .position(|component| component.namespace() == namespace)
        .ok_or_else(|| {
            IrError::unresolved(
                ReferenceKind::SubNode,
                namespace.map_or("", Identifier::as_str),
                format!("port connection `{}`", connection.receiver()),
            )
        })
}

/// Adds everything but the regimes and the interface declarations of one
/// component. Connected inputs are left out, as are the aliases of nested
/// reduce ports that gain senders here.
fn add_component(
    mut builder: DynamicsClassBuilder,
    class: &DynamicsClass,
    wiring: &Wiring,
) -> DynamicsClassBuilder {
    for port in class.analog_send_ports() {
        builder = builder.analog_send_port(port.clone());
    }
    for port in class.analog_receive_ports() {
        if !wiring.is_connected_input(port.name()) {
            builder = builder.analog_receive_port(port.clone());
        }
    }
    for port in class.analog_reduce_ports() {
        if !wiring.is_connected_input(port.name()) {
            builder = builder.analog_reduce_port(port.clone());
        }
    }
    for alias in class.aliases().filter(|alias| !wiring.is_analog_input(alias.name())) {
        builder = builder.alias(alias.clone());
    }
    for constant in class.constants() {
        builder = builder.constant(constant.clone());
    }
    for random_variable in class.random_variables() {
        builder = builder.random_variable(random_variable.clone());
    }
    builder
}

/// Declares the parameters, state variables and event ports of the
/// components that the merged dynamics still use, keeping their
/// dimensions.
fn declare_interface(
    builder: DynamicsClassBuilder,
    components: &[Component],
    draft: &DynamicsClass,
) -> DynamicsClassBuilder {
    let classes = || components.iter().map(Component::class);
    let used = |name: &Identifier, present: bool| {
        if !present {
            trace!(name = %name, "dropping unused declaration");
        }
        present
    };

    builder
        .parameters(
            classes()
                .flat_map(DynamicsClass::parameters)
                .filter(|p| used(p.name(), draft.parameter(p.name().as_str()).is_some()))
                .cloned()
                .collect::<Vec<_>>(),
        )
        .state_variables(
            classes()
                .flat_map(DynamicsClass::state_variables)
                .filter(|sv| used(sv.name(), draft.state_variable(sv.name().as_str()).is_some()))
                .cloned()
                .collect::<Vec<_>>(),
        )
        .event_send_ports(
            classes()
                .flat_map(DynamicsClass::event_send_ports)
                .filter(|p| used(p.name(), draft.event_send_port(p.name().as_str()).is_some()))
                .cloned()
                .collect::<Vec<_>>(),
        )
        .event_receive_ports(
            classes()
                .flat_map(DynamicsClass::event_receive_ports)
                .filter(|p| {
                    used(p.name(), draft.event_receive_port(p.name().as_str()).is_some())
                })
                .cloned()
                .collect::<Vec<_>>(),
        )
}
