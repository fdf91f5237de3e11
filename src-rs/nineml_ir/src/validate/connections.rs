use std::collections::HashSet;

use crate::{
    class::DynamicsClass,
    connection::{PortAddress, PortConnection},
    error::{ConnectionMismatch, IrError},
    port::PortKind,
    visit::Visit,
};

/// Checks every port connection of a hierarchical class.
///
/// Both ends must name existing ports inside sub-nodes, the receiving port
/// must accept the kind of the sending port, analog ends must carry the
/// same dimension, and an analog receive port takes at most one connection,
/// counting the connections made inside the sub-nodes on its path.
pub(super) struct ConnectionValidator<'a> {
    class: &'a DynamicsClass,
    connected: HashSet<PortAddress>,
}

impl<'a> ConnectionValidator<'a> {
    pub(super) fn new(class: &'a DynamicsClass) -> Self {
        Self {
            class,
            connected: HashSet::new(),
        }
    }
}

impl Visit for ConnectionValidator<'_> {
    fn visit_port_connection(&mut self, connection: &PortConnection) -> Result<(), IrError> {
        let sender = connection.sender();
        let receiver = connection.receiver();
        let mismatch = |reason| {
            IrError::port_connection_mismatch(sender.clone(), receiver.clone(), reason)
        };

        if sender.namespace().is_empty() || receiver.namespace().is_empty() {
            return Err(mismatch(ConnectionMismatch::NotInSubNode));
        }

        let (sender_owner, sender_kind) = self.class.resolve_port(sender)?;
        let (receiver_owner, receiver_kind) = self.class.resolve_port(receiver)?;

        if !receiver_kind.accepts(sender_kind) {
            return Err(mismatch(ConnectionMismatch::Kind {
                sender: sender_kind,
                receiver: receiver_kind,
            }));
        }

        if sender_kind.is_analog() {
            let sender_dimension = sender_owner.analog_port_dimension(sender.port().as_str());
            let receiver_dimension = receiver_owner.analog_port_dimension(receiver.port().as_str());
            if sender_dimension != receiver_dimension {
                return Err(mismatch(ConnectionMismatch::Dimension {
                    sender: sender_dimension.map(ToString::to_string).unwrap_or_default(),
                    receiver: receiver_dimension.map(ToString::to_string).unwrap_or_default(),
                }));
            }
        }

        if receiver_kind == PortKind::AnalogReceive
            && (connected_within(self.class, receiver) || !self.connected.insert(receiver.clone()))
        {
            return Err(mismatch(ConnectionMismatch::AlreadyConnected));
        }

        Ok(())
    }
}

/// Returns true if a sub-node on the path to `address` already connects the
/// port itself.
fn connected_within(class: &DynamicsClass, address: &PortAddress) -> bool {
    let namespace = address.namespace();
    let mut owner = class;
    for (depth, segment) in namespace.iter().enumerate() {
        let Some(sub_node) = owner.sub_node(segment.as_str()) else {
            return false;
        };
        let relative = PortAddress::new(namespace[depth + 1..].to_vec(), address.port().clone());
        if sub_node
            .port_connections()
            .iter()
            .any(|connection| connection.receiver() == &relative)
        {
            return true;
        }
        owner = sub_node;
    }
    false
}

#[cfg(test)]
mod tests {
    use nineml_expr::StandardBuiltins;

    use crate::{
        class::DynamicsClass,
        dimension::Dimension,
        error::{ConnectionMismatch, IrError},
        port::PortKind,
        test::construct,
    };

    fn connect(sender: &str, receiver: &str) -> Result<DynamicsClass, IrError> {
        DynamicsClass::builder("Network")
            .sub_node("cell", construct::leaky_cell())
            .sub_node("syn", construct::exponential_synapse())
            .port_connection((sender, receiver))
            .build(&StandardBuiltins)
    }

    fn reason(result: Result<DynamicsClass, IrError>) -> ConnectionMismatch {
        match result {
            Err(IrError::PortConnectionMismatch { reason, .. }) => reason,
            other => panic!("expected a port connection mismatch, got {other:?}"),
        }
    }

    #[test]
    fn valid_connections() {
        assert!(connect("syn.I", "cell.I_syn").is_ok());
        assert!(connect("cell.spike", "syn.input").is_ok());
    }

    #[test]
    fn kind_mismatch() {
        assert_eq!(
            reason(connect("cell.spike", "cell.I_syn")),
            ConnectionMismatch::Kind {
                sender: PortKind::EventSend,
                receiver: PortKind::AnalogReduce,
            }
        );
        assert_eq!(
            reason(connect("cell.I_syn", "syn.I")),
            ConnectionMismatch::Kind {
                sender: PortKind::AnalogReduce,
                receiver: PortKind::AnalogSend,
            }
        );
    }

    #[test]
    fn endpoints_must_be_inside_sub_nodes() {
        assert_eq!(
            reason(connect("I", "cell.I_syn")),
            ConnectionMismatch::NotInSubNode
        );
    }

    #[test]
    fn missing_port_is_unresolved() {
        assert!(matches!(
            connect("syn.nothing", "cell.I_syn"),
            Err(IrError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn analog_receive_port_connects_once() {
        let voltage = Dimension::new("voltage", [1, 2, -3, -1, 0, 0, 0]);
        let result = DynamicsClass::builder("Network")
            .sub_node("a", construct::voltage_source("Va", voltage.clone()))
            .sub_node("b", construct::voltage_source("Vb", voltage.clone()))
            .sub_node("probe", construct::voltage_probe(voltage))
            .port_connection(("a.V", "probe.V_in"))
            .port_connection(("b.V", "probe.V_in"))
            .build(&StandardBuiltins);

        assert_eq!(reason(result), ConnectionMismatch::AlreadyConnected);
    }

    #[test]
    fn analog_receive_port_connected_inside_a_sub_node() {
        let voltage = Dimension::new("voltage", [1, 2, -3, -1, 0, 0, 0]);
        let recording = DynamicsClass::builder("Recording")
            .sub_node("source", construct::voltage_source("Va", voltage.clone()))
            .sub_node("probe", construct::voltage_probe(voltage.clone()))
            .port_connection(("source.V", "probe.V_in"))
            .build(&StandardBuiltins)
            .expect("inner class should build");

        let result = DynamicsClass::builder("Network")
            .sub_node("inner", recording)
            .sub_node("other", construct::voltage_source("Vb", voltage))
            .port_connection(("other.V", "inner.probe.V_in"))
            .build(&StandardBuiltins);

        assert_eq!(reason(result), ConnectionMismatch::AlreadyConnected);
    }

    #[test]
    fn dimensions_must_agree() {
        let voltage = Dimension::new("voltage", [1, 2, -3, -1, 0, 0, 0]);
        let result = DynamicsClass::builder("Network")
            .sub_node("a", construct::voltage_source("Va", voltage))
            .sub_node("probe", construct::voltage_probe(Dimension::dimensionless()))
            .port_connection(("a.V", "probe.V_in"))
            .build(&StandardBuiltins);

        assert!(matches!(
            reason(result),
            ConnectionMismatch::Dimension { .. }
        ));
    }
}
