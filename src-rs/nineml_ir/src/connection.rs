//! Connections between the ports of sub-nodes.

use std::fmt;

use crate::{error::IrError, identifier::Identifier, into_node::IntoNode, visit::NodeKind};

/// The address of a port inside a (possibly nested) sub-node, written as
/// `outer.inner.port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortAddress {
    namespace: Vec<Identifier>,
    port: Identifier,
}

impl PortAddress {
    /// Creates a new port address.
    #[must_use]
    pub const fn new(namespace: Vec<Identifier>, port: Identifier) -> Self {
        Self { namespace, port }
    }

    /// Parses a dotted port address.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::InvalidIdentifier`] if any segment is empty.
    pub fn parse(text: &str) -> Result<Self, IrError> {
        let mut segments = text
            .split('.')
            .map(|segment| {
                let segment = segment.trim();
                if segment.is_empty() {
                    Err(IrError::invalid_identifier(NodeKind::PortConnection, text))
                } else {
                    Ok(Identifier::new(segment))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some(port) = segments.pop() else {
            return Err(IrError::invalid_identifier(NodeKind::PortConnection, text));
        };

        Ok(Self::new(segments, port))
    }

    /// Returns the namespace path, outermost first.
    #[must_use]
    pub fn namespace(&self) -> &[Identifier] {
        &self.namespace
    }

    /// Returns the port name.
    #[must_use]
    pub const fn port(&self) -> &Identifier {
        &self.port
    }

    /// Returns the name the port has once the sub-nodes on its path have
    /// been flattened: every segment joined with `_`.
    #[must_use]
    pub fn flattened_name(&self) -> Identifier {
        let mut name = String::new();
        for segment in &self.namespace {
            name.push_str(segment.as_str());
            name.push('_');
        }
        name.push_str(self.port.as_str());
        Identifier::new(name)
    }

    /// Returns this address relative to its outermost sub-node, or `None`
    /// if the address has no namespace.
    #[must_use]
    pub fn strip_outer(&self) -> Option<(&Identifier, Self)> {
        let (outer, rest) = self.namespace.split_first()?;
        Some((outer, Self::new(rest.to_vec(), self.port.clone())))
    }
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.namespace {
            write!(f, "{segment}.")?;
        }
        write!(f, "{}", self.port)
    }
}

/// A connection from a send port to a receive or reduce port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortConnection {
    sender: PortAddress,
    receiver: PortAddress,
}

impl PortConnection {
    /// Creates a new port connection.
    #[must_use]
    pub const fn new(sender: PortAddress, receiver: PortAddress) -> Self {
        Self { sender, receiver }
    }

    /// Parses both ends of a connection from dotted addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if either address is malformed.
    pub fn parse(sender: &str, receiver: &str) -> Result<Self, IrError> {
        Ok(Self::new(
            PortAddress::parse(sender)?,
            PortAddress::parse(receiver)?,
        ))
    }

    /// Returns the sending end.
    #[must_use]
    pub const fn sender(&self) -> &PortAddress {
        &self.sender
    }

    /// Returns the receiving end.
    #[must_use]
    pub const fn receiver(&self) -> &PortAddress {
        &self.receiver
    }
}

impl IntoNode<PortConnection> for (&str, &str) {
    fn into_node(self) -> Result<PortConnection, IrError> {
        PortConnection::parse(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_address() {
        let address = PortAddress::parse("cell.soma.V").expect("address should parse");
        assert_eq!(
            address.namespace(),
            [Identifier::new("cell"), Identifier::new("soma")]
        );
        assert_eq!(address.port().as_str(), "V");
        assert_eq!(address.to_string(), "cell.soma.V");
        assert_eq!(address.flattened_name().as_str(), "cell_soma_V");

        let (outer, inner) = address.strip_outer().expect("address has a namespace");
        assert_eq!(outer.as_str(), "cell");
        assert_eq!(inner.to_string(), "soma.V");
    }

    #[test]
    fn parse_rejects_empty_segment() {
        assert!(matches!(
            PortAddress::parse("cell..V"),
            Err(IrError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            PortAddress::parse(""),
            Err(IrError::InvalidIdentifier { .. })
        ));
    }
}
