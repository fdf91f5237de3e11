use crate::{
    dimension::Dimension, error::IrError, identifier::Identifier, into_node::IntoNode,
};

/// A parameter of a component class.
///
/// Parameters are fixed for the lifetime of a component instance and are
/// supplied when the class is instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: Identifier,
    dimension: Dimension,
}

impl Parameter {
    /// Creates a new parameter.
    pub fn new(name: impl Into<Identifier>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
        }
    }

    /// Creates a dimensionless parameter.
    pub fn dimensionless(name: impl Into<Identifier>) -> Self {
        Self::new(name, Dimension::dimensionless())
    }

    /// Returns the name of the parameter.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the dimension of the parameter.
    #[must_use]
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }
}

impl IntoNode<Parameter> for &str {
    fn into_node(self) -> Result<Parameter, IrError> {
        Ok(Parameter::dimensionless(self))
    }
}
