use nineml_expr::Expr;

use crate::{
    dimension::Dimension, error::IrError, identifier::Identifier, into_node::IntoNode,
};

/// A continuous quantity integrated over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVariable {
    name: Identifier,
    dimension: Dimension,
}

impl StateVariable {
    /// Creates a new state variable.
    pub fn new(name: impl Into<Identifier>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
        }
    }

    /// Creates a dimensionless state variable.
    pub fn dimensionless(name: impl Into<Identifier>) -> Self {
        Self::new(name, Dimension::dimensionless())
    }

    /// Returns the name of the state variable.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the dimension of the state variable.
    #[must_use]
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }
}

impl IntoNode<StateVariable> for &str {
    fn into_node(self) -> Result<StateVariable, IrError> {
        Ok(StateVariable::dimensionless(self))
    }
}

/// The rate of change of a state variable within a regime.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDerivative {
    variable: Identifier,
    rhs: Expr,
}

impl TimeDerivative {
    /// Creates a new time derivative.
    pub fn new(variable: impl Into<Identifier>, rhs: Expr) -> Self {
        Self {
            variable: variable.into(),
            rhs,
        }
    }

    /// Parses a time derivative written as `dX/dt = expr`.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::Parse`] if the text is malformed.
    pub fn parse(text: &str) -> Result<Self, IrError> {
        let equation =
            nineml_expr::parse_time_derivative(text).map_err(|error| IrError::parse(text, error))?;
        let (variable, rhs) = equation.into_parts();
        Ok(Self::new(variable, rhs))
    }

    /// Returns the state variable being differentiated.
    #[must_use]
    pub const fn variable(&self) -> &Identifier {
        &self.variable
    }

    /// Returns the right-hand side.
    #[must_use]
    pub const fn rhs(&self) -> &Expr {
        &self.rhs
    }
}

impl IntoNode<TimeDerivative> for &str {
    fn into_node(self) -> Result<TimeDerivative, IrError> {
        TimeDerivative::parse(self)
    }
}
