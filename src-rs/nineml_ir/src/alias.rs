//! Derived quantities and fixed values.

use indexmap::IndexMap;
use nineml_expr::Expr;

use crate::{error::IrError, identifier::Identifier, into_node::IntoNode};

/// A named quantity defined by an expression over other quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    name: Identifier,
    rhs: Expr,
}

impl Alias {
    /// Creates a new alias.
    pub fn new(name: impl Into<Identifier>, rhs: Expr) -> Self {
        Self {
            name: name.into(),
            rhs,
        }
    }

    /// Parses an alias written as `A := expr`.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::Parse`] if the text is malformed.
    pub fn parse(text: &str) -> Result<Self, IrError> {
        let equation = nineml_expr::parse_alias(text).map_err(|error| IrError::parse(text, error))?;
        let (name, rhs) = equation.into_parts();
        Ok(Self::new(name, rhs))
    }

    /// Returns the name of the alias.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the defining expression.
    #[must_use]
    pub const fn rhs(&self) -> &Expr {
        &self.rhs
    }
}

impl IntoNode<Alias> for &str {
    fn into_node(self) -> Result<Alias, IrError> {
        Alias::parse(self)
    }
}

/// A named numeric constant with units.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    name: Identifier,
    value: f64,
    units: String,
}

impl Constant {
    /// Creates a new constant.
    pub fn new(name: impl Into<Identifier>, value: f64, units: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            units: units.into(),
        }
    }

    /// Returns the name of the constant.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the value of the constant.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns the units of the constant.
    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }
}

/// A symbol whose value is drawn from a random distribution each time it
/// is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomVariable {
    name: Identifier,
    distribution: String,
    parameters: IndexMap<String, f64>,
    units: String,
}

impl RandomVariable {
    /// Creates a new random variable.
    pub fn new(
        name: impl Into<Identifier>,
        distribution: impl Into<String>,
        parameters: IndexMap<String, f64>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            distribution: distribution.into(),
            parameters,
            units: units.into(),
        }
    }

    /// Returns the name of the random variable.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns the name of the distribution.
    #[must_use]
    pub fn distribution(&self) -> &str {
        &self.distribution
    }

    /// Returns the parameters of the distribution.
    #[must_use]
    pub const fn parameters(&self) -> &IndexMap<String, f64> {
        &self.parameters
    }

    /// Returns the units of the random variable.
    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use nineml_expr::BinaryOp;

    use super::*;

    #[test]
    fn parse_alias() {
        let alias = Alias::parse("A1 := P1 * 2").expect("alias should parse");
        assert_eq!(alias.name().as_str(), "A1");
        assert_eq!(
            alias.rhs(),
            &Expr::binary_op(BinaryOp::Mul, Expr::variable("P1"), Expr::number(2.0))
        );
    }

    #[test]
    fn parse_alias_error_keeps_text() {
        let result = Alias::parse("A1 := P1 *");
        let Err(IrError::Parse { text, .. }) = result else {
            panic!("expected a parse error, got {result:?}");
        };
        assert_eq!(text, "A1 := P1 *");
    }
}
