//! The set of quantities a group of expressions depends on.

use nineml_expr::{BuiltinRef, Expr};
use nineml_shared::Stack;

use crate::{
    alias::{Alias, Constant, RandomVariable},
    class::DynamicsClass,
    error::{IrError, ReferenceKind},
    identifier::Identifier,
    parameter::Parameter,
    port::{AnalogReducePort, AnalogReceivePort},
};

/// Everything a group of expressions transitively depends on.
///
/// Aliases are listed so that every alias comes after the aliases its
/// definition uses, which is the order a code generator evaluates them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dependencies<'a> {
    parameters: Vec<&'a Parameter>,
    analog_receive_ports: Vec<&'a AnalogReceivePort>,
    analog_reduce_ports: Vec<&'a AnalogReducePort>,
    constants: Vec<&'a Constant>,
    random_variables: Vec<&'a RandomVariable>,
    aliases: Vec<&'a Alias>,
}

impl<'a> Dependencies<'a> {
    /// Returns the parameters the expressions read.
    #[must_use]
    pub fn parameters(&self) -> &[&'a Parameter] {
        &self.parameters
    }

    /// Returns the analog receive ports the expressions read.
    #[must_use]
    pub fn analog_receive_ports(&self) -> &[&'a AnalogReceivePort] {
        &self.analog_receive_ports
    }

    /// Returns the analog reduce ports the expressions read.
    #[must_use]
    pub fn analog_reduce_ports(&self) -> &[&'a AnalogReducePort] {
        &self.analog_reduce_ports
    }

    /// Returns the constants the expressions read.
    #[must_use]
    pub fn constants(&self) -> &[&'a Constant] {
        &self.constants
    }

    /// Returns the random variables the expressions read.
    #[must_use]
    pub fn random_variables(&self) -> &[&'a RandomVariable] {
        &self.random_variables
    }

    /// Returns the aliases in definition-before-use order.
    #[must_use]
    pub fn aliases(&self) -> &[&'a Alias] {
        &self.aliases
    }
}

impl DynamicsClass {
    /// Collects the parameters, analog receive and reduce ports, constants,
    /// random variables and aliases that `expressions` depend on, following
    /// alias definitions transitively. State variables and builtin values
    /// are not dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::UnresolvedReference`] naming the atom and the
    /// expression it appears in if an atom does not resolve, and
    /// [`IrError::CircularDependency`] if aliases refer to each other in a
    /// cycle.
    pub fn dependencies<'e>(
        &self,
        expressions: impl IntoIterator<Item = &'e Expr>,
        builtins: &impl BuiltinRef,
    ) -> Result<Dependencies<'_>, IrError> {
        let mut resolver = Resolver {
            class: self,
            builtins,
            dependencies: Dependencies::default(),
            stack: Stack::new(),
        };
        for expr in expressions {
            resolver.resolve_expr(expr)?;
        }
        Ok(resolver.dependencies)
    }
}

struct Resolver<'a, 'b, B: BuiltinRef> {
    class: &'a DynamicsClass,
    builtins: &'b B,
    dependencies: Dependencies<'a>,
    stack: Stack<Identifier>,
}

impl<'a, B: BuiltinRef> Resolver<'a, '_, B> {
    fn resolve_expr(&mut self, expr: &Expr) -> Result<(), IrError> {
        for atom in expr.atoms() {
            self.resolve_atom(atom, expr)?;
        }
        Ok(())
    }

    fn resolve_atom(&mut self, atom: &str, expr: &Expr) -> Result<(), IrError> {
        let class = self.class;
        if self.builtins.has_builtin_value(atom) || class.state_variable(atom).is_some() {
            return Ok(());
        }

        if let Some(alias) = class.alias(atom) {
            return self.resolve_alias(alias);
        }

        let dependencies = &mut self.dependencies;
        if let Some(parameter) = class.parameter(atom) {
            push_unique(&mut dependencies.parameters, parameter);
        } else if let Some(port) = class.analog_receive_port(atom) {
            push_unique(&mut dependencies.analog_receive_ports, port);
        } else if let Some(port) = class.analog_reduce_port(atom) {
            push_unique(&mut dependencies.analog_reduce_ports, port);
        } else if let Some(constant) = class.constant(atom) {
            push_unique(&mut dependencies.constants, constant);
        } else if let Some(random_variable) = class.random_variable(atom) {
            push_unique(&mut dependencies.random_variables, random_variable);
        } else {
            return Err(IrError::unresolved(
                ReferenceKind::Symbol,
                atom,
                format!("expression `{expr}`"),
            ));
        }
        Ok(())
    }

    fn resolve_alias(&mut self, alias: &'a Alias) -> Result<(), IrError> {
        if let Some(cycle) = self.stack.find_circular_dependency(alias.name()) {
            return Err(IrError::circular_dependency(cycle));
        }
        if self.dependencies.aliases.iter().any(|a| std::ptr::eq(*a, alias)) {
            return Ok(());
        }

        self.stack.push(alias.name().clone());
        self.resolve_expr(alias.rhs())?;
        self.stack.pop();

        self.dependencies.aliases.push(alias);
        Ok(())
    }
}

fn push_unique<'a, T>(items: &mut Vec<&'a T>, item: &'a T) {
    if !items.iter().any(|existing| std::ptr::eq(*existing, item)) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use nineml_expr::{StandardBuiltins, parse_expression};

    use super::*;
    use crate::{dimension::Dimension, port::AnalogReceivePort, regime::Regime};

    fn names<T>(items: &[&T], name: impl Fn(&T) -> &Identifier) -> Vec<String> {
        items.iter().map(|item| name(*item).to_string()).collect()
    }

    #[test]
    fn aliases_come_after_their_dependencies() {
        let class = DynamicsClass::builder("A")
            .analog_receive_port(AnalogReceivePort::new("I_in", Dimension::dimensionless()))
            .alias("total := a + b")
            .alias("a := b * g")
            .alias("b := I_in + pi")
            .constant(Constant::new("k", 2.0, ""))
            .regime(Regime::builder("R").time_derivative("dV/dt = total * k - V"))
            .build(&StandardBuiltins)
            .expect("class should build");

        let expr = parse_expression("total * k - V + t").expect("expression should parse");
        let dependencies = class
            .dependencies([&expr], &StandardBuiltins)
            .expect("dependencies should resolve");

        assert_eq!(names(dependencies.aliases(), Alias::name), ["b", "a", "total"]);
        assert_eq!(names(dependencies.parameters(), Parameter::name), ["g"]);
        assert_eq!(
            names(dependencies.analog_receive_ports(), AnalogReceivePort::name),
            ["I_in"]
        );
        assert_eq!(names(dependencies.constants(), Constant::name), ["k"]);
        assert!(dependencies.random_variables().is_empty());
    }

    #[test]
    fn unknown_atom_is_unresolved() {
        let class = DynamicsClass::builder("A")
            .regime(Regime::builder("R").time_derivative("dV/dt = -V"))
            .build(&StandardBuiltins)
            .expect("class should build");

        let expr = parse_expression("V + missing").expect("expression should parse");
        let result = class.dependencies([&expr], &StandardBuiltins);

        let Err(IrError::UnresolvedReference(reference)) = result else {
            panic!("expected an unresolved reference, got {result:?}");
        };
        assert_eq!(reference.kind(), ReferenceKind::Symbol);
        assert_eq!(reference.name(), "missing");
        assert!(reference.context().contains("V + missing"));
    }

    #[test]
    fn alias_cycle_is_rejected_at_build() {
        let result = DynamicsClass::builder("A")
            .alias("x := y + 1")
            .alias("y := x * 2")
            .build(&StandardBuiltins);

        let Err(IrError::CircularDependency { cycle }) = result else {
            panic!("expected a circular dependency, got {result:?}");
        };
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.contains(&Identifier::new("x")));
        assert!(cycle.contains(&Identifier::new("y")));
    }
}
