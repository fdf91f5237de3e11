//! Closing analog input ports with fixed values.

use nineml_expr::{BuiltinRef, Expr};
use nineml_ir::{
    AnalogReducePort, AnalogReceivePort, DynamicsClass, Fold, Identifier, IrError, PortKind,
    ReferenceKind, fold_class,
};
use tracing::debug;

/// Replaces every reference to one port with a fixed expression and drops
/// the port from the interface.
#[derive(Debug)]
pub struct ExpandPortDefinition<'a> {
    port: &'a str,
    definition: Expr,
}

impl<'a> ExpandPortDefinition<'a> {
    /// Creates an expansion of `port` into `definition`.
    #[must_use]
    pub const fn new(port: &'a str, definition: Expr) -> Self {
        Self { port, definition }
    }
}

impl Fold for ExpandPortDefinition<'_> {
    fn fold_expr(&mut self, expr: &Expr) -> Expr {
        expr.substitute(self.port, &self.definition)
    }

    fn fold_analog_receive_port(&mut self, port: &AnalogReceivePort) -> Option<AnalogReceivePort> {
        (port.name().as_str() != self.port).then(|| port.clone())
    }

    fn fold_analog_reduce_port(&mut self, port: &AnalogReducePort) -> Option<AnalogReducePort> {
        (port.name().as_str() != self.port).then(|| port.clone())
    }
}

/// Substitutes `value` for the analog receive or reduce port `name` in
/// every expression of `class` and removes the port. On error `class` is
/// left unchanged.
///
/// # Errors
///
/// Returns [`IrError::StructuralPrecondition`] if `class` has sub-nodes and
/// [`IrError::UnresolvedReference`] if it has no analog receive or reduce
/// port called `name`, and [`IrError::NonFiniteValue`] if `value` is
/// infinite or NaN.
pub fn close_analog_port(
    class: &mut DynamicsClass,
    name: &str,
    value: f64,
    builtins: &impl BuiltinRef,
) -> Result<(), IrError> {
    if !class.is_flat() {
        return Err(IrError::structural_precondition(
            "close a port of",
            class.name().clone(),
        ));
    }

    if !matches!(
        class.port_kind(name),
        Some(PortKind::AnalogReceive | PortKind::AnalogReduce)
    ) {
        return Err(IrError::unresolved(
            ReferenceKind::Port,
            name,
            format!("analog receive and reduce ports of `{}`", class.name()),
        ));
    }

    if !value.is_finite() {
        return Err(IrError::non_finite_value(Identifier::new(name), value));
    }

    debug!(class = %class.name(), port = name, value, "closing analog port");
    let mut expand = ExpandPortDefinition::new(name, Expr::number(value));
    *class = fold_class(&mut expand, class, builtins)?;
    Ok(())
}
