//! Structural validation of a freshly built class.
//!
//! Each check is a permissive [`Visit`](crate::visit::Visit) implementation
//! that overrides only the node kinds it inspects. The checks run in a fixed
//! order and the first failure is reported.

mod aliases;
mod connections;
mod names;
mod references;

use nineml_expr::BuiltinRef;

use crate::{class::DynamicsClass, error::IrError, visit::walk};

use self::{
    aliases::AliasCycleValidator, connections::ConnectionValidator, names::IdentifierValidator,
    names::NamespaceValidator, references::ReferenceValidator,
};

/// Runs every check against `class`.
pub(crate) fn validate(class: &DynamicsClass, builtins: &impl BuiltinRef) -> Result<(), IrError> {
    walk(&mut IdentifierValidator, class)?;
    walk(&mut NamespaceValidator::new(builtins), class)?;
    walk(&mut ReferenceValidator::new(class), class)?;
    walk(&mut AliasCycleValidator::new(class, builtins), class)?;
    walk(&mut ConnectionValidator::new(class), class)?;
    Ok(())
}
