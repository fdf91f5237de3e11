//! Renaming a single symbol throughout a flat class.

use nineml_expr::BuiltinRef;
use nineml_ir::{DynamicsClass, Fold, Identifier, IrError, fold_class};
use tracing::debug;

/// Replaces one name wherever it is declared or referenced.
#[derive(Debug)]
pub struct RenameSymbol<'a> {
    old: &'a str,
    new: &'a str,
}

impl<'a> RenameSymbol<'a> {
    /// Creates a renamer from `old` to `new`.
    #[must_use]
    pub const fn new(old: &'a str, new: &'a str) -> Self {
        Self { old, new }
    }
}

impl Fold for RenameSymbol<'_> {
    fn fold_symbol(&mut self, name: &Identifier) -> Identifier {
        if name.as_str() == self.old {
            Identifier::new(self.new)
        } else {
            name.clone()
        }
    }
}

/// Renames `old` to `new` in every declaration and every expression of
/// `class`, then revalidates it. On error `class` is left unchanged.
///
/// # Errors
///
/// Returns [`IrError::StructuralPrecondition`] if `class` has sub-nodes, or
/// the validation error of the renamed class (for instance a collision
/// with an existing name).
pub fn rename_symbol(
    class: &mut DynamicsClass,
    old: &str,
    new: &str,
    builtins: &impl BuiltinRef,
) -> Result<(), IrError> {
    if !class.is_flat() {
        return Err(IrError::structural_precondition(
            "rename a symbol in",
            class.name().clone(),
        ));
    }

    debug!(class = %class.name(), old, new, "renaming symbol");
    *class = fold_class(&mut RenameSymbol::new(old, new), class, builtins)?;
    Ok(())
}
