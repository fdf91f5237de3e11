use nineml_expr::BuiltinRef;

use crate::{alias::Alias, class::DynamicsClass, error::IrError, visit::Visit};

/// Rejects aliases whose definitions refer to each other in a cycle, and
/// alias definitions that use unknown names.
pub(super) struct AliasCycleValidator<'a, 'b, B: BuiltinRef> {
    class: &'a DynamicsClass,
    builtins: &'b B,
}

impl<'a, 'b, B: BuiltinRef> AliasCycleValidator<'a, 'b, B> {
    pub(super) const fn new(class: &'a DynamicsClass, builtins: &'b B) -> Self {
        Self { class, builtins }
    }
}

impl<B: BuiltinRef> Visit for AliasCycleValidator<'_, '_, B> {
    fn visit_alias(&mut self, alias: &Alias) -> Result<(), IrError> {
        self.class
            .dependencies([alias.rhs()], self.builtins)
            .map(|_| ())
    }
}
