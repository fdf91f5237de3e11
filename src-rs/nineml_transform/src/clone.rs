//! Deep copies with optional namespace qualification.

use nineml_expr::BuiltinRef;
use nineml_ir::{DynamicsClass, Fold, Identifier, IrError, fold_class};
use tracing::debug;

/// Prefixes every variable-like name it folds, except excluded names and
/// builtin values. Regime names and sub-node namespaces are left alone.
#[derive(Debug)]
pub struct Cloner<'a, B: BuiltinRef> {
    prefix: &'a str,
    excludes: &'a [&'a str],
    builtins: &'a B,
}

impl<'a, B: BuiltinRef> Cloner<'a, B> {
    /// Creates a cloner. An empty prefix makes a plain copy.
    #[must_use]
    pub const fn new(prefix: &'a str, excludes: &'a [&'a str], builtins: &'a B) -> Self {
        Self {
            prefix,
            excludes,
            builtins,
        }
    }

    fn keeps(&self, name: &str) -> bool {
        self.prefix.is_empty()
            || self.excludes.contains(&name)
            || self.builtins.has_builtin_value(name)
    }
}

impl<B: BuiltinRef> Fold for Cloner<'_, B> {
    fn fold_symbol(&mut self, name: &Identifier) -> Identifier {
        if self.keeps(name.as_str()) {
            name.clone()
        } else {
            name.with_prefix(self.prefix)
        }
    }
}

/// Returns an independent copy of `class` with every variable-like name
/// prefixed by `prefix`, except names in `prefix_excludes` and builtin
/// values. Index positions carry over to the prefixed names.
///
/// # Errors
///
/// Returns an error if the prefixed class fails validation, for instance
/// because the prefix makes a name invalid.
pub fn clone_class(
    class: &DynamicsClass,
    prefix: &str,
    prefix_excludes: &[&str],
    builtins: &impl BuiltinRef,
) -> Result<DynamicsClass, IrError> {
    debug!(class = %class.name(), prefix, "cloning class");
    fold_class(
        &mut Cloner::new(prefix, prefix_excludes, builtins),
        class,
        builtins,
    )
}

#[cfg(test)]
mod tests {
    use nineml_expr::{StandardBuiltins, TIME_SYMBOL};
    use nineml_ir::NodeKind;

    use super::*;
    use crate::{assign_indices, test::construct};

    #[test]
    fn plain_clone_is_structurally_equal() {
        let class = construct::leaky_integrate_and_fire();
        let copy = clone_class(&class, "", &[], &StandardBuiltins).expect("clone should succeed");
        assert_eq!(copy, class);
    }

    #[test]
    fn prefix_reaches_names_and_atoms() {
        let class = construct::leaky_integrate_and_fire();
        let copy =
            clone_class(&class, "cell_", &[], &StandardBuiltins).expect("clone should succeed");

        assert!(copy.parameter("cell_tau").is_some());
        assert!(copy.state_variable("cell_V").is_some());
        assert!(copy.analog_send_port("cell_V").is_some());
        assert!(copy.event_send_port("cell_spike").is_some());
        assert_eq!(
            copy.alias("cell_V_inf").map(|alias| alias.rhs().to_string()),
            Some("cell_E_L + cell_R * cell_I_ext".to_string())
        );

        let regime = copy
            .regime("subthreshold")
            .expect("regime names should not be prefixed");
        let time_derivative = regime
            .time_derivative("cell_V")
            .expect("time derivative should follow its state variable");
        assert_eq!(
            time_derivative.rhs().to_string(),
            "(cell_V_inf - cell_V) / cell_tau"
        );
    }

    #[test]
    fn excluded_and_builtin_names_are_kept() {
        let class = construct::time_dependent_drive();
        let copy = clone_class(&class, "x_", &[TIME_SYMBOL, "amplitude"], &StandardBuiltins)
            .expect("clone should succeed");

        assert!(copy.parameter("amplitude").is_some());
        assert!(copy.parameter("x_omega").is_some());
        let rhs = copy
            .alias("x_drive")
            .map(|alias| alias.rhs().to_string())
            .expect("alias should be prefixed");
        assert_eq!(rhs, "amplitude * sin(2 * pi * x_omega * t)");
    }

    #[test]
    fn indices_carry_over() {
        let mut class = construct::leaky_integrate_and_fire();
        assign_indices(&mut class).expect("class is flat");

        let copy =
            clone_class(&class, "cell_", &[], &StandardBuiltins).expect("clone should succeed");
        assert_eq!(
            copy.index_of(NodeKind::Parameter, "cell_R"),
            class.index_of(NodeKind::Parameter, "R")
        );
        assert_eq!(
            copy.index_of(NodeKind::Regime, "subthreshold"),
            class.index_of(NodeKind::Regime, "subthreshold")
        );
    }

    #[test]
    fn source_is_untouched() {
        let class = construct::leaky_integrate_and_fire();
        let before = class.clone();
        let _copy = clone_class(&class, "cell_", &[], &StandardBuiltins);
        assert_eq!(class, before);
    }
}
