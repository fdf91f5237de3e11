//! Second pass of class construction: binding transition targets.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    error::{IrError, ReferenceKind},
    identifier::Identifier,
    regime::Regime,
};

/// Records the source and target regime of every transition as positions
/// in `regimes`. A transition without a target loops back to its source.
///
/// Runs only after every regime exists, so a transition may name a regime
/// declared after its own.
pub(super) fn resolve_transitions(
    regimes: &mut IndexMap<Identifier, Regime>,
) -> Result<(), IrError> {
    let positions: HashMap<Identifier, usize> = regimes
        .keys()
        .enumerate()
        .map(|(position, name)| (name.clone(), position))
        .collect();

    for (source, regime) in regimes.values_mut().enumerate() {
        let regime_name = regime.name().clone();
        for transition in regime.transitions_mut() {
            let target = match transition.target_regime_name() {
                None => source,
                Some(name) => *positions.get(name).ok_or_else(|| {
                    IrError::unresolved(
                        ReferenceKind::Regime,
                        name.as_str(),
                        format!("transition of regime `{regime_name}`"),
                    )
                })?,
            };
            transition.resolve(source, target);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{OnCondition, OnEvent};

    #[test]
    fn targets_resolve_by_position() {
        let first = Regime::builder("first")
            .on_condition(OnCondition::builder("x > 1").to("second"))
            .build()
            .expect("regime should build");
        let second = Regime::builder("second")
            .on_event(OnEvent::builder("reset"))
            .build()
            .expect("regime should build");
        let mut regimes: IndexMap<_, _> = [first, second]
            .into_iter()
            .map(|regime| (regime.name().clone(), regime))
            .collect();

        resolve_transitions(&mut regimes).expect("targets should resolve");

        let forward = regimes["first"].on_conditions()[0].transition();
        assert_eq!(forward.source_regime(), Some(0));
        assert_eq!(forward.target_regime(), Some(1));

        let self_loop = regimes["second"].on_events()[0].transition();
        assert_eq!(self_loop.source_regime(), Some(1));
        assert_eq!(self_loop.target_regime(), Some(1));
    }
}
