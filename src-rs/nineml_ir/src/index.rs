use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::visit::NodeKind;

/// Stable ordinal positions of named nodes, one dense zero-based counter
/// per node kind.
///
/// Code generators use these positions to encode names compactly. An
/// index, once handed out, does not change until the book is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBook {
    indices: BTreeMap<NodeKind, IndexMap<String, usize>>,
}

impl IndexBook {
    /// Creates an empty book.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            indices: BTreeMap::new(),
        }
    }

    /// Returns the index of `name` among nodes of `kind`, assigning the next
    /// free index if it has none yet.
    pub fn index_of(&mut self, kind: NodeKind, name: &str) -> usize {
        let names = self.indices.entry(kind).or_default();
        if let Some(index) = names.get(name) {
            return *index;
        }
        let index = names.len();
        names.insert(name.to_string(), index);
        index
    }

    /// Returns the index of `name` among nodes of `kind`, if one has been
    /// assigned.
    #[must_use]
    pub fn get(&self, kind: NodeKind, name: &str) -> Option<usize> {
        self.indices.get(&kind)?.get(name).copied()
    }

    /// Returns the number of indices assigned for `kind`.
    #[must_use]
    pub fn len(&self, kind: NodeKind) -> usize {
        self.indices.get(&kind).map_or(0, IndexMap::len)
    }

    /// Returns true if no index has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.values().all(IndexMap::is_empty)
    }

    /// Returns a copy of the book with every name of a kind accepted by
    /// `renames` passed through `rename`. Positions are kept.
    #[must_use]
    pub fn map_names(
        &self,
        renames: impl Fn(NodeKind) -> bool,
        mut rename: impl FnMut(&str) -> String,
    ) -> Self {
        let indices = self
            .indices
            .iter()
            .map(|(kind, names)| {
                let names = if renames(*kind) {
                    names
                        .iter()
                        .map(|(name, index)| (rename(name), *index))
                        .collect()
                } else {
                    names.clone()
                };
                (*kind, names)
            })
            .collect();
        Self { indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_per_kind() {
        let mut book = IndexBook::new();
        assert_eq!(book.index_of(NodeKind::Parameter, "a"), 0);
        assert_eq!(book.index_of(NodeKind::Parameter, "b"), 1);
        assert_eq!(book.index_of(NodeKind::StateVariable, "V"), 0);
        assert_eq!(book.index_of(NodeKind::Parameter, "a"), 0);

        assert_eq!(book.get(NodeKind::Parameter, "b"), Some(1));
        assert_eq!(book.get(NodeKind::Parameter, "c"), None);
        assert_eq!(book.len(NodeKind::Parameter), 2);
    }

    #[test]
    fn map_names_keeps_positions() {
        let mut book = IndexBook::new();
        book.index_of(NodeKind::Parameter, "a");
        book.index_of(NodeKind::Regime, "R1");

        let mapped = book.map_names(
            |kind| kind != NodeKind::Regime,
            |name| format!("x_{name}"),
        );

        assert_eq!(mapped.get(NodeKind::Parameter, "x_a"), Some(0));
        assert_eq!(mapped.get(NodeKind::Regime, "R1"), Some(0));
    }
}
