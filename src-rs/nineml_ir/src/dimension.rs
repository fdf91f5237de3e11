//! Physical dimensions.
//!
//! Dimensions are opaque to the object model: they are looked up by name
//! through a [`DimensionRegistry`] and only ever compared for equality.

use std::fmt;

/// A named physical dimension with its exponents over the SI base
/// dimensions, in the order mass, length, time, current, amount,
/// temperature, luminous intensity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
    name: String,
    exponents: [i8; 7],
}

impl Dimension {
    /// Creates a new dimension.
    pub fn new(name: impl Into<String>, exponents: [i8; 7]) -> Self {
        Self {
            name: name.into(),
            exponents,
        }
    }

    /// The dimension of a pure number.
    #[must_use]
    pub fn dimensionless() -> Self {
        Self::new("dimensionless", [0; 7])
    }

    /// Returns the name of the dimension.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base-dimension exponents.
    #[must_use]
    pub const fn exponents(&self) -> [i8; 7] {
        self.exponents
    }

    /// Returns true if every exponent is zero.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|exponent| *exponent == 0)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::dimensionless()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves dimension names to dimensions.
pub trait DimensionRegistry {
    /// Returns the dimension with the given name, if it is known.
    fn dimension(&self, name: &str) -> Option<Dimension>;
}

/// The dimensions commonly used by neuron and synapse models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardDimensions;

impl StandardDimensions {
    //                               m   l   t   i  n  k  j
    const TABLE: &'static [(&'static str, [i8; 7])] = &[
        ("dimensionless", [0, 0, 0, 0, 0, 0, 0]),
        ("time", [0, 0, 1, 0, 0, 0, 0]),
        ("per_time", [0, 0, -1, 0, 0, 0, 0]),
        ("voltage", [1, 2, -3, -1, 0, 0, 0]),
        ("per_voltage", [-1, -2, 3, 1, 0, 0, 0]),
        ("current", [0, 0, 0, 1, 0, 0, 0]),
        ("conductance", [-1, -2, 3, 2, 0, 0, 0]),
        ("resistance", [1, 2, -3, -2, 0, 0, 0]),
        ("capacitance", [-1, -2, 4, 2, 0, 0, 0]),
        ("charge", [0, 0, 1, 1, 0, 0, 0]),
        ("length", [0, 1, 0, 0, 0, 0, 0]),
        ("area", [0, 2, 0, 0, 0, 0, 0]),
        ("concentration", [0, -3, 0, 0, 1, 0, 0]),
        ("temperature", [0, 0, 0, 0, 0, 1, 0]),
    ];
}

impl DimensionRegistry for StandardDimensions {
    fn dimension(&self, name: &str) -> Option<Dimension> {
        Self::TABLE
            .iter()
            .find(|(table_name, _)| *table_name == name)
            .map(|(table_name, exponents)| Dimension::new(*table_name, *exponents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_dimensions() {
        let registry = StandardDimensions;

        let voltage = registry.dimension("voltage").expect("voltage should exist");
        assert_eq!(voltage.name(), "voltage");
        assert!(!voltage.is_dimensionless());

        assert_eq!(
            registry.dimension("dimensionless"),
            Some(Dimension::dimensionless())
        );
        assert_eq!(registry.dimension("furlong"), None);
    }
}
