//! Names with built-in meaning inside expressions.

/// The symbol denoting simulation time.
pub const TIME_SYMBOL: &str = "t";

/// Answers whether a name refers to a built-in value or function.
///
/// Implementations are passed by reference wherever symbols are classified,
/// so that callers can extend the set of builtins without global state.
pub trait BuiltinRef {
    /// Returns true if `name` is a built-in constant or variable.
    fn has_builtin_value(&self, name: &str) -> bool;

    /// Returns true if `name` is a built-in function.
    fn has_builtin_function(&self, name: &str) -> bool;

    /// Returns true if `name` cannot be used for a user-defined symbol.
    fn is_reserved(&self, name: &str) -> bool {
        self.has_builtin_value(name) || self.has_builtin_function(name)
    }

    /// Returns the name of the time symbol.
    fn time_symbol(&self) -> &str {
        TIME_SYMBOL
    }
}

/// The standard set of builtins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardBuiltins;

impl StandardBuiltins {
    const VALUES: &'static [&'static str] = &[TIME_SYMBOL, "pi"];

    const FUNCTIONS: &'static [&'static str] = &[
        "exp", "log", "log10", "sin", "cos", "tan", "sinh", "cosh", "tanh", "asin", "acos",
        "atan", "atan2", "sqrt", "pow", "abs", "ceil", "floor", "min", "max", "mod",
        "heaviside",
    ];

    /// Creates the standard builtins.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the built-in value names.
    #[must_use]
    pub const fn values(&self) -> &'static [&'static str] {
        Self::VALUES
    }

    /// Returns the built-in function names.
    #[must_use]
    pub const fn functions(&self) -> &'static [&'static str] {
        Self::FUNCTIONS
    }
}

impl BuiltinRef for StandardBuiltins {
    fn has_builtin_value(&self, name: &str) -> bool {
        Self::VALUES.contains(&name)
    }

    fn has_builtin_function(&self, name: &str) -> bool {
        Self::FUNCTIONS.contains(&name)
    }
}
