//! The expression tree and the symbolic operations performed on it.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

/// A mathematical or boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A binary operation
    BinaryOp {
        /// The operator
        op: BinaryOp,
        /// The left operand
        left: Box<Expr>,
        /// The right operand
        right: Box<Expr>,
    },
    /// A unary operation
    UnaryOp {
        /// The operator
        op: UnaryOp,
        /// The operand
        expr: Box<Expr>,
    },
    /// A call to a builtin function
    FunctionCall {
        /// The function name
        name: String,
        /// The arguments
        args: Vec<Expr>,
    },
    /// A reference to a named symbol
    Variable(String),
    /// A literal value
    Literal(Literal),
}

/// Binary operators, from lowest to highest precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEq,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEq,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^` or `**`
    Pow,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation
    Neg,
    /// Logical negation
    Not,
}

/// Literal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// A finite, non-negative number
    Number(f64),
    /// A boolean
    Boolean(bool),
}

impl BinaryOp {
    /// Returns true if the operator produces a boolean result.
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(
            self,
            Self::Or
                | Self::And
                | Self::LessThan
                | Self::LessThanEq
                | Self::GreaterThan
                | Self::GreaterThanEq
                | Self::Eq
                | Self::NotEq
        )
    }

    /// Returns the textual form of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::LessThan => "<",
            Self::LessThanEq => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }
}

impl UnaryOp {
    /// Returns the textual form of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

impl Expr {
    /// Creates a numeric literal. Negative values become a negation of
    /// their magnitude so that the tree always prints and parses the same.
    #[must_use]
    pub fn number(value: f64) -> Self {
        if value.is_sign_negative() && value != 0.0 {
            Self::unary_op(UnaryOp::Neg, Self::Literal(Literal::Number(-value)))
        } else {
            Self::Literal(Literal::Number(value.abs()))
        }
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates a variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Creates a binary operation.
    #[must_use]
    pub fn binary_op(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a unary operation.
    #[must_use]
    pub fn unary_op(op: UnaryOp, expr: Self) -> Self {
        Self::UnaryOp {
            op,
            expr: Box::new(expr),
        }
    }

    /// Creates a function call.
    #[must_use]
    pub fn function_call(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Folds the given terms into a left-associated sum.
    ///
    /// Returns `None` when there are no terms.
    pub fn sum(terms: impl IntoIterator<Item = Self>) -> Option<Self> {
        terms
            .into_iter()
            .reduce(|acc, term| Self::binary_op(BinaryOp::Add, acc, term))
    }

    /// Returns the variable names referenced by this expression, in order of
    /// first use. Function names are not included.
    #[must_use]
    pub fn atoms(&self) -> IndexSet<&str> {
        let mut atoms = IndexSet::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, atoms: &mut IndexSet<&'a str>) {
        match self {
            Self::BinaryOp { left, right, .. } => {
                left.collect_atoms(atoms);
                right.collect_atoms(atoms);
            }
            Self::UnaryOp { expr, .. } => expr.collect_atoms(atoms),
            Self::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_atoms(atoms);
                }
            }
            Self::Variable(name) => {
                atoms.insert(name.as_str());
            }
            Self::Literal(_) => {}
        }
    }

    /// Returns the names of the functions called by this expression, in
    /// order of first use.
    #[must_use]
    pub fn functions(&self) -> IndexSet<&str> {
        let mut functions = IndexSet::new();
        self.collect_functions(&mut functions);
        functions
    }

    fn collect_functions<'a>(&'a self, functions: &mut IndexSet<&'a str>) {
        match self {
            Self::BinaryOp { left, right, .. } => {
                left.collect_functions(functions);
                right.collect_functions(functions);
            }
            Self::UnaryOp { expr, .. } => expr.collect_functions(functions),
            Self::FunctionCall { name, args } => {
                functions.insert(name.as_str());
                for arg in args {
                    arg.collect_functions(functions);
                }
            }
            Self::Variable(_) | Self::Literal(_) => {}
        }
    }

    /// Returns a copy of this expression with every variable name passed
    /// through `map`.
    #[must_use]
    pub fn map_symbols(&self, map: &mut impl FnMut(&str) -> String) -> Self {
        match self {
            Self::BinaryOp { op, left, right } => {
                let left = left.map_symbols(map);
                let right = right.map_symbols(map);
                Self::binary_op(*op, left, right)
            }
            Self::UnaryOp { op, expr } => Self::unary_op(*op, expr.map_symbols(map)),
            Self::FunctionCall { name, args } => Self::function_call(
                name.clone(),
                args.iter().map(|arg| arg.map_symbols(map)).collect(),
            ),
            Self::Variable(name) => Self::Variable(map(name.as_str())),
            Self::Literal(literal) => Self::Literal(*literal),
        }
    }

    /// Renames variables according to `names`. Variables without an entry
    /// are left untouched.
    #[must_use]
    pub fn name_transform(&self, names: &HashMap<String, String>) -> Self {
        self.map_symbols(&mut |name| {
            names
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
    }

    /// Replaces every occurrence of the variable `name` with `replacement`.
    #[must_use]
    pub fn substitute(&self, name: &str, replacement: &Self) -> Self {
        match self {
            Self::BinaryOp { op, left, right } => Self::binary_op(
                *op,
                left.substitute(name, replacement),
                right.substitute(name, replacement),
            ),
            Self::UnaryOp { op, expr } => Self::unary_op(*op, expr.substitute(name, replacement)),
            Self::FunctionCall { name: func, args } => Self::function_call(
                func.clone(),
                args.iter()
                    .map(|arg| arg.substitute(name, replacement))
                    .collect(),
            ),
            Self::Variable(var) if var == name => replacement.clone(),
            Self::Variable(_) | Self::Literal(_) => self.clone(),
        }
    }

    /// Expands every variable that names one of `definitions`, repeatedly,
    /// until no defined name remains.
    ///
    /// The definitions must not be cyclic. A definition that refers to
    /// itself, directly or through others, is left unexpanded at the point
    /// of recursion.
    #[must_use]
    pub fn rhs_substituted(&self, definitions: &IndexMap<String, Self>) -> Self {
        let mut expanding = Vec::new();
        self.expand(definitions, &mut expanding)
    }

    fn expand<'a>(&self, definitions: &'a IndexMap<String, Self>, expanding: &mut Vec<&'a str>) -> Self {
        match self {
            Self::BinaryOp { op, left, right } => {
                let left = left.expand(definitions, expanding);
                let right = right.expand(definitions, expanding);
                Self::binary_op(*op, left, right)
            }
            Self::UnaryOp { op, expr } => Self::unary_op(*op, expr.expand(definitions, expanding)),
            Self::FunctionCall { name, args } => Self::function_call(
                name.clone(),
                args.iter()
                    .map(|arg| arg.expand(definitions, expanding))
                    .collect(),
            ),
            Self::Variable(var) => match definitions.get_key_value(var.as_str()) {
                Some((key, definition)) if !expanding.contains(&key.as_str()) => {
                    expanding.push(key.as_str());
                    let expanded = definition.expand(definitions, expanding);
                    expanding.pop();
                    expanded
                }
                _ => self.clone(),
            },
            Self::Literal(_) => self.clone(),
        }
    }

    /// Returns true if the top-level operation yields a boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        match self {
            Self::BinaryOp { op, .. } => op.is_boolean(),
            Self::UnaryOp { op, .. } => matches!(op, UnaryOp::Not),
            Self::Literal(Literal::Boolean(_)) => true,
            Self::FunctionCall { .. } | Self::Variable(_) | Self::Literal(Literal::Number(_)) => {
                false
            }
        }
    }

    /// Returns the variable name if this expression is a bare variable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::variable(name)
    }

    #[test]
    fn atoms_are_in_first_use_order_without_functions() {
        // exp(a * b) + a - c
        let expr = Expr::binary_op(
            BinaryOp::Sub,
            Expr::binary_op(
                BinaryOp::Add,
                Expr::function_call(
                    "exp",
                    vec![Expr::binary_op(BinaryOp::Mul, var("a"), var("b"))],
                ),
                var("a"),
            ),
            var("c"),
        );

        let atoms: Vec<_> = expr.atoms().into_iter().collect();
        assert_eq!(atoms, ["a", "b", "c"]);

        let functions: Vec<_> = expr.functions().into_iter().collect();
        assert_eq!(functions, ["exp"]);
    }

    #[test]
    fn negative_number_becomes_negation() {
        assert_eq!(
            Expr::number(-2.5),
            Expr::unary_op(UnaryOp::Neg, Expr::Literal(Literal::Number(2.5)))
        );
        assert_eq!(Expr::number(-0.0), Expr::Literal(Literal::Number(0.0)));
    }

    #[test]
    fn name_transform_only_touches_mapped_names() {
        let expr = Expr::binary_op(BinaryOp::Mul, var("g"), var("V"));
        let names = HashMap::from([("V".to_string(), "U".to_string())]);

        assert_eq!(
            expr.name_transform(&names),
            Expr::binary_op(BinaryOp::Mul, var("g"), var("U"))
        );
    }

    #[test]
    fn substitute_replaces_every_occurrence() {
        let expr = Expr::binary_op(BinaryOp::Add, var("x"), Expr::function_call("f", vec![var("x")]));
        let result = expr.substitute("x", &Expr::number(2.0));

        assert_eq!(
            result,
            Expr::binary_op(
                BinaryOp::Add,
                Expr::number(2.0),
                Expr::function_call("f", vec![Expr::number(2.0)])
            )
        );
    }

    #[test]
    fn rhs_substituted_expands_transitively() {
        let definitions = IndexMap::from([
            ("A".to_string(), Expr::binary_op(BinaryOp::Mul, var("B"), var("k"))),
            ("B".to_string(), Expr::binary_op(BinaryOp::Add, var("x"), Expr::number(1.0))),
        ]);

        let result = var("A").rhs_substituted(&definitions);

        assert_eq!(
            result,
            Expr::binary_op(
                BinaryOp::Mul,
                Expr::binary_op(BinaryOp::Add, var("x"), Expr::number(1.0)),
                var("k")
            )
        );
    }

    #[test]
    fn rhs_substituted_stops_at_self_reference() {
        let definitions = IndexMap::from([(
            "A".to_string(),
            Expr::binary_op(BinaryOp::Add, var("A"), Expr::number(1.0)),
        )]);

        let result = var("A").rhs_substituted(&definitions);

        assert_eq!(
            result,
            Expr::binary_op(BinaryOp::Add, var("A"), Expr::number(1.0))
        );
    }

    #[test]
    fn sum_of_terms() {
        assert_eq!(Expr::sum(Vec::new()), None);
        assert_eq!(Expr::sum([var("a")]), Some(var("a")));
        assert_eq!(
            Expr::sum([var("a"), var("b"), var("c")]),
            Some(Expr::binary_op(
                BinaryOp::Add,
                Expr::binary_op(BinaryOp::Add, var("a"), var("b")),
                var("c")
            ))
        );
    }

    #[test]
    fn boolean_classification() {
        assert!(Expr::binary_op(BinaryOp::GreaterThan, var("V"), var("th")).is_boolean());
        assert!(Expr::unary_op(UnaryOp::Not, var("b")).is_boolean());
        assert!(Expr::boolean(true).is_boolean());
        assert!(!Expr::binary_op(BinaryOp::Add, var("a"), var("b")).is_boolean());
        assert!(!var("b").is_boolean());
    }
}
