//! Printing expressions back to text.
//!
//! The printer emits the fewest parentheses needed for the output to parse
//! back into the same tree.

use std::fmt;

use crate::expr::{BinaryOp, Expr, Literal, UnaryOp};

const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const NEGATION: u8 = 7;
const POWER: u8 = 8;
const ATOM: u8 = 9;

const fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => OR,
        BinaryOp::And => AND,
        BinaryOp::LessThan
        | BinaryOp::LessThanEq
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanEq
        | BinaryOp::Eq
        | BinaryOp::NotEq => COMPARISON,
        BinaryOp::Add | BinaryOp::Sub => ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div => MULTIPLICATIVE,
        BinaryOp::Pow => POWER,
    }
}

const fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::BinaryOp { op, .. } => binary_precedence(*op),
        Expr::UnaryOp {
            op: UnaryOp::Neg, ..
        } => NEGATION,
        Expr::UnaryOp {
            op: UnaryOp::Not, ..
        } => NOT,
        Expr::FunctionCall { .. } | Expr::Variable(_) | Expr::Literal(_) => ATOM,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryOp { op, left, right } => {
                let own = binary_precedence(*op);
                let (left_parens, right_parens) = match own {
                    // the base of a power must be a primary
                    POWER => (precedence(left) < ATOM, precedence(right) < NEGATION),
                    // comparisons do not chain
                    COMPARISON => (precedence(left) <= own, precedence(right) <= own),
                    _ => (precedence(left) < own, precedence(right) <= own),
                };

                write_operand(f, left, left_parens)?;
                if *op == BinaryOp::Pow {
                    write!(f, "^")?;
                } else {
                    write!(f, " {} ", op.symbol())?;
                }
                write_operand(f, right, right_parens)
            }
            Self::UnaryOp { op, expr } => {
                let parenthesize = match op {
                    UnaryOp::Neg => precedence(expr) < POWER,
                    UnaryOp::Not => precedence(expr) < COMPARISON,
                };
                write!(f, "{}", op.symbol())?;
                write_operand(f, expr, parenthesize)
            }
            Self::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Variable(name) => write!(f, "{name}"),
            Self::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_expression;

    fn reprint(input: &str) -> String {
        parse_expression(input)
            .expect("input should parse")
            .to_string()
    }

    #[test]
    fn minimal_parentheses() {
        assert_eq!(reprint("(a + b) * c"), "(a + b) * c");
        assert_eq!(reprint("a + (b * c)"), "a + b * c");
        assert_eq!(reprint("a - (b - c)"), "a - (b - c)");
        assert_eq!(reprint("(a - b) - c"), "a - b - c");
        assert_eq!(reprint("a / (b * c)"), "a / (b * c)");
    }

    #[test]
    fn power_and_negation() {
        assert_eq!(reprint("-x ^ 2"), "-x^2");
        assert_eq!(reprint("(-x) ^ 2"), "(-x)^2");
        assert_eq!(reprint("a ** b ** c"), "a^b^c");
        assert_eq!(reprint("(a ^ b) ^ c"), "(a^b)^c");
        assert_eq!(reprint("2 ^ -1"), "2^-1");
        assert_eq!(reprint("-(-x)"), "-(-x)");
    }

    #[test]
    fn boolean_operators() {
        assert_eq!(reprint("V > th && !(a || b)"), "V > th && !(a || b)");
        assert_eq!(reprint("(a < b) == c"), "(a < b) == c");
        assert_eq!(reprint("!(a < b)"), "!a < b");
    }

    #[test]
    fn function_calls_and_literals() {
        assert_eq!(reprint("exp( -V/ 10.0 )"), "exp(-V / 10)");
        assert_eq!(reprint("atan2(y,x)+1.5"), "atan2(y, x) + 1.5");
        assert_eq!(reprint("true || false"), "true || false");
    }

    #[test]
    fn printed_text_parses_to_the_same_tree() {
        for input in [
            "g * (E - V)",
            "-(a + b) / c ^ -d",
            "!(V >= 0 || x != 1) && y",
            "a - -b",
            "f(a, g(b, c ^ (d + e)))",
        ] {
            let expr = parse_expression(input).expect("input should parse");
            let reparsed = parse_expression(&expr.to_string()).expect("output should parse");
            assert_eq!(expr, reparsed, "{input} printed as {expr}");
        }
    }
}
