//! PowerShell token kinds mapped to canonical IR operators.
//!
//! The tables are explicit and read-only. A token missing from a table maps
//! to the `Unknown` operator instead of failing, so a partial conversion is
//! still a complete tree.

use crate::ir::{BinaryOperator, UnaryOperator};

/// Binary operator token kinds. Case-sensitive (`C*`) and case-insensitive
/// (`I*`) comparisons collapse to one canonical operator.
pub static BINARY_OPERATORS: &[(&str, BinaryOperator)] = &[
    ("Plus", BinaryOperator::Add),
    ("Minus", BinaryOperator::Subtract),
    ("Multiply", BinaryOperator::Multiply),
    ("Divide", BinaryOperator::Divide),
    ("Rem", BinaryOperator::Modulo),
    ("Ieq", BinaryOperator::Equal),
    ("Ceq", BinaryOperator::Equal),
    ("Ine", BinaryOperator::NotEqual),
    ("Cne", BinaryOperator::NotEqual),
    ("Ilt", BinaryOperator::LessThan),
    ("Clt", BinaryOperator::LessThan),
    ("Ile", BinaryOperator::LessThanOrEqual),
    ("Cle", BinaryOperator::LessThanOrEqual),
    ("Igt", BinaryOperator::GreaterThan),
    ("Cgt", BinaryOperator::GreaterThan),
    ("Ige", BinaryOperator::GreaterThanOrEqual),
    ("Cge", BinaryOperator::GreaterThanOrEqual),
    ("And", BinaryOperator::And),
    ("Or", BinaryOperator::Or),
    ("Xor", BinaryOperator::ExclusiveOr),
    ("Band", BinaryOperator::BitwiseAnd),
    ("Bor", BinaryOperator::BitwiseOr),
    ("Bxor", BinaryOperator::BitwiseXor),
    ("Shl", BinaryOperator::LeftShift),
    ("Shr", BinaryOperator::RightShift),
    ("Is", BinaryOperator::Is),
    ("As", BinaryOperator::As),
];

/// Where a unary operator sits relative to its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Postfix,
}

pub static UNARY_OPERATORS: &[(&str, UnaryOperator, Fixity)] = &[
    ("PlusPlus", UnaryOperator::Increment, Fixity::Prefix),
    ("MinusMinus", UnaryOperator::Decrement, Fixity::Prefix),
    ("PostfixPlusPlus", UnaryOperator::Increment, Fixity::Postfix),
    ("PostfixMinusMinus", UnaryOperator::Decrement, Fixity::Postfix),
    ("Not", UnaryOperator::Not, Fixity::Prefix),
    ("Exclaim", UnaryOperator::Not, Fixity::Prefix),
    ("Minus", UnaryOperator::Negate, Fixity::Prefix),
    ("Plus", UnaryOperator::Plus, Fixity::Prefix),
    ("Bnot", UnaryOperator::BitwiseNot, Fixity::Prefix),
];

/// Compound assignment token kinds and the binary operator they apply.
pub static COMPOUND_ASSIGNMENTS: &[(&str, BinaryOperator)] = &[
    ("PlusEquals", BinaryOperator::Add),
    ("MinusEquals", BinaryOperator::Subtract),
    ("MultiplyEquals", BinaryOperator::Multiply),
    ("DivideEquals", BinaryOperator::Divide),
    ("RemainderEquals", BinaryOperator::Modulo),
];

pub fn binary_operator(token: &str) -> BinaryOperator {
    BINARY_OPERATORS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
        .unwrap_or(BinaryOperator::Unknown)
}

/// Unknown unary tokens are treated as prefix.
pub fn unary_operator(token: &str) -> (UnaryOperator, Fixity) {
    UNARY_OPERATORS
        .iter()
        .find(|(t, _, _)| *t == token)
        .map(|(_, op, fixity)| (*op, *fixity))
        .unwrap_or((UnaryOperator::Unknown, Fixity::Prefix))
}

pub fn compound_assignment(token: &str) -> BinaryOperator {
    COMPOUND_ASSIGNMENTS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
        .unwrap_or(BinaryOperator::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binary_token_maps_to_its_operator() {
        for (token, op) in BINARY_OPERATORS {
            assert_eq!(binary_operator(token), *op, "token {token}");
            assert_ne!(*op, BinaryOperator::Unknown);
        }
    }

    #[test]
    fn test_unlisted_binary_tokens_are_unknown() {
        for token in ["Imatch", "Ilike", "Join", "Format", "DotDot", "", "ieq"] {
            assert_eq!(binary_operator(token), BinaryOperator::Unknown, "token {token}");
        }
    }

    #[test]
    fn test_every_unary_token_maps_to_its_operator() {
        for (token, op, fixity) in UNARY_OPERATORS {
            assert_eq!(unary_operator(token), (*op, *fixity), "token {token}");
        }
        assert_eq!(
            unary_operator("Csplit"),
            (UnaryOperator::Unknown, Fixity::Prefix)
        );
    }

    #[test]
    fn test_compound_assignments() {
        for (token, op) in COMPOUND_ASSIGNMENTS {
            assert_eq!(compound_assignment(token), *op);
        }
        assert_eq!(compound_assignment("Equals"), BinaryOperator::Unknown);
    }
}
