//! Lowered expressions.

use ml_ir::{BinaryOp, UnaryOp};

use crate::StaticType;

/// C expression of type `const ml_value_t*` plus its static type.
///
/// `pure` marks literals: evaluating them cannot fail or have effects, so
/// they may be evaluated in any order relative to their siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeFragment {
    pub text: String,
    pub ty: StaticType,
    pub pure: bool,
}

impl CodeFragment {
    pub fn new(text: impl Into<String>, ty: StaticType) -> Self {
        CodeFragment {
            text: text.into(),
            ty,
            pure: false,
        }
    }

    pub fn literal(text: impl Into<String>, ty: StaticType) -> Self {
        CodeFragment {
            text: text.into(),
            ty,
            pure: true,
        }
    }
}

/// Result type of `left op right` when it follows from the operand types
/// alone.
pub fn binary_type(op: BinaryOp, left: StaticType, right: StaticType) -> StaticType {
    use StaticType::{Number, Text, Unknown};
    match (left, right) {
        (Number, Number) => Number,
        (Text, Text) => match op {
            BinaryOp::Add => Text,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => Number,
            _ => Unknown,
        },
        (Text, Number) | (Number, Text) if op == BinaryOp::Mul => Text,
        (Text, Number) if op == BinaryOp::Add => Text,
        (Text, Number) | (Number, Text) if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) => {
            Number
        }
        _ => Unknown,
    }
}

pub fn unary_type(_op: UnaryOp, operand: StaticType) -> StaticType {
    match operand {
        StaticType::Number => StaticType::Number,
        _ => StaticType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_operand_pairs_have_known_results() {
        use StaticType::{Number, Sequence, Text, Unknown};
        assert_eq!(binary_type(BinaryOp::Div, Number, Number), Number);
        assert_eq!(binary_type(BinaryOp::Add, Text, Text), Text);
        assert_eq!(binary_type(BinaryOp::Mul, Number, Text), Text);
        assert_eq!(binary_type(BinaryOp::Add, Text, Number), Text);
        assert_eq!(binary_type(BinaryOp::Eq, Number, Text), Number);
        assert_eq!(binary_type(BinaryOp::Add, Number, Text), Unknown);
        assert_eq!(binary_type(BinaryOp::Lt, Text, Text), Unknown);
        assert_eq!(binary_type(BinaryOp::Add, Sequence, Sequence), Unknown);
        assert_eq!(binary_type(BinaryOp::Add, Unknown, Number), Unknown);
        assert_eq!(unary_type(UnaryOp::Neg, Number), Number);
        assert_eq!(unary_type(UnaryOp::Not, Text), Unknown);
    }
}
