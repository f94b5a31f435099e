//! Runtime errors.
//!
//! Raised while executing interpreted or compiled code. None of them are
//! recovered from: they terminate the running program and are reported
//! with their message.

use thiserror::Error;

use crate::ValueKind;

/// Errors raised by value operations, scope resolution and calls.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("'{0}' is not defined")]
    UndefinedVariable(String),

    /// `right` is `None` for unary operations and calls.
    #[error("unsupported operation '{op}' {}", operands(.left, .right))]
    UnsupportedOperation {
        op: &'static str,
        left: ValueKind,
        right: Option<ValueKind>,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} is out of range for a sequence of length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("cannot convert {value} to {target}")]
    TypeConversionFailure { value: String, target: &'static str },
}

fn operands(left: &ValueKind, right: &Option<ValueKind>) -> String {
    match right {
        Some(right) => format!("between {left} and {right}"),
        None => format!("on {left}"),
    }
}

/// Result of evaluating a value operation.
pub type EvalResult<T = crate::Value> = Result<T, RuntimeError>;

/// `UnsupportedOperation` for a binary operation.
#[cold]
pub fn unsupported_binary(op: &'static str, left: ValueKind, right: ValueKind) -> RuntimeError {
    RuntimeError::UnsupportedOperation {
        op,
        left,
        right: Some(right),
    }
}

/// `UnsupportedOperation` for a unary operation or a call.
#[cold]
pub fn unsupported_unary(op: &'static str, operand: ValueKind) -> RuntimeError {
    RuntimeError::UnsupportedOperation {
        op,
        left: operand,
        right: None,
    }
}

#[cold]
pub fn conversion_failure(value: impl Into<String>, target: &'static str) -> RuntimeError {
    RuntimeError::TypeConversionFailure {
        value: value.into(),
        target,
    }
}
