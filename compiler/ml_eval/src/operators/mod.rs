//! The value operation table.
//!
//! Every operator of the language is dispatched here on the pair of operand
//! kinds. The interpreter calls these functions directly and the C runtime
//! wraps them, so both execution modes share one set of semantics.

use ml_ir::{BinaryOp, UnaryOp};

use crate::errors::{conversion_failure, unsupported_binary, unsupported_unary};
use crate::value::format_number;
use crate::{EvalResult, RuntimeError, Value};

/// Evaluate `left op right`.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => number_binary(op, *a, *b),
        (Value::Text(a), Value::Text(b)) => text_binary(op, a, b),
        (Value::Text(text), Value::Number(count)) | (Value::Number(count), Value::Text(text))
            if op == BinaryOp::Mul =>
        {
            repeat(text, *count)
        }
        (Value::Text(text), Value::Number(n)) if op == BinaryOp::Add => {
            let mut joined = String::from(&**text);
            joined.push_str(&format_number(*n));
            Ok(Value::text(joined))
        }
        (Value::Number(_), Value::Text(_)) | (Value::Text(_), Value::Number(_)) => match op {
            BinaryOp::Eq => Ok(Value::boolean(false)),
            BinaryOp::NotEq => Ok(Value::boolean(true)),
            _ => Err(mismatch(op, left, right)),
        },
        _ => Err(mismatch(op, left, right)),
    }
}

fn number_binary(op: BinaryOp, a: f64, b: f64) -> EvalResult {
    Ok(match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Number(a / b)
        }
        BinaryOp::Pow => Value::Number(a.powf(b)),
        BinaryOp::Eq => Value::boolean(a == b),
        BinaryOp::NotEq => Value::boolean(a != b),
        BinaryOp::Lt => Value::boolean(a < b),
        BinaryOp::Gt => Value::boolean(a > b),
        BinaryOp::LtEq => Value::boolean(a <= b),
        BinaryOp::GtEq => Value::boolean(a >= b),
        BinaryOp::And => Value::boolean(a != 0.0 && b != 0.0),
        BinaryOp::Or => Value::boolean(a != 0.0 || b != 0.0),
    })
}

fn text_binary(op: BinaryOp, a: &str, b: &str) -> EvalResult {
    match op {
        BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::text(joined))
        }
        BinaryOp::Eq => Ok(Value::boolean(a == b)),
        BinaryOp::NotEq => Ok(Value::boolean(a != b)),
        BinaryOp::And => Ok(Value::boolean(!a.is_empty() && !b.is_empty())),
        BinaryOp::Or => Ok(Value::boolean(!a.is_empty() || !b.is_empty())),
        _ => Err(unsupported_binary(
            op.runtime_name(),
            crate::ValueKind::Text,
            crate::ValueKind::Text,
        )),
    }
}

/// `text * count`: `floor(count)` copies; zero, negative and NaN give "".
fn repeat(text: &str, count: f64) -> EvalResult {
    let count = count.floor();
    if count.is_nan() || count <= 0.0 || text.is_empty() {
        return Ok(Value::text(""));
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "count is positive and saturates; the checked_mul below bounds it"
    )]
    let times = count as usize;
    if text.len().checked_mul(times).is_none() {
        return Err(conversion_failure(format_number(count), "repeat count"));
    }
    Ok(Value::text(text.repeat(times)))
}

/// Evaluate `op operand`. Both operators accept only Numbers.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Not, Value::Number(n)) => Ok(Value::boolean(*n == 0.0)),
        _ => Err(unsupported_unary(op.runtime_name(), operand.kind())),
    }
}

/// Integral index from a value. Fractional numbers and non-numbers fail.
pub fn to_index(value: &Value) -> EvalResult<i64> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "integral and well inside the i64 range"
            )]
            let index = *n as i64;
            Ok(index)
        }
        other => Err(conversion_failure(other.render(), "index")),
    }
}

/// `target[index]`.
pub fn index_get(target: &Value, index: &Value) -> EvalResult {
    match target {
        Value::Sequence(seq) => seq.get(to_index(index)?),
        other => Err(unsupported_binary("get", other.kind(), index.kind())),
    }
}

/// `set(target, index, value)`.
pub fn index_set(target: &Value, index: &Value, value: Value) -> EvalResult<()> {
    match target {
        Value::Sequence(seq) => seq.set(to_index(index)?, value),
        other => Err(unsupported_binary("set", other.kind(), index.kind())),
    }
}

#[cold]
fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    unsupported_binary(op.runtime_name(), left.kind(), right.kind())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on failure")]
mod tests;
