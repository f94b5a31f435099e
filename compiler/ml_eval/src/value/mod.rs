//! The value model.
//!
//! A [`Value`] is exactly one of Number, Text, Sequence or Callable.
//! Numbers and texts are immutable. Sequences and callables are shared by
//! reference: binding one to a second name aliases it, and only
//! [`Value::copy`] produces an independent sequence.

mod callable;
mod sequence;

use std::fmt;
use std::rc::Rc;

pub use callable::{Arity, Callable, CallableKind, FunctionBody, NativeFn, UserFunction};
pub use sequence::Sequence;

/// Discriminant of a [`Value`], used in error messages and static typing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Text,
    Sequence,
    Callable,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Number => "Number",
            ValueKind::Text => "Text",
            ValueKind::Sequence => "Sequence",
            ValueKind::Callable => "Callable",
        })
    }
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    Text(Rc<str>),
    Sequence(Sequence),
    Callable(Callable),
}

impl Value {
    /// The language has no separate null; `null` is the number zero.
    pub const NULL: Value = Value::Number(0.0);

    #[inline]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    #[inline]
    pub fn text(s: impl Into<Rc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn sequence(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence::new(items))
    }

    /// Booleans are the numbers 1 and 0.
    #[inline]
    pub fn boolean(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Callable(_) => ValueKind::Callable,
        }
    }

    /// Scalars are returned as-is; sequences are copied element by element,
    /// recursively.
    #[must_use]
    pub fn copy(&self) -> Value {
        match self {
            Value::Sequence(seq) => Value::Sequence(seq.deep_copy()),
            other => other.clone(),
        }
    }

    /// Canonical text form, as printed by `print` and produced by `str`.
    /// A sequence that contains itself renders the inner occurrence as
    /// `[...]`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, &mut Vec::new());
        out
    }

    /// `open` holds the sequences being rendered around this value.
    fn render_into(&self, out: &mut String, open: &mut Vec<Sequence>) {
        match self {
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::Text(s) => out.push_str(s),
            Value::Sequence(seq) if open.iter().any(|outer| outer.ptr_eq(seq)) => {
                out.push_str("[...]");
            }
            Value::Sequence(seq) => {
                open.push(seq.clone());
                out.push('[');
                for (i, item) in seq.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render_into(out, open);
                }
                out.push(']');
                open.pop();
            }
            Value::Callable(callable) => {
                out.push_str("<function ");
                out.push_str(callable.name());
                out.push('>');
            }
        }
    }

    /// Number: nonzero. Text and Sequence: non-empty. Callable: always.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Sequence(seq) => !seq.is_empty(),
            Value::Callable(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }
}

/// Integral values print without a fraction (`150`, not `150.0`); all
/// others use the shortest representation that round-trips. Negative zero
/// prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_owned()
    } else if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Structural equality for tests and assertions: sequences compare by
/// elements, callables by identity. This is not the language's `==`.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }
}

/// `open` holds the sequence pairs being compared around `a` and `b`. A
/// pair met again is assumed equal; its elements are checked where it was
/// first met.
fn structural_eq(a: &Value, b: &Value, open: &mut Vec<(Sequence, Sequence)>) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Sequence(a), Value::Sequence(b)) => {
            if a.ptr_eq(b) || open.iter().any(|(x, y)| x.ptr_eq(a) && y.ptr_eq(b)) {
                return true;
            }
            let (left, right) = (a.snapshot(), b.snapshot());
            if left.len() != right.len() {
                return false;
            }
            open.push((a.clone(), b.clone()));
            let equal = left
                .iter()
                .zip(&right)
                .all(|(x, y)| structural_eq(x, y, open));
            open.pop();
            equal
        }
        (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
        _ => false,
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.render()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.into())
    }
}

#[cfg(test)]
mod tests;
