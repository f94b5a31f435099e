//! Global constants and native functions.
//!
//! Arity is checked by [`Machine::call`] before a native runs, so each
//! function may index its arguments directly.

use crate::errors::{conversion_failure, unsupported_binary, unsupported_unary};
use crate::operators::{index_get, index_set, to_index};
use crate::value::{Arity, Callable, NativeFn, Sequence};
use crate::{EvalResult, Machine, RuntimeError, Value};

const NATIVES: &[(&str, Arity, NativeFn)] = &[
    ("print", Arity::Variadic, print),
    ("input", Arity::Fixed(0), input),
    ("len", Arity::Fixed(1), len),
    ("append", Arity::Fixed(2), append),
    ("pop", Arity::Fixed(2), pop),
    ("get", Arity::Fixed(2), get),
    ("set", Arity::Fixed(3), set),
    ("copy", Arity::Fixed(1), copy),
    ("str", Arity::Fixed(1), str),
    ("num", Arity::Fixed(1), num),
    ("dot", Arity::Fixed(2), dot),
    ("cosine", Arity::Fixed(2), cosine),
];

const CONSTANTS: &[(&str, f64)] = &[
    ("null", 0.0),
    ("true", 1.0),
    ("false", 0.0),
    ("pi", std::f64::consts::PI),
];

/// Bind constants and natives in the global scope of `machine`.
pub(crate) fn register(machine: &mut Machine) {
    for &(name, value) in CONSTANTS {
        machine.define_global(name, Value::Number(value));
    }
    for &(name, arity, func) in NATIVES {
        machine.define_global(name, Value::Callable(Callable::native(name, arity, func)));
    }
}

/// Every name bound in a fresh global scope, constants first.
pub fn global_names() -> impl Iterator<Item = &'static str> {
    CONSTANTS
        .iter()
        .map(|&(name, _)| name)
        .chain(NATIVES.iter().map(|&(name, _, _)| name))
}

fn print(machine: &mut Machine, args: &[Value]) -> EvalResult {
    let line = args.iter().map(Value::render).collect::<Vec<_>>().join(" ");
    machine.println(&line);
    Ok(Value::NULL)
}

fn input(machine: &mut Machine, _: &[Value]) -> EvalResult {
    Ok(Value::text(machine.read_line()))
}

fn len(_: &mut Machine, args: &[Value]) -> EvalResult {
    let count = match &args[0] {
        Value::Sequence(seq) => seq.len(),
        Value::Text(text) => text.chars().count(),
        other => return Err(unsupported_unary("len", other.kind())),
    };
    #[expect(clippy::cast_precision_loss, reason = "lengths stay below 2^52")]
    let count = count as f64;
    Ok(Value::Number(count))
}

fn sequence<'a>(op: &'static str, args: &'a [Value]) -> EvalResult<&'a Sequence> {
    match &args[0] {
        Value::Sequence(seq) => Ok(seq),
        other => Err(unsupported_binary(op, other.kind(), args[1].kind())),
    }
}

fn append(_: &mut Machine, args: &[Value]) -> EvalResult {
    sequence("append", args)?.append(args[1].clone());
    Ok(args[0].clone())
}

fn pop(_: &mut Machine, args: &[Value]) -> EvalResult {
    sequence("pop", args)?.remove(to_index(&args[1])?)
}

fn get(_: &mut Machine, args: &[Value]) -> EvalResult {
    index_get(&args[0], &args[1])
}

fn set(_: &mut Machine, args: &[Value]) -> EvalResult {
    index_set(&args[0], &args[1], args[2].clone())?;
    Ok(args[2].clone())
}

fn copy(_: &mut Machine, args: &[Value]) -> EvalResult {
    Ok(args[0].copy())
}

fn str(_: &mut Machine, args: &[Value]) -> EvalResult {
    Ok(Value::text(args[0].render()))
}

/// Only finite decimal spellings convert; `inf` and `NaN` do not.
fn num(_: &mut Machine, args: &[Value]) -> EvalResult {
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .ok_or_else(|| conversion_failure(&**text, "Number")),
        other => Err(conversion_failure(other.render(), "Number")),
    }
}

/// Elements of a numeric sequence.
fn vector(op: &'static str, value: &Value) -> EvalResult<Vec<f64>> {
    let Value::Sequence(seq) = value else {
        return Err(unsupported_unary(op, value.kind()));
    };
    seq.borrow()
        .iter()
        .map(|item| {
            item.as_number()
                .ok_or_else(|| conversion_failure(item.render(), "Number"))
        })
        .collect()
}

fn vectors(op: &'static str, args: &[Value]) -> EvalResult<(Vec<f64>, Vec<f64>)> {
    let a = vector(op, &args[0])?;
    let b = vector(op, &args[1])?;
    if a.len() != b.len() {
        return Err(RuntimeError::IndexOutOfRange {
            index: i64::try_from(b.len()).unwrap_or(i64::MAX),
            length: a.len(),
        });
    }
    Ok((a, b))
}

fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn dot(_: &mut Machine, args: &[Value]) -> EvalResult {
    let (a, b) = vectors("dot", args)?;
    Ok(Value::Number(dot_product(&a, &b)))
}

fn cosine(_: &mut Machine, args: &[Value]) -> EvalResult {
    let (a, b) = vectors("cosine", args)?;
    let norms = dot_product(&a, &a).sqrt() * dot_product(&b, &b).sqrt();
    if norms == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Number(dot_product(&a, &b) / norms))
}
