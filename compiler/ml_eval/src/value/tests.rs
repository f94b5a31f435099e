use super::*;
use crate::RuntimeError;
use pretty_assertions::assert_eq;

fn numbers(items: &[f64]) -> Value {
    Value::sequence(items.iter().copied().map(Value::Number).collect())
}

#[test]
fn integral_numbers_render_without_fraction() {
    assert_eq!(Value::Number(150.0).render(), "150");
    assert_eq!(Value::Number(-3.0).render(), "-3");
    assert_eq!(Value::Number(2.5).render(), "2.5");
    assert_eq!(Value::Number(0.1).render(), "0.1");
    assert_eq!(format_number(1e20), "100000000000000000000");
    assert_eq!(format_number(f64::INFINITY), "inf");
}

#[test]
fn negative_zero_renders_as_zero() {
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(Value::Number(-0.0).render(), "0");
}

#[test]
fn sequences_render_their_elements() {
    let nested = Value::sequence(vec![
        Value::Number(1.0),
        Value::text("a"),
        numbers(&[2.0, 3.5]),
    ]);
    assert_eq!(nested.render(), "[1, a, [2, 3.5]]");
    assert_eq!(numbers(&[]).render(), "[]");
}

#[test]
fn callables_render_with_their_name() {
    fn noop(_: &mut crate::Machine, _: &[Value]) -> crate::EvalResult {
        Ok(Value::NULL)
    }
    let f = Value::Callable(Callable::native("noop", Arity::Fixed(0), noop));
    assert_eq!(f.render(), "<function noop>");
    assert!(f.is_truthy());
}

#[test]
fn truthiness() {
    assert!(!Value::Number(0.0).is_truthy());
    assert!(Value::Number(-0.5).is_truthy());
    assert!(!Value::text("").is_truthy());
    assert!(Value::text("x").is_truthy());
    assert!(!numbers(&[]).is_truthy());
    assert!(numbers(&[0.0]).is_truthy());
}

#[test]
fn clone_aliases_but_copy_is_independent() {
    let original = numbers(&[1.0, 2.0]);
    let alias = original.clone();
    let copied = original.copy();

    if let Some(seq) = alias.as_sequence() {
        seq.append(Value::Number(3.0));
    }
    assert_eq!(original.render(), "[1, 2, 3]");
    assert_eq!(copied.render(), "[1, 2]");
}

#[test]
fn copy_is_deep_and_idempotent() {
    let inner = numbers(&[1.0]);
    let outer = Value::sequence(vec![inner.clone()]);
    let once = outer.copy();
    let twice = once.copy();
    assert_eq!(once.render(), twice.render());

    if let Some(seq) = inner.as_sequence() {
        seq.append(Value::Number(2.0));
    }
    assert_eq!(outer.render(), "[[1, 2]]");
    assert_eq!(once.render(), "[[1]]");

    if let Some(seq) = once.as_sequence() {
        seq.append(Value::Number(9.0));
    }
    assert_eq!(twice.render(), "[[1]]");
}

#[test]
fn negative_indices_count_from_the_end() {
    let seq = Sequence::new((0..5).map(|i| Value::Number(f64::from(i))).collect());
    assert_eq!(seq.get(-1), Ok(Value::Number(4.0)));
    assert_eq!(seq.get(0), Ok(Value::Number(0.0)));
    assert_eq!(
        seq.get(5),
        Err(RuntimeError::IndexOutOfRange {
            index: 5,
            length: 5
        })
    );
    assert_eq!(
        seq.get(-6),
        Err(RuntimeError::IndexOutOfRange {
            index: -6,
            length: 5
        })
    );
}

#[test]
fn set_and_remove_use_the_same_normalization() {
    let seq = Sequence::new(vec![Value::Number(1.0), Value::Number(2.0)]);
    assert_eq!(seq.set(-2, Value::text("a")), Ok(()));
    assert_eq!(seq.remove(-1), Ok(Value::Number(2.0)));
    assert_eq!(seq.snapshot(), vec![Value::text("a")]);
    assert!(seq.remove(1).is_err());
}

#[test]
fn kinds_display_their_names() {
    assert_eq!(Value::NULL.kind(), ValueKind::Number);
    assert_eq!(ValueKind::Sequence.to_string(), "Sequence");
    assert_eq!(Value::boolean(true), Value::Number(1.0));
}

fn self_containing() -> (Sequence, Value) {
    let seq = Sequence::new(vec![Value::Number(1.0)]);
    let value = Value::Sequence(seq.clone());
    seq.append(value.clone());
    (seq, value)
}

#[test]
fn a_sequence_containing_itself_renders_once() {
    let (seq, value) = self_containing();
    assert_eq!(value.render(), "[1, [...]]");
    assert_eq!(format!("{seq:?}"), "[1, [...]]");

    // Shared but acyclic elements are rendered in full each time.
    let inner = numbers(&[2.0]);
    let twice = Value::sequence(vec![inner.clone(), inner]);
    assert_eq!(twice.render(), "[[2], [2]]");
}

#[test]
fn copying_a_cycle_keeps_the_cycle() {
    let (seq, value) = self_containing();
    let copy = value.copy();
    let copied = copy.as_sequence().unwrap();
    assert!(!copied.ptr_eq(&seq));
    let inner = copied.get(1).unwrap();
    assert!(inner.as_sequence().unwrap().ptr_eq(copied));

    seq.append(Value::Number(2.0));
    assert_eq!(copied.len(), 2);
    assert_eq!(copy.render(), "[1, [...]]");
}

#[test]
fn cyclic_sequences_compare_without_recursing_forever() {
    let (_, a) = self_containing();
    let (_, b) = self_containing();
    assert_eq!(a, b);
    assert_eq!(a, a.copy());

    let (c, c_value) = self_containing();
    c.append(Value::Number(3.0));
    assert_ne!(a, c_value);
}
