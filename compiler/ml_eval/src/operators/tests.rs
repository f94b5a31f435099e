use super::*;
use crate::ValueKind;
use pretty_assertions::assert_eq;

fn binary(op: BinaryOp, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult {
    evaluate_binary(op, &left.into(), &right.into())
}

#[test]
fn arithmetic_on_numbers() {
    assert_eq!(binary(BinaryOp::Add, 2.0, 3.0), Ok(Value::Number(5.0)));
    assert_eq!(binary(BinaryOp::Sub, 2.0, 3.0), Ok(Value::Number(-1.0)));
    assert_eq!(binary(BinaryOp::Div, 3.0, 2.0), Ok(Value::Number(1.5)));
    assert_eq!(binary(BinaryOp::Pow, 2.0, 10.0), Ok(Value::Number(1024.0)));
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(
        binary(BinaryOp::Div, 1.0, 0.0),
        Err(RuntimeError::DivisionByZero)
    );
    assert_eq!(
        binary(BinaryOp::Div, 0.0, -0.0),
        Err(RuntimeError::DivisionByZero)
    );
}

#[test]
fn text_repetition() {
    assert_eq!(binary(BinaryOp::Mul, "ab", 3.0), Ok(Value::text("ababab")));
    assert_eq!(binary(BinaryOp::Mul, "ab", 0.0), Ok(Value::text("")));
    assert_eq!(binary(BinaryOp::Mul, "ab", -1.0), Ok(Value::text("")));
    assert_eq!(binary(BinaryOp::Mul, 2.9, "ab"), Ok(Value::text("abab")));
}

#[test]
fn text_concatenation_and_stringify_append() {
    assert_eq!(binary(BinaryOp::Add, "a", "b"), Ok(Value::text("ab")));
    assert_eq!(
        binary(BinaryOp::Add, "Sum: ", 150.0),
        Ok(Value::text("Sum: 150"))
    );
    assert_eq!(
        binary(BinaryOp::Add, 1.0, "x"),
        Err(RuntimeError::UnsupportedOperation {
            op: "add",
            left: ValueKind::Number,
            right: Some(ValueKind::Text),
        })
    );
}

#[test]
fn comparisons() {
    assert_eq!(binary(BinaryOp::Lt, 1.0, 2.0), Ok(Value::Number(1.0)));
    assert_eq!(binary(BinaryOp::GtEq, 1.0, 2.0), Ok(Value::Number(0.0)));
    assert_eq!(binary(BinaryOp::Eq, "a", "a"), Ok(Value::Number(1.0)));
    assert_eq!(binary(BinaryOp::NotEq, "a", "b"), Ok(Value::Number(1.0)));
    assert!(binary(BinaryOp::Lt, "a", "b").is_err());
}

#[test]
fn mixed_equality_is_never_equal() {
    assert_eq!(binary(BinaryOp::Eq, 1.0, "1"), Ok(Value::Number(0.0)));
    assert_eq!(binary(BinaryOp::NotEq, "1", 1.0), Ok(Value::Number(1.0)));
    assert!(binary(BinaryOp::Gt, "1", 1.0).is_err());
}

#[test]
fn logic_uses_truthiness() {
    assert_eq!(binary(BinaryOp::And, 1.0, 0.0), Ok(Value::Number(0.0)));
    assert_eq!(binary(BinaryOp::Or, 0.0, 2.0), Ok(Value::Number(1.0)));
    assert_eq!(binary(BinaryOp::And, "x", "y"), Ok(Value::Number(1.0)));
    assert_eq!(binary(BinaryOp::Or, "", ""), Ok(Value::Number(0.0)));
    assert!(binary(BinaryOp::And, 1.0, "y").is_err());
}

#[test]
fn sequences_support_no_operators() {
    let seq = Value::sequence(vec![Value::Number(1.0)]);
    let err = evaluate_binary(BinaryOp::Add, &seq, &seq).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported operation 'add' between Sequence and Sequence"
    );
    assert!(evaluate_binary(BinaryOp::Eq, &seq, &seq).is_err());
}

#[test]
fn unary_operators_need_numbers() {
    assert_eq!(
        evaluate_unary(UnaryOp::Neg, &Value::Number(2.0)),
        Ok(Value::Number(-2.0))
    );
    assert_eq!(
        evaluate_unary(UnaryOp::Not, &Value::Number(0.0)),
        Ok(Value::Number(1.0))
    );
    let err = evaluate_unary(UnaryOp::Not, &Value::text("")).unwrap_err();
    assert_eq!(err.to_string(), "unsupported operation 'not' on Text");
}

#[test]
fn indexing() {
    let seq = Value::sequence((1..=5).map(|i| Value::Number(f64::from(i))).collect());
    assert_eq!(
        index_get(&seq, &Value::Number(-1.0)),
        Ok(Value::Number(5.0))
    );
    assert!(matches!(
        index_get(&seq, &Value::Number(1.5)),
        Err(RuntimeError::TypeConversionFailure { target: "index", .. })
    ));
    assert!(index_get(&Value::text("abc"), &Value::Number(0.0)).is_err());

    assert_eq!(index_set(&seq, &Value::Number(0.0), Value::text("x")), Ok(()));
    assert_eq!(seq.render(), "[x, 2, 3, 4, 5]");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arithmetic_matches_host(a in -1.0e9..1.0e9f64, b in -1.0e9..1.0e9f64) {
            prop_assert_eq!(binary(BinaryOp::Add, a, b).unwrap(), Value::Number(a + b));
            prop_assert_eq!(binary(BinaryOp::Sub, a, b).unwrap(), Value::Number(a - b));
            prop_assert_eq!(binary(BinaryOp::Mul, a, b).unwrap(), Value::Number(a * b));
            prop_assert_eq!(binary(BinaryOp::Div, a, 0.0), Err(RuntimeError::DivisionByZero));
        }

        #[test]
        fn repetition_length(text in "[a-z]{0,5}", count in -3.0..8.0f64) {
            let repeated = binary(BinaryOp::Mul, text.as_str(), count).unwrap();
            let expected = if count <= 0.0 { 0 } else { text.len() * count.floor() as usize };
            prop_assert_eq!(repeated.as_text().map(str::len), Some(expected));
        }
    }
}
