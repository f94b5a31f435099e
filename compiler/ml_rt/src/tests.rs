//! Tests for the runtime entry points, called the way generated C calls
//! them.

use pretty_assertions::assert_eq;

use ml_eval::{buffer_handler, Machine, RuntimeError, ScopeId, SharedPrintHandler, Value};
use ml_ir::SharedInterner;

use super::*;
use crate::arena::value;

fn runtime() -> (*mut Machine, SharedPrintHandler) {
    let out = buffer_handler();
    let machine = Machine::new(SharedInterner::new()).with_print_handler(out.clone());
    (Box::into_raw(Box::new(machine)), out)
}

fn number(handle: *const Value) -> f64 {
    value(handle).as_number().unwrap()
}

/// Body of `fun double(x) -> x * 2`, as the lowering would emit it.
extern "C" fn double_body(rt: *mut Machine, scope: ScopeId) -> *const Value {
    let x = ml_scope_lookup(rt, scope, c"x".as_ptr());
    ml_mul(rt, x, ml_number(rt, 2.0))
}

/// Body of `fun inc(x) -> x + 1`.
extern "C" fn inc_body(rt: *mut Machine, scope: ScopeId) -> *const Value {
    let x = ml_scope_lookup(rt, scope, c"x".as_ptr());
    ml_add(rt, x, ml_number(rt, 1.0))
}

fn function(rt: *mut Machine, name: &std::ffi::CStr, body: BodyFn) -> *const Value {
    let params = [c"x".as_ptr()];
    ml_function_new(rt, ml_scope_global(rt), name.as_ptr(), body, params.as_ptr(), 1)
}

#[test]
fn arithmetic_goes_through_the_operation_table() {
    let (rt, _) = runtime();
    let sum = ml_add(rt, ml_number(rt, 2.0), ml_number(rt, 3.0));
    assert_eq!(number(sum), 5.0);
    let power = ml_pow(rt, ml_number(rt, 2.0), ml_number(rt, 10.0));
    assert_eq!(number(power), 1024.0);
    let less = ml_lt(rt, ml_number(rt, 1.0), ml_number(rt, 2.0));
    assert_eq!(number(less), 1.0);
    assert_eq!(number(ml_neg(rt, sum)), -5.0);
    ml_runtime_free(rt);
}

#[test]
fn text_repetition_and_concatenation() {
    let (rt, _) = runtime();
    let ab = ml_text(rt, c"ab".as_ptr(), 2);
    let repeated = ml_mul(rt, ab, ml_number(rt, 3.0));
    assert_eq!(value(repeated).as_text(), Some("ababab"));
    let empty = ml_mul(rt, ab, ml_number(rt, -1.0));
    assert_eq!(value(empty).as_text(), Some(""));
    let joined = ml_add(rt, ab, ml_text(rt, c"cd".as_ptr(), 2));
    assert_eq!(value(joined).as_text(), Some("abcd"));
    ml_runtime_free(rt);
}

#[test]
fn text_uses_the_given_length() {
    let (rt, _) = runtime();
    let text = ml_text(rt, c"hello".as_ptr(), 4);
    assert_eq!(value(text).as_text(), Some("hell"));
    ml_runtime_free(rt);
}

#[test]
fn child_scopes_shadow_and_assign_outwards() {
    let (rt, _) = runtime();
    let global = ml_scope_global(rt);
    ml_scope_define(rt, global, c"x".as_ptr(), ml_number(rt, 1.0));
    ml_scope_define(rt, global, c"y".as_ptr(), ml_number(rt, 1.0));

    let branch = ml_scope_child(rt, global, 2);
    ml_scope_define(rt, branch, c"x".as_ptr(), ml_number(rt, 2.0));
    ml_scope_assign(rt, branch, c"y".as_ptr(), ml_number(rt, 3.0));
    assert_eq!(number(ml_scope_lookup(rt, branch, c"x".as_ptr())), 2.0);
    ml_scope_exit(rt, branch);

    assert_eq!(number(ml_scope_lookup(rt, global, c"x".as_ptr())), 1.0);
    assert_eq!(number(ml_scope_lookup(rt, global, c"y".as_ptr())), 3.0);
    ml_runtime_free(rt);
}

#[test]
fn assigning_an_undeclared_name_fails() {
    let mut machine = Machine::new(SharedInterner::new());
    let global = machine.global();
    let err = scope::assign(&mut machine, global, "ghost", &Value::NULL).unwrap_err();
    assert!(matches!(err, RuntimeError::UndefinedVariable(_)));
    let err = scope::lookup(&machine, global, "ghost").unwrap_err();
    assert_eq!(err.to_string(), "'ghost' is not defined");
}

#[test]
fn builtins_are_bound_in_the_global_scope() {
    let (rt, out) = runtime();
    let global = ml_scope_global(rt);
    let print = ml_scope_lookup(rt, global, c"print".as_ptr());
    let args = [ml_text(rt, c"hi".as_ptr(), 2), ml_number(rt, 3.0)];
    let result = ml_call(rt, print, args.as_ptr(), args.len());
    assert_eq!(number(result), 0.0);
    assert_eq!(out.output(), "hi 3\n");
    ml_runtime_free(rt);
}

#[test]
fn lists_grow_in_place_and_index_from_the_end() {
    let (rt, _) = runtime();
    let list = ml_list_new(rt);
    for n in [10.0, 20.0, 30.0] {
        ml_list_push(rt, list, ml_number(rt, n));
    }
    let last = ml_index_get(rt, list, ml_number(rt, -1.0));
    assert_eq!(number(last), 30.0);
    assert_eq!(value(list).render(), "[10, 20, 30]");
    ml_runtime_free(rt);
}

#[test]
fn compiled_bodies_run_in_a_fresh_call_scope() {
    let (rt, _) = runtime();
    let double = function(rt, c"double", double_body);
    assert_eq!(value(double).render(), "<function double>");

    let live = machine(rt).scopes.live_count();
    let args = [ml_number(rt, 21.0)];
    let result = ml_call(rt, double, args.as_ptr(), 1);
    assert_eq!(number(result), 42.0);
    assert_eq!(machine(rt).scopes.live_count(), live);
    ml_runtime_free(rt);
}

#[test]
fn compiled_functions_check_arity() {
    let (rt, _) = runtime();
    let double = function(rt, c"double", double_body);
    let err = machine(rt).call(value(double), &[]).unwrap_err();
    assert_eq!(err.to_string(), "double expects 1 argument(s), got 0");
    ml_runtime_free(rt);
}

#[test]
fn pipe_chain_matches_nested_calls() {
    // `5 | double | inc` lowers to inc(double(5)).
    let (rt, _) = runtime();
    let double = function(rt, c"double", double_body);
    let inc = function(rt, c"inc", inc_body);

    let five = [ml_number(rt, 5.0)];
    let piped = ml_call(rt, double, five.as_ptr(), 1);
    let piped = ml_call(rt, inc, [piped].as_ptr(), 1);

    let inner = machine(rt).call(value(double), &[Value::Number(5.0)]).unwrap();
    let direct = machine(rt).call(value(inc), &[inner]).unwrap();
    assert_eq!(value(piped), &direct);
    assert_eq!(number(piped), 11.0);
    ml_runtime_free(rt);
}

#[test]
fn embed_uses_the_named_model() {
    let (rt, out) = runtime();
    let text = ml_text(rt, c"x".as_ptr(), 1);
    let vector = ml_embed(rt, text, c"default".as_ptr());
    let items = value(vector).as_sequence().unwrap().snapshot();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0], Value::Number(0.0));
    assert_eq!(items[9], Value::Number(0.9));
    assert_eq!(out.output(), "Embedding text with model: default\n");
    ml_runtime_free(rt);
}

#[test]
fn ai_calls_reach_the_model_host() {
    let (rt, out) = runtime();
    let args = [ml_text(rt, c"today".as_ptr(), 5)];
    let reply = ml_ai_call(rt, c"weather".as_ptr(), args.as_ptr(), 1);
    assert_eq!(value(reply).as_text(), Some("AI model response"));
    assert!(out.output().starts_with("Calling AI model: weather\n"));
    ml_runtime_free(rt);
}

#[test]
fn truthiness_and_numeric_conditions() {
    let (rt, _) = runtime();
    assert_eq!(ml_truthy(rt, ml_text(rt, c"".as_ptr(), 0)), 0);
    assert_eq!(ml_truthy(rt, ml_list_new(rt)), 0);
    assert_eq!(ml_truthy(rt, ml_number(rt, -2.0)), 1);
    assert_eq!(ml_number_value(rt, ml_number(rt, 4.5)), 4.5);
    let err = number_value(&Value::text("abc")).unwrap_err();
    assert_eq!(err.to_string(), "cannot convert abc to Number");
    ml_runtime_free(rt);
}

#[test]
fn freeing_the_runtime_releases_value_handles() {
    let (rt, _) = runtime();
    ml_null(rt);
    ml_number(rt, 1.0);
    assert!(live_values() >= 2);
    ml_runtime_free(rt);
    assert_eq!(live_values(), 0);
}

#[test]
fn reset_releases_handles_allocated_after_the_mark() {
    let (rt, _) = runtime();
    let list = ml_list_new(rt);
    let kept = live_values();

    for i in 0..1000 {
        let mark = ml_arena_mark(rt);
        let item = ml_add(rt, ml_number(rt, f64::from(i)), ml_number(rt, 1.0));
        ml_list_push(rt, list, item);
        ml_arena_reset(rt, mark);
        assert_eq!(live_values(), kept);
    }

    let items = value(list).as_sequence().unwrap().snapshot();
    assert_eq!(items.len(), 1000);
    assert_eq!(items[999], Value::Number(1000.0));
    ml_runtime_free(rt);
}

#[test]
fn values_defined_in_a_scope_outlive_a_reset() {
    let (rt, _) = runtime();
    let global = ml_scope_global(rt);
    let mark = ml_arena_mark(rt);
    ml_scope_define(rt, global, c"x".as_ptr(), ml_text(rt, c"kept".as_ptr(), 4));
    ml_arena_reset(rt, mark);
    assert_eq!(live_values(), mark);

    let x = ml_scope_lookup(rt, global, c"x".as_ptr());
    assert_eq!(value(x).as_text(), Some("kept"));
    ml_runtime_free(rt);
}

#[test]
fn pushing_onto_a_non_sequence_is_unsupported() {
    let err = list_push(&Value::Number(1.0), &Value::NULL).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::UnsupportedOperation { op: "append", .. }
    ));
}
