//! ML Runtime Library (`libml_rt`)
//!
//! C-ABI entry points called by the C code `ml_codegen` generates. Every
//! entry point is a thin shim over `ml_eval`: values are [`Value`]s, scopes
//! live in the [`Machine`]'s scope arena, and operators, builtins and the
//! model host are the ones the interpreter uses.
//!
//! # Build Modes
//!
//! - **rlib**: for Rust consumers and tests
//! - **staticlib**: `libml_rt.a`, linked into compiled programs
//!
//! # Handles
//!
//! - `ml_runtime_t*` is a boxed [`Machine`], created by [`ml_runtime_new`]
//!   and released by [`ml_runtime_free`].
//! - `const ml_value_t*` points into the value arena of the calling thread.
//!   [`ml_arena_mark`] and [`ml_arena_reset`] release the handles a loop
//!   iteration or top-level statement allocated; everything else is
//!   released with the runtime.
//! - `ml_scope_t` is a [`ScopeId`](ml_eval::ScopeId).
//!
//! # Errors
//!
//! A failing operation prints `Runtime error: <message>` to stderr and
//! exits with status 1. Generated code never sees an error value.
//!
//! # Safety
//!
//! Functions that take raw pointers are called from generated code, which
//! only passes handles obtained from this library and NUL-terminated
//! string literals. They are not marked `unsafe` because they are FFI entry
//! points, not Rust API functions.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    improper_ctypes_definitions,
    reason = "runtime and value handles are opaque to C"
)]
#![allow(
    clippy::not_unsafe_ptr_arg_deref,
    reason = "FFI entry points receive pointers from generated code which guarantees validity"
)]

mod arena;
mod call;
mod ops;
mod scope;

use std::ffi::{c_char, c_int, CStr};
use std::io::Write;

use ml_eval::{EvalResult, Machine, RuntimeError, Value};
use ml_ir::SharedInterner;

pub use arena::live_values;
pub use call::{ml_ai_call, ml_call, ml_embed, ml_function_new, BodyFn, CompiledBody};
pub use ops::{
    ml_add, ml_and, ml_div, ml_eq, ml_gt, ml_gte, ml_index_get, ml_lt, ml_lte, ml_mul, ml_ne,
    ml_neg, ml_not, ml_or, ml_pow, ml_sub,
};
pub use scope::{
    ml_scope_assign, ml_scope_child, ml_scope_define, ml_scope_exit, ml_scope_global,
    ml_scope_lookup,
};

use arena::{alloc, value};

/// Create a runtime with builtins bound in the global scope, printing to
/// stdout.
#[no_mangle]
pub extern "C" fn ml_runtime_new() -> *mut Machine {
    Box::into_raw(Box::new(Machine::new(SharedInterner::new())))
}

/// Release a runtime and every value handle allocated on this thread.
#[no_mangle]
pub extern "C" fn ml_runtime_free(rt: *mut Machine) {
    if rt.is_null() {
        return;
    }
    // SAFETY: rt came from ml_runtime_new (or Box::into_raw in tests) and
    // is not used after this call.
    drop(unsafe { Box::from_raw(rt) });
    arena::release_all();
}

/// Arena position to reset to once the handles allocated after it are no
/// longer used.
#[no_mangle]
pub extern "C" fn ml_arena_mark(_rt: *mut Machine) -> usize {
    arena::mark()
}

/// Release every value handle allocated since `mark`.
#[no_mangle]
pub extern "C" fn ml_arena_reset(_rt: *mut Machine, mark: usize) {
    arena::reset(mark);
}

#[no_mangle]
pub extern "C" fn ml_null(_rt: *mut Machine) -> *const Value {
    alloc(Value::NULL)
}

#[no_mangle]
pub extern "C" fn ml_number(_rt: *mut Machine, number: f64) -> *const Value {
    alloc(Value::Number(number))
}

/// Text from `len` bytes at `data`. Invalid UTF-8 is replaced.
#[no_mangle]
pub extern "C" fn ml_text(_rt: *mut Machine, data: *const c_char, len: usize) -> *const Value {
    if data.is_null() || len == 0 {
        return alloc(Value::text(""));
    }
    // SAFETY: generated code passes a string literal and its byte length.
    let bytes = unsafe { std::slice::from_raw_parts(data.cast::<u8>(), len) };
    alloc(Value::text(String::from_utf8_lossy(bytes).as_ref()))
}

#[no_mangle]
pub extern "C" fn ml_list_new(_rt: *mut Machine) -> *const Value {
    alloc(Value::sequence(Vec::new()))
}

/// Append `item` to the sequence `list` in place.
#[no_mangle]
pub extern "C" fn ml_list_push(_rt: *mut Machine, list: *const Value, item: *const Value) {
    check(list_push(value(list), value(item)));
}

fn list_push(list: &Value, item: &Value) -> EvalResult<()> {
    match list {
        Value::Sequence(seq) => {
            seq.append(item.clone());
            Ok(())
        }
        other => Err(RuntimeError::UnsupportedOperation {
            op: "append",
            left: other.kind(),
            right: Some(item.kind()),
        }),
    }
}

/// 1 when `value` is truthy, 0 otherwise.
#[no_mangle]
pub extern "C" fn ml_truthy(_rt: *mut Machine, value_ptr: *const Value) -> c_int {
    c_int::from(value(value_ptr).is_truthy())
}

/// The number inside `value`; anything else is a conversion failure.
#[no_mangle]
pub extern "C" fn ml_number_value(_rt: *mut Machine, value_ptr: *const Value) -> f64 {
    check(number_value(value(value_ptr)))
}

fn number_value(value: &Value) -> EvalResult<f64> {
    value
        .as_number()
        .ok_or_else(|| RuntimeError::TypeConversionFailure {
            value: value.render(),
            target: "Number",
        })
}

/// The machine behind a runtime handle.
fn machine<'a>(rt: *mut Machine) -> &'a mut Machine {
    // SAFETY: generated code only passes the handle from ml_runtime_new,
    // or the one it received as a function body argument.
    unsafe { &mut *rt }
}

/// A NUL-terminated name from generated code.
fn c_str<'a>(ptr: *const c_char) -> std::borrow::Cow<'a, str> {
    if ptr.is_null() {
        return std::borrow::Cow::Borrowed("");
    }
    // SAFETY: generated code passes string literals.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
}

/// Unwrap a result or end the program with the error.
fn check<T>(result: EvalResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fail(&err),
    }
}

#[cold]
fn fail(err: &RuntimeError) -> ! {
    let _ = std::io::stdout().flush();
    eprintln!("Runtime error: {err}");
    std::process::exit(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on failure")]
mod tests;
