//! Functions, calls and model requests.

use std::ffi::c_char;
use std::rc::Rc;

use ml_eval::{Callable, EvalResult, FunctionBody, Machine, ScopeId, UserFunction, Value};

use crate::arena::{alloc, value, values};
use crate::{c_str, check, machine};

/// Signature of a lowered function body (`ml_body_fn` in C).
pub type BodyFn = extern "C" fn(rt: *mut Machine, scope: ScopeId) -> *const Value;

/// A function body compiled to native code.
///
/// The machine binds the parameters in `scope` before calling; the body
/// returns a value handle.
pub struct CompiledBody(pub BodyFn);

impl FunctionBody for CompiledBody {
    fn execute(&self, machine: &mut Machine, scope: ScopeId) -> EvalResult {
        let result = (self.0)(machine, scope);
        Ok(value(result).clone())
    }
}

/// Create a closure over `closure` named `name`, taking `param_count`
/// parameters named by `params`.
#[no_mangle]
pub extern "C" fn ml_function_new(
    rt: *mut Machine,
    closure: ScopeId,
    name: *const c_char,
    body: BodyFn,
    params: *const *const c_char,
    param_count: usize,
) -> *const Value {
    let machine = machine(rt);
    let params = if params.is_null() || param_count == 0 {
        Vec::new()
    } else {
        // SAFETY: generated code passes an array literal of `param_count`
        // string literals.
        let names = unsafe { std::slice::from_raw_parts(params, param_count) };
        names.iter().map(|&name| machine.intern(&c_str(name))).collect()
    };
    machine.scopes.capture(closure);
    let function = UserFunction {
        params,
        closure,
        body: Rc::new(CompiledBody(body)),
    };
    alloc(Value::Callable(Callable::user(&c_str(name), function)))
}

#[no_mangle]
pub extern "C" fn ml_call(
    rt: *mut Machine,
    callee: *const Value,
    args: *const *const Value,
    arg_count: usize,
) -> *const Value {
    let args = values(args, arg_count);
    alloc(check(machine(rt).call(value(callee), &args)))
}

/// `EMBED text WITH model`
#[no_mangle]
pub extern "C" fn ml_embed(
    rt: *mut Machine,
    text: *const Value,
    model: *const c_char,
) -> *const Value {
    alloc(check(machine(rt).embed(value(text), &c_str(model))))
}

/// `AI model(args...)`
#[no_mangle]
pub extern "C" fn ml_ai_call(
    rt: *mut Machine,
    model: *const c_char,
    args: *const *const Value,
    arg_count: usize,
) -> *const Value {
    let args = values(args, arg_count);
    alloc(check(machine(rt).ai_call(&c_str(model), &args)))
}
