//! Scope entry points.
//!
//! Generated code keeps no variables of its own; every read and write of a
//! program variable goes through these, against the scope the lowering
//! tracked for that point in the program.

use std::ffi::{c_char, c_int};

use ml_eval::{EvalResult, Machine, ScopeId, ScopeKind, Value};

use crate::arena::{alloc, value};
use crate::{c_str, check, machine};

#[no_mangle]
pub extern "C" fn ml_scope_global(rt: *mut Machine) -> ScopeId {
    machine(rt).global()
}

/// Kind codes match `ml_scope_kind_t` in the generated header.
fn scope_kind(code: c_int) -> ScopeKind {
    match code {
        1 => ScopeKind::Function,
        3 => ScopeKind::Loop,
        _ => ScopeKind::Branch,
    }
}

#[no_mangle]
pub extern "C" fn ml_scope_child(rt: *mut Machine, parent: ScopeId, kind: c_int) -> ScopeId {
    machine(rt).scopes.child(parent, scope_kind(kind))
}

#[no_mangle]
pub extern "C" fn ml_scope_exit(rt: *mut Machine, scope: ScopeId) {
    machine(rt).scopes.exit(scope);
}

/// Declare `name` in `scope` itself.
#[no_mangle]
pub extern "C" fn ml_scope_define(
    rt: *mut Machine,
    scope: ScopeId,
    name: *const c_char,
    value_ptr: *const Value,
) {
    let machine = machine(rt);
    let name = machine.intern(&c_str(name));
    machine.scopes.define(scope, name, value(value_ptr).clone());
}

/// Rebind `name` where it is declared, searching outwards from `scope`.
#[no_mangle]
pub extern "C" fn ml_scope_assign(
    rt: *mut Machine,
    scope: ScopeId,
    name: *const c_char,
    value_ptr: *const Value,
) {
    check(assign(machine(rt), scope, &c_str(name), value(value_ptr)));
}

pub(crate) fn assign(machine: &mut Machine, scope: ScopeId, name: &str, value: &Value) -> EvalResult<()> {
    let name = machine.intern(name);
    machine.scopes.assign(scope, name, value.clone())
}

#[no_mangle]
pub extern "C" fn ml_scope_lookup(
    rt: *mut Machine,
    scope: ScopeId,
    name: *const c_char,
) -> *const Value {
    alloc(check(lookup(machine(rt), scope, &c_str(name))))
}

pub(crate) fn lookup(machine: &Machine, scope: ScopeId, name: &str) -> EvalResult<Value> {
    machine.scopes.lookup(scope, machine.intern(name))
}
