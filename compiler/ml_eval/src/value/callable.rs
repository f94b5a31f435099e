//! Native and user-defined functions.

use std::fmt;
use std::rc::Rc;

use ml_ir::Name;

use crate::{EvalResult, Machine, ScopeId, Value};

/// Signature of a builtin operation.
pub type NativeFn = fn(&mut Machine, &[Value]) -> EvalResult;

/// Accepted argument count of a native function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Variadic => true,
        }
    }
}

/// Code run when a user function is called.
///
/// The interpreter implements this over the syntax tree; compiled programs
/// implement it over a generated C function. `scope` is a fresh call scope
/// whose parent is the function's closure, with parameters already bound.
pub trait FunctionBody {
    fn execute(&self, machine: &mut Machine, scope: ScopeId) -> EvalResult;
}

/// A user-defined function and the scope it closes over.
#[derive(Clone)]
pub struct UserFunction {
    pub params: Vec<Name>,
    pub closure: ScopeId,
    pub body: Rc<dyn FunctionBody>,
}

#[derive(Clone)]
pub enum CallableKind {
    Native { arity: Arity, func: NativeFn },
    User(UserFunction),
}

struct CallableInner {
    name: Rc<str>,
    kind: CallableKind,
}

/// A function value. Clones share the same function.
#[derive(Clone)]
pub struct Callable(Rc<CallableInner>);

impl Callable {
    pub fn native(name: &str, arity: Arity, func: NativeFn) -> Self {
        Callable(Rc::new(CallableInner {
            name: name.into(),
            kind: CallableKind::Native { arity, func },
        }))
    }

    pub fn user(name: &str, function: UserFunction) -> Self {
        Callable(Rc::new(CallableInner {
            name: name.into(),
            kind: CallableKind::User(function),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> &CallableKind {
        &self.0.kind
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name())
    }
}
