//! Shared execution state.
//!
//! A [`Machine`] owns everything a running program touches: the scope
//! arena, the interner that maps identifiers to [`Name`]s, the output sink,
//! stdin and the model host. The interpreter and the C runtime both drive
//! programs through it.

use std::io::{BufRead, BufReader};
use std::rc::Rc;

use ml_ir::{Name, SharedInterner};

use crate::builtins;
use crate::environment::{ScopeArena, ScopeId, ScopeKind};
use crate::errors::unsupported_unary;
use crate::models::{ModelHost, PlaceholderModels};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::value::{Arity, Callable, CallableKind, UserFunction};
use crate::{EvalResult, RuntimeError, Value};

/// Model name used by `EMBED` without a `WITH` clause.
pub const DEFAULT_MODEL: &str = "default";

pub struct Machine {
    pub scopes: ScopeArena,
    interner: SharedInterner,
    print: SharedPrintHandler,
    models: Box<dyn ModelHost>,
    input: Box<dyn BufRead>,
}

impl Machine {
    /// A machine with builtins and constants bound in the global scope,
    /// printing to stdout and reading stdin.
    pub fn new(interner: SharedInterner) -> Self {
        let mut machine = Machine {
            scopes: ScopeArena::new(interner.clone()),
            interner,
            print: stdout_handler(),
            models: Box::new(PlaceholderModels::new()),
            input: Box::new(BufReader::new(std::io::stdin())),
        };
        builtins::register(&mut machine);
        machine
    }

    #[must_use]
    pub fn with_print_handler(mut self, print: SharedPrintHandler) -> Self {
        self.print = print;
        self
    }

    #[must_use]
    pub fn with_models(mut self, models: impl ModelHost + 'static) -> Self {
        self.models = Box::new(models);
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    #[inline]
    pub fn global(&self) -> ScopeId {
        self.scopes.global()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print
    }

    /// Bind a global constant or native function.
    pub fn define_global(&mut self, name: &str, value: Value) {
        let name = self.interner.intern(name);
        self.scopes.define(ScopeId::GLOBAL, name, value);
    }

    /// Invoke `callee` with positional `args`.
    ///
    /// User functions run in a fresh function scope whose parent is their
    /// closure; the scope is released when the body finishes, whatever the
    /// outcome.
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> EvalResult {
        let Value::Callable(callable) = callee else {
            return Err(unsupported_unary("call", callee.kind()));
        };
        tracing::trace!(function = callable.name(), args = args.len(), "call");
        match callable.kind() {
            CallableKind::Native { arity, func } => {
                if let Arity::Fixed(expected) = *arity {
                    if expected != args.len() {
                        return Err(arity_mismatch(callable, expected, args.len()));
                    }
                }
                func(self, args)
            }
            CallableKind::User(function) => self.call_user(callable, function, args),
        }
    }

    fn call_user(
        &mut self,
        callable: &Callable,
        function: &UserFunction,
        args: &[Value],
    ) -> EvalResult {
        if function.params.len() != args.len() {
            return Err(arity_mismatch(callable, function.params.len(), args.len()));
        }
        let scope = self.scopes.child(function.closure, ScopeKind::Function);
        for (&param, arg) in function.params.iter().zip(args) {
            self.scopes.define(scope, param, arg.clone());
        }
        let body = Rc::clone(&function.body);
        let result = body.execute(self, scope);
        self.scopes.exit(scope);
        result
    }

    /// `EMBED text WITH model`.
    pub fn embed(&mut self, text: &Value, model: &str) -> EvalResult {
        let Value::Text(text) = text else {
            return Err(unsupported_unary("embed", text.kind()));
        };
        let vector = self.models.embed(text, model, &self.print)?;
        Ok(Value::sequence(vector.into_iter().map(Value::Number).collect()))
    }

    /// `AI model(args...)`.
    pub fn ai_call(&mut self, model: &str, args: &[Value]) -> EvalResult {
        self.models.call(model, args, &self.print)
    }

    pub fn println(&self, line: &str) {
        self.print.println(line);
    }

    /// One line of input without its line terminator. End of input (or an
    /// unreadable stdin) reads as an empty line.
    pub fn read_line(&mut self) -> String {
        let mut line = String::new();
        if self.input.read_line(&mut line).is_err() {
            line.clear();
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        line
    }
}

#[cold]
fn arity_mismatch(callable: &Callable, expected: usize, got: usize) -> RuntimeError {
    RuntimeError::ArityMismatch {
        name: callable.name().to_owned(),
        expected,
        got,
    }
}
