//! Function literals, interpreted function bodies and pipes.

use std::rc::Rc;

use ml_ir::{ExprId, ExprKind, Module, Name, ParamRange};

use crate::environment::ScopeId;
use crate::value::{Callable, FunctionBody, UserFunction};
use crate::{EvalResult, Machine, Value};

use super::{Args, Flow, Interpreter, Unwind};

/// Name given to function literals without one.
pub const ANONYMOUS: &str = "anonymous";

/// A function body evaluated by walking the syntax tree.
pub struct TreeBody {
    module: Rc<Module>,
    body: ExprId,
    auto_return: bool,
}

impl FunctionBody for TreeBody {
    fn execute(&self, machine: &mut Machine, scope: ScopeId) -> EvalResult {
        let mut interpreter = Interpreter::new(machine, Rc::clone(&self.module));
        match interpreter.eval(self.body, scope) {
            Ok(value) if self.auto_return => Ok(value),
            Ok(_) | Err(Unwind::Break | Unwind::Continue) => Ok(Value::NULL),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
        }
    }
}

impl Interpreter<'_> {
    /// Create a closure over `scope`. A named literal also binds itself in
    /// `scope`, which makes recursion work.
    pub(super) fn eval_function(
        &mut self,
        name: Option<Name>,
        params: ParamRange,
        body: ExprId,
        auto_return: bool,
        scope: ScopeId,
    ) -> Value {
        self.machine.scopes.capture(scope);
        let function = UserFunction {
            params: self.module.arena.get_params(params).to_vec(),
            closure: scope,
            body: Rc::new(TreeBody {
                module: Rc::clone(&self.module),
                body,
                auto_return,
            }),
        };
        let label = name.map_or(ANONYMOUS, |n| self.machine.interner().lookup(n));
        let value = Value::Callable(Callable::user(label, function));
        if let Some(name) = name {
            self.machine.scopes.define(scope, name, value.clone());
        }
        value
    }

    /// `left | right`: the piped value becomes the first argument, ahead of
    /// any arguments written on the right-hand call.
    pub(super) fn eval_pipe(&mut self, left: ExprId, right: ExprId, scope: ScopeId) -> Flow {
        let piped = self.eval(left, scope)?;
        let (callee, extra) = match self.module.arena.get_expr(right).kind {
            ExprKind::Call { callee, args } => (callee, Some(args)),
            _ => (right, None),
        };
        let callee = self.eval(callee, scope)?;
        let mut args = Args::new();
        args.push(piped);
        if let Some(extra) = extra {
            args.extend(self.eval_list(extra, scope)?);
        }
        Ok(self.machine.call(&callee, &args)?)
    }
}
