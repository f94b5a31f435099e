//! Tree-walking interpreter.
//!
//! Evaluates a parsed [`Module`] directly against a [`Machine`]. Every node
//! creates child scopes at the same points the C lowering does (branch
//! bodies, loop iterations, calls), so a program behaves the same whether
//! it is interpreted or compiled.
//!
//! `RETURN`, `BREAK` and `CONTINUE` travel up the Rust call stack as
//! [`Unwind`] values alongside runtime errors; every scope entered on the
//! way is exited before the unwind continues.

mod control;
mod function;

use std::rc::Rc;

use smallvec::SmallVec;

use ml_ir::stack::ensure_sufficient_stack;
use ml_ir::{ExprId, ExprKind, ExprRange, Module};

use crate::environment::ScopeId;
use crate::machine::DEFAULT_MODEL;
use crate::operators::{evaluate_binary, evaluate_unary, index_get};
use crate::{EvalResult, Machine, RuntimeError, Value};

pub use function::{TreeBody, ANONYMOUS};

/// Non-local exit from an expression.
#[derive(Debug)]
pub enum Unwind {
    Error(RuntimeError),
    Return(Value),
    Break,
    Continue,
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

type Flow<T = Value> = Result<T, Unwind>;

/// Arguments of one call; most calls have few.
type Args = SmallVec<[Value; 4]>;

pub struct Interpreter<'m> {
    machine: &'m mut Machine,
    module: Rc<Module>,
}

impl<'m> Interpreter<'m> {
    /// The module's names must come from the machine's interner.
    pub fn new(machine: &'m mut Machine, module: Rc<Module>) -> Self {
        Interpreter { machine, module }
    }

    /// Run every top-level statement in the global scope and return the
    /// value of the last one.
    ///
    /// A top-level `RETURN` ends the program with its value; a stray
    /// `BREAK` or `CONTINUE` ends it with null. The driver rejects both
    /// before a program gets here.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> EvalResult {
        let global = self.machine.global();
        let module = Rc::clone(&self.module);
        let mut last = Value::NULL;
        for &statement in module.statements() {
            match self.eval(statement, global) {
                Ok(value) => last = value,
                Err(Unwind::Error(err)) => return Err(err),
                Err(Unwind::Return(value)) => return Ok(value),
                Err(Unwind::Break | Unwind::Continue) => return Ok(Value::NULL),
            }
        }
        Ok(last)
    }

    fn eval(&mut self, id: ExprId, scope: ScopeId) -> Flow {
        ensure_sufficient_stack(|| self.eval_inner(id, scope))
    }

    fn eval_inner(&mut self, id: ExprId, scope: ScopeId) -> Flow {
        let kind = self.module.arena.get_expr(id).kind;
        match kind {
            ExprKind::Number(n) => Ok(Value::Number(n)),
            ExprKind::Text(name) => Ok(Value::text(self.machine.interner().lookup(name))),
            ExprKind::List(elements) => Ok(Value::sequence(
                self.eval_list(elements, scope)?.into_vec(),
            )),
            ExprKind::Ident(name) => Ok(self.machine.scopes.lookup(scope, name)?),
            ExprKind::Assign { name, value } => {
                let value = self.eval(value, scope)?;
                self.machine.scopes.bind(scope, name, value.clone());
                Ok(value)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                Ok(evaluate_binary(op, &left, &right)?)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand, scope)?;
                Ok(evaluate_unary(op, &operand)?)
            }
            ExprKind::If {
                branches,
                else_branch,
                yields,
            } => self.eval_if(branches, else_branch, yields, scope),
            ExprKind::For {
                var,
                start,
                end,
                step,
                body,
                yields,
            } => self.eval_for(var, (start, end, step), body, yields, scope),
            ExprKind::While {
                condition,
                body,
                yields,
            } => self.eval_while(condition, body, yields, scope),
            ExprKind::Function {
                name,
                params,
                body,
                auto_return,
            } => Ok(self.eval_function(name, params, body, auto_return, scope)),
            ExprKind::Call { callee, args } => {
                let callee = self.eval(callee, scope)?;
                let args = self.eval_list(args, scope)?;
                Ok(self.machine.call(&callee, &args)?)
            }
            ExprKind::Index { target, index } => {
                let target = self.eval(target, scope)?;
                let index = self.eval(index, scope)?;
                Ok(index_get(&target, &index)?)
            }
            ExprKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(value, scope)?,
                    None => Value::NULL,
                };
                Err(Unwind::Return(value))
            }
            ExprKind::Continue => Err(Unwind::Continue),
            ExprKind::Break => Err(Unwind::Break),
            ExprKind::Embed { text, model } => {
                let text = self.eval(text, scope)?;
                let model = model.map_or(DEFAULT_MODEL, |m| self.machine.interner().lookup(m));
                Ok(self.machine.embed(&text, model)?)
            }
            ExprKind::AiCall { model, args } => {
                let args = self.eval_list(args, scope)?;
                let model = self.machine.interner().lookup(model);
                Ok(self.machine.ai_call(model, &args)?)
            }
            ExprKind::Pipe { left, right } => self.eval_pipe(left, right, scope),
            ExprKind::Block(statements) => self.eval_block(statements, scope),
        }
    }

    fn eval_list(&mut self, range: ExprRange, scope: ScopeId) -> Flow<Args> {
        let module = Rc::clone(&self.module);
        module
            .arena
            .get_expr_list(range)
            .iter()
            .map(|&id| self.eval(id, scope))
            .collect()
    }

    /// Statements of a block share the enclosing scope.
    fn eval_block(&mut self, statements: ExprRange, scope: ScopeId) -> Flow {
        let module = Rc::clone(&self.module);
        let mut last = Value::NULL;
        for &statement in module.arena.get_expr_list(statements) {
            last = self.eval(statement, scope)?;
        }
        Ok(last)
    }
}

/// Parse-free entry point for tests and embedders: run `module` on
/// `machine`.
pub fn run_module(machine: &mut Machine, module: Module) -> EvalResult {
    Interpreter::new(machine, Rc::new(module)).run()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on failure")]
mod tests;
