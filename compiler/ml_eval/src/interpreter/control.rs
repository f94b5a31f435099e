//! Conditionals and loops.
//!
//! Conditions and loop bounds are evaluated in the enclosing scope. Each
//! branch body and each loop iteration runs in its own child scope, which
//! is exited before the result (or unwind) propagates.

use ml_ir::{BranchRange, ExprId, Name};

use crate::environment::{ScopeId, ScopeKind};
use crate::errors::conversion_failure;
use crate::Value;

use super::{Flow, Interpreter, Unwind};

/// What a loop does after one iteration.
enum Step {
    Next(Option<Value>),
    Stop,
}

impl Interpreter<'_> {
    /// Run `body` in a fresh child scope of `scope`.
    pub(super) fn eval_in_child(&mut self, body: ExprId, scope: ScopeId, kind: ScopeKind) -> Flow {
        let child = self.machine.scopes.child(scope, kind);
        let result = self.eval(body, child);
        self.machine.scopes.exit(child);
        result
    }

    pub(super) fn eval_if(
        &mut self,
        branches: BranchRange,
        else_branch: Option<ExprId>,
        yields: bool,
        scope: ScopeId,
    ) -> Flow {
        let arms = self.module.arena.get_branches(branches).to_vec();
        let mut taken = else_branch;
        for arm in arms {
            if self.eval(arm.condition, scope)?.is_truthy() {
                taken = Some(arm.body);
                break;
            }
        }
        let Some(body) = taken else {
            return Ok(Value::NULL);
        };
        let value = self.eval_in_child(body, scope, ScopeKind::Branch)?;
        Ok(if yields { value } else { Value::NULL })
    }

    /// Counted loop. Runs while `i < end` for a non-negative step and
    /// while `i > end` for a negative one.
    pub(super) fn eval_for(
        &mut self,
        var: Name,
        (start, end, step): (ExprId, ExprId, Option<ExprId>),
        body: ExprId,
        yields: bool,
        scope: ScopeId,
    ) -> Flow {
        let mut i = self.eval_number(start, scope)?;
        let end = self.eval_number(end, scope)?;
        let step = match step {
            Some(step) => self.eval_number(step, scope)?,
            None => 1.0,
        };

        let mut collected = Vec::new();
        while (step >= 0.0 && i < end) || (step < 0.0 && i > end) {
            let child = self.machine.scopes.child(scope, ScopeKind::Loop);
            self.machine.scopes.define(child, var, Value::Number(i));
            let result = self.eval(body, child);
            self.machine.scopes.exit(child);
            match iteration(result)? {
                Step::Next(value) => collected.extend(value.filter(|_| yields)),
                Step::Stop => break,
            }
            i += step;
        }
        Ok(loop_value(collected, yields))
    }

    pub(super) fn eval_while(
        &mut self,
        condition: ExprId,
        body: ExprId,
        yields: bool,
        scope: ScopeId,
    ) -> Flow {
        let mut collected = Vec::new();
        while self.eval(condition, scope)?.is_truthy() {
            let result = self.eval_in_child(body, scope, ScopeKind::Loop);
            match iteration(result)? {
                Step::Next(value) => collected.extend(value.filter(|_| yields)),
                Step::Stop => break,
            }
        }
        Ok(loop_value(collected, yields))
    }

    fn eval_number(&mut self, id: ExprId, scope: ScopeId) -> Flow<f64> {
        let value = self.eval(id, scope)?;
        value
            .as_number()
            .ok_or_else(|| conversion_failure(value.render(), "Number").into())
    }
}

/// Consume `BREAK` and `CONTINUE`; let everything else through.
fn iteration(result: Flow) -> Result<Step, Unwind> {
    match result {
        Ok(value) => Ok(Step::Next(Some(value))),
        Err(Unwind::Continue) => Ok(Step::Next(None)),
        Err(Unwind::Break) => Ok(Step::Stop),
        Err(other) => Err(other),
    }
}

fn loop_value(collected: Vec<Value>, yields: bool) -> Value {
    if yields {
        Value::sequence(collected)
    } else {
        Value::NULL
    }
}
