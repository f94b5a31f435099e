//! Branches, loops and jumps.
//!
//! Each branch body and each loop iteration runs in its own runtime scope,
//! created and released around the body. Conditions and loop bounds are
//! evaluated in the enclosing scope. Jumps release every scope between
//! them and their target before transferring control.
//!
//! A loop takes a value arena mark before its first iteration and resets
//! to it at the start of each one, so the handles of finished iterations
//! do not pile up. Collected items are pushed into the list, which holds
//! clones.

use ml_ir::{BranchRange, ExprId, ExprKind, Name};

use crate::context::{c_double, c_string};
use crate::runtime::{SCOPE_BRANCH, SCOPE_LOOP};
use crate::symbol_table::{LevelKind, StaticType};
use crate::CodeFragment;

use super::{null_literal, statement_expr, LowerResult, Lowerer};

/// The body of a branch or loop iteration, lowered in a fresh scope.
struct ScopedBody {
    /// Creates the scope.
    enter: String,
    body: CodeFragment,
    /// Releases the scope.
    exit: String,
}

impl Lowerer<'_> {
    /// Lower `body` in a new child level of `kind`, mirroring a runtime
    /// child scope. `define` runs inside the new level before the body.
    fn scoped_body(
        &mut self,
        kind: LevelKind,
        body: ExprId,
        define: Option<(Name, &str)>,
    ) -> LowerResult<ScopedBody> {
        let scope = self.ctx.fresh_scope();
        let parent = self.table.scope_var().to_owned();
        let c_kind = match kind {
            LevelKind::Loop => SCOPE_LOOP,
            _ => SCOPE_BRANCH,
        };
        let mut enter = format!("ml_scope_t {scope} = ml_scope_child(rt, {parent}, {c_kind});");

        self.table.enter(kind, scope.clone());
        if let Some((var, value)) = define {
            self.table.define(var, StaticType::Number);
            enter.push_str(&format!(
                "\nml_scope_define(rt, {scope}, {}, {value});",
                c_string(self.name(var))
            ));
        }
        let body = self.lower(body);
        self.table.exit();

        Ok(ScopedBody {
            enter,
            body: body?,
            exit: format!("ml_scope_exit(rt, {scope});"),
        })
    }

    /// C test for a condition. Numbers skip the generic truthiness check.
    fn condition_test(condition: &CodeFragment) -> String {
        if condition.ty == StaticType::Number {
            format!("ml_number_value(rt, {}) != 0.0", condition.text)
        } else {
            format!("ml_truthy(rt, {})", condition.text)
        }
    }

    pub(super) fn lower_if(
        &mut self,
        branches: BranchRange,
        else_branch: Option<ExprId>,
        yields: bool,
    ) -> LowerResult {
        let module = self.module;
        let result = self.ctx.fresh_temp();
        let mut lines = Vec::new();
        if yields {
            lines.push(format!("const ml_value_t* {result} = ml_null(rt);"));
        }
        let mut types = Vec::new();

        for (i, branch) in module.arena.get_branches(branches).iter().enumerate() {
            let condition = self.lower(branch.condition)?;
            let test = Self::condition_test(&condition);
            if i == 0 {
                lines.push(format!("if ({test}) {{"));
            } else {
                lines.push(format!("}} else if ({test}) {{"));
            }
            let scoped = self.scoped_body(LevelKind::Branch, branch.body, None)?;
            types.push(scoped.body.ty);
            push_scoped(&mut lines, scoped, yields.then_some(result.as_str()));
        }

        if let Some(else_body) = else_branch {
            lines.push("} else {".to_owned());
            let scoped = self.scoped_body(LevelKind::Branch, else_body, None)?;
            types.push(scoped.body.ty);
            push_scoped(&mut lines, scoped, yields.then_some(result.as_str()));
        } else {
            // No branch taken: null.
            types.push(StaticType::Number);
        }
        lines.push("}".to_owned());

        if !yields {
            return Ok(CodeFragment::new(
                statement_expr(&lines, "ml_null(rt)"),
                StaticType::Number,
            ));
        }
        let ty = match types.split_first() {
            Some((&first, rest)) if rest.iter().all(|&ty| ty == first) => first,
            _ => StaticType::Unknown,
        };
        Ok(CodeFragment::new(statement_expr(&lines, &result), ty))
    }

    /// A loop bound as a C double. Literal bounds are used directly.
    fn bound(&mut self, id: ExprId) -> LowerResult<String> {
        if let ExprKind::Number(n) = self.module.arena.get_expr(id).kind {
            return Ok(c_double(n));
        }
        let bound = self.lower(id)?;
        Ok(format!("ml_number_value(rt, {})", bound.text))
    }

    /// `FOR var = start TO end [STEP step]`: counts from `start` towards
    /// `end` exclusive. A negative step counts down.
    pub(super) fn lower_for(
        &mut self,
        var: Name,
        (start, end, step): (ExprId, ExprId, Option<ExprId>),
        body: ExprId,
        yields: bool,
    ) -> LowerResult {
        let start = self.bound(start)?;
        let end = self.bound(end)?;
        let step = match step {
            Some(step) => self.bound(step)?,
            None => "1.0".to_owned(),
        };

        let counter = self.ctx.fresh_temp();
        let limit = self.ctx.fresh_temp();
        let stride = self.ctx.fresh_temp();
        let collected = self.ctx.fresh_temp();
        let mark = self.ctx.fresh_mark();

        let mut lines = Vec::new();
        if yields {
            lines.push(format!("const ml_value_t* {collected} = ml_list_new(rt);"));
        }
        lines.push(format!("const size_t {mark} = ml_arena_mark(rt);"));
        lines.push(format!("double {counter} = {start};"));
        lines.push(format!("double {limit} = {end};"));
        lines.push(format!("double {stride} = {step};"));
        lines.push(format!(
            "for (; ({stride} >= 0.0 && {counter} < {limit}) || ({stride} < 0.0 && {counter} > {limit}); {counter} += {stride}) {{"
        ));
        let value = format!("ml_number(rt, {counter})");
        let scoped = self.scoped_body(LevelKind::Loop, body, Some((var, &value)))?;
        self.push_iteration(&mut lines, &mark, scoped, yields.then_some(collected.as_str()));
        lines.push("}".to_owned());

        Ok(loop_value(&lines, yields.then_some(collected.as_str())))
    }

    pub(super) fn lower_while(
        &mut self,
        condition: ExprId,
        body: ExprId,
        yields: bool,
    ) -> LowerResult {
        let condition = self.lower(condition)?;
        let test = Self::condition_test(&condition);
        let collected = self.ctx.fresh_temp();
        let mark = self.ctx.fresh_mark();

        let mut lines = Vec::new();
        if yields {
            lines.push(format!("const ml_value_t* {collected} = ml_list_new(rt);"));
        }
        lines.push(format!("const size_t {mark} = ml_arena_mark(rt);"));
        lines.push(format!("while ({test}) {{"));
        let scoped = self.scoped_body(LevelKind::Loop, body, None)?;
        self.push_iteration(&mut lines, &mark, scoped, yields.then_some(collected.as_str()));
        lines.push("}".to_owned());

        Ok(loop_value(&lines, yields.then_some(collected.as_str())))
    }

    /// One loop iteration. The collected value is appended after the
    /// iteration scope is released, so `CONTINUE` skips it.
    fn push_iteration(
        &mut self,
        lines: &mut Vec<String>,
        mark: &str,
        scoped: ScopedBody,
        collect: Option<&str>,
    ) {
        lines.push(format!("ml_arena_reset(rt, {mark});"));
        lines.push(scoped.enter);
        match collect {
            Some(list) => {
                let item = self.ctx.fresh_temp();
                lines.push(format!("const ml_value_t* {item} = {};", scoped.body.text));
                lines.push(scoped.exit);
                lines.push(format!("ml_list_push(rt, {list}, {item});"));
            }
            None => {
                lines.push(format!("{};", scoped.body.text));
                lines.push(scoped.exit);
            }
        }
    }

    /// `RETURN [value]`: evaluate the value, release the scopes opened
    /// inside the function, then return.
    pub(super) fn lower_return(&mut self, id: ExprId, value: Option<ExprId>) -> LowerResult {
        let value = match value {
            Some(value) => self.lower(value)?,
            None => null_literal(),
        };
        let exits = match self.table.return_exits() {
            Ok(exits) => exits,
            Err(_) => return Err(self.error("'RETURN' outside of a function", id)),
        };
        let temp = self.ctx.fresh_temp();
        let mut lines = vec![format!("const ml_value_t* {temp} = {};", value.text)];
        lines.extend(exits.iter().map(|scope| format!("ml_scope_exit(rt, {scope});")));
        lines.push(format!("return {temp};"));
        Ok(CodeFragment::new(
            statement_expr(&lines, "ml_null(rt)"),
            StaticType::Unknown,
        ))
    }

    /// `BREAK` or `CONTINUE`: release the scopes up to and including the
    /// loop iteration, then jump.
    pub(super) fn lower_loop_jump(
        &mut self,
        id: ExprId,
        keyword: &str,
        misplaced: &str,
    ) -> LowerResult {
        let exits = match self.table.loop_exits() {
            Ok(exits) => exits,
            Err(_) => return Err(self.error(misplaced, id)),
        };
        let mut lines: Vec<String> = exits
            .iter()
            .map(|scope| format!("ml_scope_exit(rt, {scope});"))
            .collect();
        lines.push(format!("{keyword};"));
        Ok(CodeFragment::new(
            statement_expr(&lines, "ml_null(rt)"),
            StaticType::Unknown,
        ))
    }
}

/// Append a branch body, storing its value in `result` when the `IF`
/// yields.
fn push_scoped(lines: &mut Vec<String>, scoped: ScopedBody, result: Option<&str>) {
    lines.push(scoped.enter);
    match result {
        Some(result) => lines.push(format!("{result} = {};", scoped.body.text)),
        None => lines.push(format!("{};", scoped.body.text)),
    }
    lines.push(scoped.exit);
}

/// A loop evaluates to its collected list, or null in block form.
fn loop_value(lines: &[String], collected: Option<&str>) -> CodeFragment {
    match collected {
        Some(list) => CodeFragment::new(statement_expr(lines, list), StaticType::Sequence),
        None => CodeFragment::new(statement_expr(lines, "ml_null(rt)"), StaticType::Number),
    }
}
