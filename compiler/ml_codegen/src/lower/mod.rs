//! Syntax tree to C lowering.
//!
//! Every node lowers to one C expression of type `const ml_value_t*`.
//! Nodes that need statements (loops, branches, sequenced operands) use
//! GNU statement expressions, `({ ...; value; })`, so any node can appear
//! wherever a value is expected, exactly as in the source language.
//!
//! Fragments carry newlines but no indentation; the assembler indents the
//! finished document.

mod bindings;
mod control;
mod function;

use ml_ir::stack::ensure_sufficient_stack;
use ml_ir::{CompilationError, ExprId, ExprKind, ExprRange, Module, Name, StringInterner};

use crate::context::{c_string, LoweringContext};
use crate::fragment::{binary_type, unary_type, CodeFragment};
use crate::symbol_table::{StaticType, SymbolTable};
use crate::GeneratedProgram;

pub(crate) use bindings::rebound_names;

type LowerResult<T = CodeFragment> = Result<T, CompilationError>;

/// C variable holding the global scope in `main`, and the scope parameter
/// of every lowered function.
const SCOPE_PARAM: &str = "scope";

/// Lower a whole module. Top-level statements become the entry point;
/// function literals become C functions.
pub(crate) fn lower_module(
    module: &Module,
    interner: &StringInterner,
) -> LowerResult<GeneratedProgram> {
    let mut lowerer = Lowerer::new(module, interner);
    for &statement in module.statements() {
        let fragment = lowerer.lower(statement)?;
        lowerer.program.entry.push(fragment.text);
    }
    Ok(lowerer.program)
}

struct Lowerer<'a> {
    module: &'a Module,
    ctx: LoweringContext<'a>,
    table: SymbolTable,
    program: GeneratedProgram,
}

/// Operands of a runtime call after sequencing.
struct Operands {
    /// Temporaries to evaluate first, in source order.
    prelude: Vec<String>,
    /// One C expression per operand.
    values: Vec<String>,
}

impl<'a> Lowerer<'a> {
    fn new(module: &'a Module, interner: &'a StringInterner) -> Self {
        let mut table = SymbolTable::new(SCOPE_PARAM);
        // Builtins can be rebound by the program, so their type is left open.
        for name in ml_eval::global_names() {
            table.define(interner.intern(name), StaticType::Unknown);
        }
        table.set_rebound(rebound_names(&module.arena, module.statements()));
        Lowerer {
            module,
            ctx: LoweringContext::new(interner),
            table,
            program: GeneratedProgram::new(),
        }
    }

    fn lower(&mut self, id: ExprId) -> LowerResult {
        ensure_sufficient_stack(|| self.lower_inner(id))
    }

    fn lower_inner(&mut self, id: ExprId) -> LowerResult {
        let kind = self.module.arena.get_expr(id).kind;
        match kind {
            ExprKind::Number(n) => Ok(number_literal(n)),
            ExprKind::Text(text) => {
                let text = self.name(text);
                Ok(CodeFragment::literal(
                    format!("ml_text(rt, {}, {})", c_string(text), text.len()),
                    StaticType::Text,
                ))
            }
            ExprKind::List(elements) => self.lower_list(elements),
            ExprKind::Ident(name) => {
                // Builtins and names declared later are looked up at run time.
                if !self.table.is_declared(name) {
                    tracing::debug!(name = self.name(name), "name not declared yet");
                }
                Ok(CodeFragment::new(
                    format!(
                        "ml_scope_lookup(rt, {}, {})",
                        self.table.scope_var(),
                        c_string(self.name(name))
                    ),
                    self.table.type_of(name),
                ))
            }
            ExprKind::Assign { name, value } => self.lower_assign(name, value),
            ExprKind::Binary { op, left, right } => {
                let left = self.lower(left)?;
                let right = self.lower(right)?;
                let ty = binary_type(op, left.ty, right.ty);
                let operands = self.sequence(vec![left, right]);
                let call = format!(
                    "ml_{}(rt, {}, {})",
                    op.runtime_name(),
                    operands.values[0],
                    operands.values[1]
                );
                Ok(CodeFragment::new(finish(&operands.prelude, call), ty))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.lower(operand)?;
                Ok(CodeFragment::new(
                    format!("ml_{}(rt, {})", op.runtime_name(), operand.text),
                    unary_type(op, operand.ty),
                ))
            }
            ExprKind::If {
                branches,
                else_branch,
                yields,
            } => self.lower_if(branches, else_branch, yields),
            ExprKind::For {
                var,
                start,
                end,
                step,
                body,
                yields,
            } => self.lower_for(var, (start, end, step), body, yields),
            ExprKind::While {
                condition,
                body,
                yields,
            } => self.lower_while(condition, body, yields),
            ExprKind::Function {
                name,
                params,
                body,
                auto_return,
            } => self.lower_function(name, params, body, auto_return),
            ExprKind::Call { callee, args } => {
                let mut parts = vec![self.lower(callee)?];
                parts.extend(self.lower_list_items(args)?);
                Ok(self.call(parts))
            }
            ExprKind::Index { target, index } => {
                let target = self.lower(target)?;
                let index = self.lower(index)?;
                let operands = self.sequence(vec![target, index]);
                let call = format!(
                    "ml_index_get(rt, {}, {})",
                    operands.values[0], operands.values[1]
                );
                Ok(CodeFragment::new(
                    finish(&operands.prelude, call),
                    StaticType::Unknown,
                ))
            }
            ExprKind::Return(value) => self.lower_return(id, value),
            ExprKind::Break => self.lower_loop_jump(id, "break", "'BREAK' outside of a loop"),
            ExprKind::Continue => {
                self.lower_loop_jump(id, "continue", "'CONTINUE' outside of a loop")
            }
            ExprKind::Embed { text, model } => {
                let text = self.lower(text)?;
                let model = model.map_or(ml_eval::DEFAULT_MODEL, |m| self.name(m));
                Ok(CodeFragment::new(
                    format!("ml_embed(rt, {}, {})", text.text, c_string(model)),
                    StaticType::Sequence,
                ))
            }
            ExprKind::AiCall { model, args } => {
                let model = c_string(self.name(model));
                let parts = self.lower_list_items(args)?;
                let operands = self.sequence(parts);
                let call = format!("ml_ai_call(rt, {model}, {})", args_array(&operands.values));
                Ok(CodeFragment::new(
                    finish(&operands.prelude, call),
                    StaticType::Unknown,
                ))
            }
            ExprKind::Pipe { left, right } => self.lower_pipe(left, right),
            ExprKind::Block(statements) => self.lower_block(statements),
        }
    }

    fn name(&self, name: Name) -> &'static str {
        self.ctx.interner.lookup(name)
    }

    fn error(&self, message: &str, id: ExprId) -> CompilationError {
        let span = self.module.arena.get_expr(id).span;
        CompilationError::at(message, span, &self.module.lines)
    }

    fn lower_list_items(&mut self, items: ExprRange) -> LowerResult<Vec<CodeFragment>> {
        let module = self.module;
        module
            .arena
            .get_expr_list(items)
            .iter()
            .map(|&item| self.lower(item))
            .collect()
    }

    fn lower_list(&mut self, elements: ExprRange) -> LowerResult {
        if elements.is_empty() {
            return Ok(CodeFragment::literal("ml_list_new(rt)", StaticType::Sequence));
        }
        let items = self.lower_list_items(elements)?;
        let list = self.ctx.fresh_temp();
        let mut lines = Vec::with_capacity(items.len() + 1);
        lines.push(format!("const ml_value_t* {list} = ml_list_new(rt);"));
        for item in items {
            lines.push(format!("ml_list_push(rt, {list}, {});", item.text));
        }
        Ok(CodeFragment::new(
            statement_expr(&lines, &list),
            StaticType::Sequence,
        ))
    }

    /// `VAR name = value`. The value is lowered first: it may itself
    /// declare `name`, which turns this binding into a mutation.
    fn lower_assign(&mut self, name: Name, value: ExprId) -> LowerResult {
        let value = self.lower(value)?;
        let temp = self.ctx.fresh_temp();
        let label = c_string(self.name(name));
        let scope = self.table.scope_var().to_owned();
        let binding = if self.table.declared_in_frame(name) {
            format!("ml_scope_assign(rt, {scope}, {label}, {temp});")
        } else {
            self.table.define(name, value.ty);
            format!("ml_scope_define(rt, {scope}, {label}, {temp});")
        };
        let lines = [
            format!("const ml_value_t* {temp} = {};", value.text),
            binding,
        ];
        Ok(CodeFragment::new(statement_expr(&lines, &temp), value.ty))
    }

    /// `callee(args...)` from already lowered parts, callee first.
    fn call(&mut self, parts: Vec<CodeFragment>) -> CodeFragment {
        let operands = self.sequence(parts);
        let call = format!(
            "ml_call(rt, {}, {})",
            operands.values[0],
            args_array(&operands.values[1..])
        );
        CodeFragment::new(finish(&operands.prelude, call), StaticType::Unknown)
    }

    /// `left | right`: evaluate the piped value, then the callee, then any
    /// arguments written on the right-hand call.
    fn lower_pipe(&mut self, left: ExprId, right: ExprId) -> LowerResult {
        let left = self.lower(left)?;
        let (callee, extra) = match self.module.arena.get_expr(right).kind {
            ExprKind::Call { callee, args } => (callee, Some(args)),
            _ => (right, None),
        };
        let callee = self.lower(callee)?;
        let extra = match extra {
            Some(args) => self.lower_list_items(args)?,
            None => Vec::new(),
        };

        let mut operands = self.sequence([left, callee].into_iter().chain(extra).collect());
        let callee = operands.values.remove(1);
        let call = format!("ml_call(rt, {callee}, {})", args_array(&operands.values));
        Ok(CodeFragment::new(
            finish(&operands.prelude, call),
            StaticType::Unknown,
        ))
    }

    /// Statements in the current scope; the value of the last one.
    fn lower_block(&mut self, statements: ExprRange) -> LowerResult {
        let mut lowered = self.lower_list_items(statements)?;
        let Some(last) = lowered.pop() else {
            return Ok(null_literal());
        };
        if lowered.is_empty() {
            return Ok(last);
        }
        let lines: Vec<String> = lowered.into_iter().map(|s| s.text + ";").collect();
        Ok(CodeFragment::new(statement_expr(&lines, &last.text), last.ty))
    }

    /// C evaluates call arguments in unspecified order. When more than one
    /// operand has effects, each of those is evaluated into a temporary
    /// first, in source order.
    fn sequence(&mut self, parts: Vec<CodeFragment>) -> Operands {
        let effectful = parts.iter().filter(|part| !part.pure).count();
        let mut prelude = Vec::new();
        let mut values = Vec::with_capacity(parts.len());
        for part in parts {
            if effectful > 1 && !part.pure {
                let temp = self.ctx.fresh_temp();
                prelude.push(format!("const ml_value_t* {temp} = {};", part.text));
                values.push(temp);
            } else {
                values.push(part.text);
            }
        }
        Operands { prelude, values }
    }
}

fn number_literal(n: f64) -> CodeFragment {
    CodeFragment::literal(
        format!("ml_number(rt, {})", crate::context::c_double(n)),
        StaticType::Number,
    )
}

fn null_literal() -> CodeFragment {
    CodeFragment::literal("ml_null(rt)", StaticType::Number)
}

/// `({ line... value; })`
fn statement_expr(lines: &[String], value: &str) -> String {
    let mut out = String::from("({\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(value);
    out.push_str(";\n})");
    out
}

/// `call` alone, or wrapped after its sequenced operands.
fn finish(prelude: &[String], call: String) -> String {
    if prelude.is_empty() {
        call
    } else {
        statement_expr(prelude, &call)
    }
}

/// Pointer and count arguments for a runtime call taking a value array.
fn args_array(values: &[String]) -> String {
    if values.is_empty() {
        "NULL, 0".to_owned()
    } else {
        format!(
            "(const ml_value_t*[]){{{}}}, {}",
            values.join(", "),
            values.len()
        )
    }
}
