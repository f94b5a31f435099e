//! Function literals.
//!
//! Each literal becomes a static C function taking the runtime and the
//! call scope. The runtime creates that scope as a child of the closure
//! scope and binds the parameters in it before calling the body.

use ml_ir::{ExprId, ExprKind, Name, ParamRange};

use crate::context::c_string;
use crate::symbol_table::{LevelKind, StaticType};
use crate::CodeFragment;

use super::{rebound_names, statement_expr, LowerResult, Lowerer, SCOPE_PARAM};

impl Lowerer<'_> {
    pub(super) fn lower_function(
        &mut self,
        name: Option<Name>,
        params: ParamRange,
        body: ExprId,
        auto_return: bool,
    ) -> LowerResult {
        let module = self.module;
        let params = module.arena.get_params(params);
        let label = name.map_or(ml_eval::ANONYMOUS, |n| self.name(n));
        let c_name = self.ctx.fresh_function(label);
        let param_names: Vec<&str> = params.iter().map(|&p| self.name(p)).collect();

        self.program.declarations.push(format!(
            "/* {label}({}) */\nstatic const ml_value_t* {c_name}(ml_runtime_t* rt, ml_scope_t {SCOPE_PARAM});",
            param_names.join(", ")
        ));

        self.table.enter(LevelKind::Function, SCOPE_PARAM);
        for &param in params {
            self.table.define(param, StaticType::Unknown);
        }
        self.table.set_rebound(rebound_names(&module.arena, &[body]));
        let statements = self.function_body(body, auto_return);
        self.table.exit();
        let statements = statements?;

        let mut definition = format!(
            "static const ml_value_t* {c_name}(ml_runtime_t* rt, ml_scope_t {SCOPE_PARAM}) {{\n"
        );
        for statement in statements {
            definition.push_str(&statement);
            definition.push('\n');
        }
        definition.push('}');
        self.program.definitions.push(definition);

        let params_array = if param_names.is_empty() {
            "NULL, 0".to_owned()
        } else {
            let quoted: Vec<String> = param_names.iter().map(|p| c_string(p)).collect();
            format!("(const char*[]){{{}}}, {}", quoted.join(", "), quoted.len())
        };
        let scope = self.table.scope_var().to_owned();
        let value = format!(
            "ml_function_new(rt, {scope}, {}, {c_name}, {params_array})",
            c_string(label)
        );

        let Some(name) = name else {
            return Ok(CodeFragment::new(value, StaticType::Callable));
        };
        // A named literal binds itself, which makes recursion work.
        self.table.define(name, StaticType::Callable);
        let temp = self.ctx.fresh_temp();
        let lines = [
            format!("const ml_value_t* {temp} = {value};"),
            format!("ml_scope_define(rt, {scope}, {}, {temp});", c_string(label)),
        ];
        Ok(CodeFragment::new(
            statement_expr(&lines, &temp),
            StaticType::Callable,
        ))
    }

    /// Statements of the C function body. `-> expr` bodies return their
    /// value; block bodies return null unless they `RETURN` first.
    fn function_body(&mut self, body: ExprId, auto_return: bool) -> LowerResult<Vec<String>> {
        if auto_return {
            let value = self.lower(body)?;
            return Ok(vec![format!("return {};", value.text)]);
        }
        let module = self.module;
        let statements = match module.arena.get_expr(body).kind {
            ExprKind::Block(statements) => module.arena.get_expr_list(statements),
            _ => std::slice::from_ref(&body),
        };
        let mut lines = Vec::with_capacity(statements.len() + 1);
        for &statement in statements {
            lines.push(self.lower(statement)?.text + ";");
        }
        lines.push("return ml_null(rt);".to_owned());
        Ok(lines)
    }
}
