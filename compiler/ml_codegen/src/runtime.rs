//! Declarations of the `ml_rt` runtime as seen from generated C.
//!
//! These prototypes must match the `extern "C"` functions exported by the
//! `ml_rt` crate one for one.

use std::fmt::Write;

/// Scope kinds as passed to `ml_scope_child`.
pub const SCOPE_BRANCH: &str = "ML_SCOPE_BRANCH";
pub const SCOPE_LOOP: &str = "ML_SCOPE_LOOP";

/// Binary operations; each is `const ml_value_t* ml_<op>(rt, a, b)`.
const BINARY_OPS: &[&str] = &[
    "add", "sub", "mul", "div", "pow", "eq", "ne", "lt", "gt", "lte", "gte", "and", "or",
];

const PROTOTYPES: &[&str] = &[
    "ml_runtime_t* ml_runtime_new(void);",
    "void ml_runtime_free(ml_runtime_t* rt);",
    "size_t ml_arena_mark(ml_runtime_t* rt);",
    "void ml_arena_reset(ml_runtime_t* rt, size_t mark);",
    "ml_scope_t ml_scope_global(ml_runtime_t* rt);",
    "ml_scope_t ml_scope_child(ml_runtime_t* rt, ml_scope_t parent, ml_scope_kind_t kind);",
    "void ml_scope_exit(ml_runtime_t* rt, ml_scope_t scope);",
    "void ml_scope_define(ml_runtime_t* rt, ml_scope_t scope, const char* name, const ml_value_t* value);",
    "void ml_scope_assign(ml_runtime_t* rt, ml_scope_t scope, const char* name, const ml_value_t* value);",
    "const ml_value_t* ml_scope_lookup(ml_runtime_t* rt, ml_scope_t scope, const char* name);",
    "const ml_value_t* ml_null(ml_runtime_t* rt);",
    "const ml_value_t* ml_number(ml_runtime_t* rt, double value);",
    "const ml_value_t* ml_text(ml_runtime_t* rt, const char* data, size_t len);",
    "const ml_value_t* ml_list_new(ml_runtime_t* rt);",
    "void ml_list_push(ml_runtime_t* rt, const ml_value_t* list, const ml_value_t* item);",
    "const ml_value_t* ml_neg(ml_runtime_t* rt, const ml_value_t* operand);",
    "const ml_value_t* ml_not(ml_runtime_t* rt, const ml_value_t* operand);",
    "const ml_value_t* ml_index_get(ml_runtime_t* rt, const ml_value_t* target, const ml_value_t* index);",
    "int ml_truthy(ml_runtime_t* rt, const ml_value_t* value);",
    "double ml_number_value(ml_runtime_t* rt, const ml_value_t* value);",
    "const ml_value_t* ml_function_new(ml_runtime_t* rt, ml_scope_t closure, const char* name, ml_body_fn body, const char* const* params, size_t param_count);",
    "const ml_value_t* ml_call(ml_runtime_t* rt, const ml_value_t* callee, const ml_value_t* const* args, size_t arg_count);",
    "const ml_value_t* ml_embed(ml_runtime_t* rt, const ml_value_t* text, const char* model);",
    "const ml_value_t* ml_ai_call(ml_runtime_t* rt, const char* model, const ml_value_t* const* args, size_t arg_count);",
];

/// C runtime header generator.
pub struct CRuntime;

impl CRuntime {
    /// Banner, includes, runtime types and runtime prototypes.
    pub fn emit_headers(out: &mut String) {
        out.push_str("/* Generated by mlc. Do not edit. */\n");
        out.push_str("#include <stddef.h>\n");
        out.push_str("#include <stdint.h>\n\n");
        Self::emit_types(out);
        out.push('\n');
        Self::emit_functions(out);
    }

    fn emit_types(out: &mut String) {
        out.push_str("typedef struct ml_runtime ml_runtime_t;\n");
        out.push_str("typedef struct ml_value ml_value_t;\n");
        out.push_str("typedef uint32_t ml_scope_t;\n");
        out.push_str("typedef enum { ML_SCOPE_BRANCH = 2, ML_SCOPE_LOOP = 3 } ml_scope_kind_t;\n");
        out.push_str("typedef const ml_value_t* (*ml_body_fn)(ml_runtime_t* rt, ml_scope_t scope);\n");
    }

    fn emit_functions(out: &mut String) {
        for prototype in PROTOTYPES {
            out.push_str(prototype);
            out.push('\n');
        }
        for op in BINARY_OPS {
            let _ = writeln!(
                out,
                "const ml_value_t* ml_{op}(ml_runtime_t* rt, const ml_value_t* left, const ml_value_t* right);"
            );
        }
    }

    /// Names of every runtime function the headers declare.
    pub fn function_names() -> impl Iterator<Item = String> {
        let declared = PROTOTYPES.iter().filter_map(|prototype| {
            let open = prototype.find('(')?;
            let start = prototype[..open].rfind([' ', '*'])? + 1;
            Some(prototype[start..open].to_owned())
        });
        declared.chain(BINARY_OPS.iter().map(|op| format!("ml_{op}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ml_ir::BinaryOp;

    #[test]
    fn headers_declare_runtime_entry_points() {
        let mut out = String::new();
        CRuntime::emit_headers(&mut out);
        assert!(out.starts_with("/* Generated by mlc"));
        assert!(out.contains("typedef uint32_t ml_scope_t;"));
        assert!(out.contains("const ml_value_t* ml_call(ml_runtime_t* rt,"));
        assert!(out.contains("const ml_value_t* ml_gte(ml_runtime_t* rt,"));
    }

    #[test]
    fn every_binary_operator_has_a_runtime_function() {
        let names: Vec<String> = CRuntime::function_names().collect();
        for op in [
            BinaryOp::Add,
            BinaryOp::NotEq,
            BinaryOp::LtEq,
            BinaryOp::Or,
            BinaryOp::Pow,
        ] {
            let name = format!("ml_{}", op.runtime_name());
            assert!(names.contains(&name), "{name} is not declared");
        }
        assert!(names.iter().any(|n| n == "ml_scope_lookup"));
        assert!(names.iter().any(|n| n == "ml_runtime_new"));
        assert!(names.iter().any(|n| n == "ml_arena_mark"));
        assert!(names.iter().any(|n| n == "ml_arena_reset"));
    }
}
