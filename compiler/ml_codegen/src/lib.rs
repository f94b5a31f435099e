//! C code generation for ML programs.
//!
//! Lowers a parsed [`Module`] into a single C translation unit that links
//! against the `ml_rt` runtime library:
//!
//! - [`SymbolTable`]: compile-time mirror of the runtime scope chain
//! - [`LoweringContext`]: fresh temporaries, scope variables and function
//!   names
//! - [`CodeFragment`]: one lowered expression and its static type
//! - [`GeneratedProgram`]: headers, forward declarations, function
//!   definitions and the entry point, assembled by [`assemble`]
//!
//! Values never live in C locals beyond a single expression; every
//! variable read and write goes through the runtime scope, so generated
//! programs follow exactly the scoping rules of the interpreter.

mod assembler;
mod context;
mod fragment;
mod lower;
mod runtime;
mod symbol_table;

use ml_ir::{CompilationError, Module, StringInterner};

pub use assembler::{assemble, reindent, GeneratedProgram};
pub use context::{c_double, c_string, LoweringContext};
pub use fragment::{binary_type, unary_type, CodeFragment};
pub use runtime::{CRuntime, SCOPE_BRANCH, SCOPE_LOOP};
pub use symbol_table::{JumpError, LevelKind, StaticType, SymbolTable};

/// Lower `module` into its program sections.
///
/// `interner` must be the one `module` was parsed with. Fails on control
/// transfers with no valid target (`BREAK` outside a loop, `RETURN` at top
/// level).
#[tracing::instrument(level = "debug", skip_all)]
pub fn lower(module: &Module, interner: &StringInterner) -> Result<GeneratedProgram, CompilationError> {
    let program = lower::lower_module(module, interner)?;
    tracing::debug!(
        functions = program.definitions.len(),
        statements = program.entry.len(),
        "lowered module"
    );
    Ok(program)
}

/// Lower `module` and assemble the complete C source.
pub fn generate_c(module: &Module, interner: &StringInterner) -> Result<String, CompilationError> {
    Ok(lower(module, interner)?.assemble())
}
