//! Runtime semantics of the ML language.
//!
//! This crate holds everything that happens when a program runs:
//!
//! - [`Value`]: the tagged value model and its operation table
//!   ([`operators`])
//! - [`ScopeArena`]: the lexical scope chain
//! - [`Machine`]: execution state shared by the interpreter and the C
//!   runtime, with builtins and the [`ModelHost`]
//! - [`Interpreter`]: a tree-walking evaluator over `ml_ir`
//!
//! Compiled programs reach the same code through `ml_rt`, which is what
//! keeps interpreted and compiled behavior identical.

mod builtins;
mod environment;
mod errors;
mod interpreter;
mod machine;
mod models;
pub mod operators;
mod print_handler;
mod value;

pub use builtins::global_names;
pub use environment::{ScopeArena, ScopeId, ScopeKind};
pub use errors::{EvalResult, RuntimeError};
pub use interpreter::{run_module, Interpreter, TreeBody, Unwind, ANONYMOUS};
pub use machine::{Machine, DEFAULT_MODEL};
pub use models::{ModelHandler, ModelHost, PlaceholderModels, PLACEHOLDER_EMBEDDING};
pub use print_handler::{buffer_handler, stdout_handler, PrintHandler, SharedPrintHandler};
pub use value::{
    format_number, Arity, Callable, CallableKind, FunctionBody, NativeFn, Sequence, UserFunction,
    Value, ValueKind,
};
