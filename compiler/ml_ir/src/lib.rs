//! Intermediate representation shared by every stage of the ML compiler.
//!
//! The parser fills an [`ExprArena`]; the interpreter and the C lowering
//! both walk it by [`ExprId`]. Identifiers and string literals are interned
//! once into a [`StringInterner`] and carried around as [`Name`]s.

mod arena;
mod ast;
mod error;
mod expr_id;
mod interner;
mod name;
mod span;
pub mod stack;

pub use arena::ExprArena;
pub use ast::{BinaryOp, Expr, ExprKind, IfBranch, Module, UnaryOp};
pub use error::CompilationError;
pub use expr_id::{BranchRange, ExprId, ExprRange, ParamRange};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::{LineIndex, Span};
