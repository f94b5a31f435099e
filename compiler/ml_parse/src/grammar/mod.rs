//! Grammar productions, split by construct.

mod control;
mod expr;
