//! Operators and indexing.
//!
//! One entry point per operator, each delegating to the interpreter's
//! operation table so compiled and interpreted programs agree.

use ml_eval::operators::{evaluate_binary, evaluate_unary, index_get};
use ml_eval::{Machine, Value};
use ml_ir::{BinaryOp, UnaryOp};

use crate::arena::{alloc, value};
use crate::check;

macro_rules! binary_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name(
                _rt: *mut Machine,
                left: *const Value,
                right: *const Value,
            ) -> *const Value {
                binary(BinaryOp::$op, left, right)
            }
        )*
    };
}

binary_ops! {
    ml_add => Add,
    ml_sub => Sub,
    ml_mul => Mul,
    ml_div => Div,
    ml_pow => Pow,
    ml_eq => Eq,
    ml_ne => NotEq,
    ml_lt => Lt,
    ml_gt => Gt,
    ml_lte => LtEq,
    ml_gte => GtEq,
    ml_and => And,
    ml_or => Or,
}

fn binary(op: BinaryOp, left: *const Value, right: *const Value) -> *const Value {
    alloc(check(evaluate_binary(op, value(left), value(right))))
}

#[no_mangle]
pub extern "C" fn ml_neg(_rt: *mut Machine, operand: *const Value) -> *const Value {
    alloc(check(evaluate_unary(UnaryOp::Neg, value(operand))))
}

#[no_mangle]
pub extern "C" fn ml_not(_rt: *mut Machine, operand: *const Value) -> *const Value {
    alloc(check(evaluate_unary(UnaryOp::Not, value(operand))))
}

/// `target[index]`
#[no_mangle]
pub extern "C" fn ml_index_get(
    _rt: *mut Machine,
    target: *const Value,
    index: *const Value,
) -> *const Value {
    alloc(check(index_get(value(target), value(index))))
}
