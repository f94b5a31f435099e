//! Syntax tree nodes.
//!
//! Every construct of the language is an expression: statements such as
//! `VAR`, `IF` and `FOR` produce a value too, which is how `VAR x = IF ...`
//! and single-line loops that collect their results work.

use std::fmt;

use crate::{BranchRange, ExprArena, ExprId, ExprRange, LineIndex, Name, ParamRange, Span};

/// Binary operators, in the order of the value operation table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Source-level spelling, used in error messages.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Operation name as it appears in the runtime entry points (`ml_add`, ...).
    pub const fn runtime_name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Pow => "pow",
            Self::Eq => "eq",
            Self::NotEq => "ne",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::LtEq => "lte",
            Self::GtEq => "gte",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::Gt | Self::LtEq | Self::GtEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `NOT x`
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }

    pub const fn runtime_name(self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// One `IF`/`ELIF` arm.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct IfBranch {
    pub condition: ExprId,
    pub body: ExprId,
}

/// Expression node: kind plus source span.
#[derive(Copy, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression variants.
///
/// `yields` on `If`/`For`/`While` is true for the single-line forms, whose
/// value is the body's value (a collected Sequence for loops). Block forms
/// terminated by `END` evaluate to null.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Numeric literal.
    Number(f64),
    /// String literal, interned.
    Text(Name),
    /// `[a, b, c]`
    List(ExprRange),
    /// Variable read.
    Ident(Name),
    /// `VAR name = value`: declaration or mutation, decided by scope.
    Assign { name: Name, value: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary { op: UnaryOp, operand: ExprId },
    If {
        branches: BranchRange,
        else_branch: Option<ExprId>,
        yields: bool,
    },
    /// `FOR var = start TO end [STEP step] THEN body`
    For {
        var: Name,
        start: ExprId,
        end: ExprId,
        step: Option<ExprId>,
        body: ExprId,
        yields: bool,
    },
    While {
        condition: ExprId,
        body: ExprId,
        yields: bool,
    },
    /// Function literal. Named functions also bind themselves in the
    /// enclosing scope. `auto_return` marks `-> expr` bodies.
    Function {
        name: Option<Name>,
        params: ParamRange,
        body: ExprId,
        auto_return: bool,
    },
    Call { callee: ExprId, args: ExprRange },
    /// `target[index]`
    Index { target: ExprId, index: ExprId },
    Return(Option<ExprId>),
    Continue,
    Break,
    /// `EMBED text [WITH model]`
    Embed { text: ExprId, model: Option<Name> },
    /// `AI model(args...)`
    AiCall { model: Name, args: ExprRange },
    /// `left | right`; `right` is a callee or a call whose arguments follow
    /// the piped value.
    Pipe { left: ExprId, right: ExprId },
    /// Statement list; evaluates to its last statement.
    Block(ExprRange),
}

/// A parsed source file.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub arena: ExprArena,
    /// Top-level statements in source order.
    pub body: ExprRange,
    pub lines: LineIndex,
}

impl Module {
    /// Top-level statement ids.
    pub fn statements(&self) -> &[ExprId] {
        self.arena.get_expr_list(self.body)
    }

    /// Line and column of the start of `span`.
    pub fn position(&self, span: Span) -> (u32, u32) {
        self.lines.line_col(span.start)
    }
}
