//! Arena storage for the flat syntax tree.

use std::fmt;

use crate::{BranchRange, Expr, ExprId, ExprRange, IfBranch, Name, ParamRange};

#[inline]
fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Contiguous storage for all expressions of a module.
///
/// Child references use [`ExprId`]; variable-length children live in side
/// tables addressed by ranges.
#[derive(Clone, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    params: Vec<Name>,
    branches: Vec<IfBranch>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for a source file, roughly one node per eight bytes.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 8;
        ExprArena {
            exprs: Vec::with_capacity(estimated),
            expr_lists: Vec::with_capacity(estimated / 2),
            params: Vec::with_capacity(estimated / 16),
            branches: Vec::with_capacity(estimated / 16),
        }
    }

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(ids);
        ExprRange::new(to_u32(start), to_u32(self.expr_lists.len() - start))
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.bounds()]
    }

    pub fn alloc_params(&mut self, names: impl IntoIterator<Item = Name>) -> ParamRange {
        let start = self.params.len();
        self.params.extend(names);
        ParamRange::new(to_u32(start), to_u32(self.params.len() - start))
    }

    #[inline]
    pub fn get_params(&self, range: ParamRange) -> &[Name] {
        &self.params[range.bounds()]
    }

    pub fn alloc_branches(&mut self, branches: impl IntoIterator<Item = IfBranch>) -> BranchRange {
        let start = self.branches.len();
        self.branches.extend(branches);
        BranchRange::new(to_u32(start), to_u32(self.branches.len() - start))
    }

    #[inline]
    pub fn get_branches(&self, range: BranchRange) -> &[IfBranch] {
        &self.branches[range.bounds()]
    }
}

impl fmt::Debug for ExprArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprArena")
            .field("exprs", &self.exprs.len())
            .field("expr_lists", &self.expr_lists.len())
            .field("params", &self.params.len())
            .field("branches", &self.branches.len())
            .finish()
    }
}
