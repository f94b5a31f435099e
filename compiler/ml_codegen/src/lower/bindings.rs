//! Names bound more than once per frame.

use rustc_hash::{FxHashMap, FxHashSet};

use ml_ir::stack::ensure_sufficient_stack;
use ml_ir::{ExprArena, ExprId, ExprKind, Name};

/// Names bound at least twice by `roots`, not looking inside nested
/// function bodies (those are separate frames).
///
/// A binding is a `VAR`, a `FOR` variable or a named function literal.
/// The static type of such a name may differ between two reads, so the
/// lowering treats it as unknown.
pub(crate) fn rebound_names(arena: &ExprArena, roots: &[ExprId]) -> FxHashSet<Name> {
    let mut counts = FxHashMap::default();
    for &root in roots {
        count_bindings(arena, root, &mut counts);
    }
    counts
        .into_iter()
        .filter_map(|(name, count)| (count > 1).then_some(name))
        .collect()
}

fn count_bindings(arena: &ExprArena, id: ExprId, counts: &mut FxHashMap<Name, u32>) {
    ensure_sufficient_stack(|| {
        let mut bind = |name: Name| *counts.entry(name).or_insert(0) += 1;
        let mut children: Vec<ExprId> = Vec::new();
        match arena.get_expr(id).kind {
            ExprKind::Number(_)
            | ExprKind::Text(_)
            | ExprKind::Ident(_)
            | ExprKind::Continue
            | ExprKind::Break
            | ExprKind::Return(None) => {}
            ExprKind::Function { name, .. } => {
                if let Some(name) = name {
                    bind(name);
                }
            }
            ExprKind::Assign { name, value } => {
                bind(name);
                children.push(value);
            }
            ExprKind::For {
                var,
                start,
                end,
                step,
                body,
                ..
            } => {
                bind(var);
                children.extend([start, end]);
                children.extend(step);
                children.push(body);
            }
            ExprKind::List(items) | ExprKind::Block(items) | ExprKind::AiCall { args: items, .. } => {
                children.extend_from_slice(arena.get_expr_list(items));
            }
            ExprKind::Call { callee, args } => {
                children.push(callee);
                children.extend_from_slice(arena.get_expr_list(args));
            }
            ExprKind::Binary { left, right, .. } | ExprKind::Pipe { left, right } => {
                children.extend([left, right]);
            }
            ExprKind::Index { target, index } => children.extend([target, index]),
            ExprKind::Unary { operand, .. } => children.push(operand),
            ExprKind::Return(Some(value)) => children.push(value),
            ExprKind::Embed { text, .. } => children.push(text),
            ExprKind::If {
                branches,
                else_branch,
                ..
            } => {
                for branch in arena.get_branches(branches) {
                    children.extend([branch.condition, branch.body]);
                }
                children.extend(else_branch);
            }
            ExprKind::While {
                condition, body, ..
            } => children.extend([condition, body]),
        }
        for child in children {
            count_bindings(arena, child, counts);
        }
    });
}
