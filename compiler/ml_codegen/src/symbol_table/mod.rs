//! Compile-time mirror of the runtime scope chain.
//!
//! The lowering enters a level wherever the runtime creates a scope
//! (function calls, branch bodies, loop iterations), so a name resolves to
//! the same declaration in both. Each level also remembers the C variable
//! holding its runtime scope, which is what lets `BREAK`, `CONTINUE` and
//! `RETURN` release the right scopes before jumping.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use ml_ir::Name;

/// Static type tag of a generated expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StaticType {
    Number,
    Text,
    Sequence,
    Callable,
    /// Not known at compile time; the generated code dispatches on the
    /// runtime value.
    Unknown,
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StaticType::Number => "number",
            StaticType::Text => "text",
            StaticType::Sequence => "sequence",
            StaticType::Callable => "callable",
            StaticType::Unknown => "unknown",
        })
    }
}

/// Why a level was entered. Mirrors the runtime scope kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelKind {
    Global,
    Function,
    Branch,
    Loop,
}

impl LevelKind {
    fn is_frame(self) -> bool {
        matches!(self, LevelKind::Global | LevelKind::Function)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct LevelId(u32);

impl LevelId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Level {
    kind: LevelKind,
    parent: Option<LevelId>,
    declarations: FxHashMap<Name, StaticType>,
    /// C variable of type `ml_scope_t` for this level.
    scope_var: String,
    /// Names bound more than once in this frame. Their type can change
    /// between reads, so it is never reported. Only used on frame levels.
    rebound: FxHashSet<Name>,
}

/// Why a control transfer could not be lowered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpError {
    /// `BREAK`/`CONTINUE` with no loop between it and the function boundary.
    NotInLoop,
    /// `RETURN` at top level.
    NotInFunction,
}

/// Levels of one lowering run, addressed by index.
#[derive(Debug)]
pub struct SymbolTable {
    levels: Vec<Level>,
    current: LevelId,
}

impl SymbolTable {
    /// A table holding only the global level, whose runtime scope lives in
    /// the C variable `scope_var`.
    pub fn new(scope_var: impl Into<String>) -> Self {
        SymbolTable {
            levels: vec![Level {
                kind: LevelKind::Global,
                parent: None,
                declarations: FxHashMap::default(),
                scope_var: scope_var.into(),
                rebound: FxHashSet::default(),
            }],
            current: LevelId(0),
        }
    }

    /// Enter a child level of the current one.
    pub fn enter(&mut self, kind: LevelKind, scope_var: impl Into<String>) {
        let id = LevelId(u32::try_from(self.levels.len()).unwrap_or(u32::MAX));
        self.levels.push(Level {
            kind,
            parent: Some(self.current),
            declarations: FxHashMap::default(),
            scope_var: scope_var.into(),
            rebound: FxHashSet::default(),
        });
        self.current = id;
    }

    /// Return to the parent level. The global level is never left.
    pub fn exit(&mut self) {
        if let Some(parent) = self.level(self.current).parent {
            self.current = parent;
        }
    }

    pub fn kind(&self) -> LevelKind {
        self.level(self.current).kind
    }

    /// C variable holding the runtime scope of the current level.
    pub fn scope_var(&self) -> &str {
        &self.level(self.current).scope_var
    }

    /// Record the names bound more than once in the current frame.
    pub fn set_rebound(&mut self, names: FxHashSet<Name>) {
        let frame = self.frame_of(self.current);
        self.levels[frame.index()].rebound = names;
    }

    /// Declare `name` in the current level.
    pub fn define(&mut self, name: Name, ty: StaticType) {
        let current = self.current;
        self.levels[current.index()].declarations.insert(name, ty);
    }

    /// Whether `name` is visible from the current level.
    pub fn is_declared(&self, name: Name) -> bool {
        self.find(name, false).is_some()
    }

    /// Whether `name` is declared between the current level and the
    /// nearest function or global level, inclusive. Decides whether
    /// `VAR name = ...` mutates or declares.
    pub fn declared_in_frame(&self, name: Name) -> bool {
        self.find(name, true).is_some()
    }

    /// Static type of `name`; `Unknown` when undeclared or rebound.
    pub fn type_of(&self, name: Name) -> StaticType {
        let Some(level) = self.find(name, false) else {
            return StaticType::Unknown;
        };
        let frame = self.frame_of(level);
        if self.level(frame).rebound.contains(&name) {
            return StaticType::Unknown;
        }
        self.level(level)
            .declarations
            .get(&name)
            .copied()
            .unwrap_or(StaticType::Unknown)
    }

    /// Scope variables to release for a `BREAK` or `CONTINUE`, innermost
    /// first, ending with the loop iteration scope.
    pub fn loop_exits(&self) -> Result<Vec<&str>, JumpError> {
        let mut exits = Vec::new();
        let mut current = Some(self.current);
        while let Some(id) = current {
            let level = self.level(id);
            match level.kind {
                LevelKind::Loop => {
                    exits.push(level.scope_var.as_str());
                    return Ok(exits);
                }
                LevelKind::Branch => exits.push(level.scope_var.as_str()),
                LevelKind::Function | LevelKind::Global => break,
            }
            current = level.parent;
        }
        Err(JumpError::NotInLoop)
    }

    /// Scope variables to release for a `RETURN`, innermost first. The
    /// function scope itself is released by the runtime call.
    pub fn return_exits(&self) -> Result<Vec<&str>, JumpError> {
        let mut exits = Vec::new();
        let mut current = Some(self.current);
        while let Some(id) = current {
            let level = self.level(id);
            match level.kind {
                LevelKind::Function => return Ok(exits),
                LevelKind::Global => break,
                LevelKind::Branch | LevelKind::Loop => exits.push(level.scope_var.as_str()),
            }
            current = level.parent;
        }
        Err(JumpError::NotInFunction)
    }

    fn level(&self, id: LevelId) -> &Level {
        &self.levels[id.index()]
    }

    fn frame_of(&self, mut id: LevelId) -> LevelId {
        loop {
            let level = self.level(id);
            match level.parent {
                Some(parent) if !level.kind.is_frame() => id = parent,
                _ => return id,
            }
        }
    }

    fn find(&self, name: Name, frame_only: bool) -> Option<LevelId> {
        let mut current = Some(self.current);
        while let Some(id) = current {
            let level = self.level(id);
            if level.declarations.contains_key(&name) {
                return Some(id);
            }
            if frame_only && level.kind.is_frame() {
                return None;
            }
            current = level.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests;
