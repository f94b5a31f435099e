//! Lexical scope chain.
//!
//! Scopes live in an arena and refer to their parent by [`ScopeId`], so a
//! scope never owns its parent and the chain has no cycles. Exited scopes
//! are recycled unless a closure captured them (or a descendant of them).

use rustc_hash::FxHashMap;

use ml_ir::{Name, SharedInterner};

use crate::{EvalResult, RuntimeError, Value};

/// Handle to a scope in a [`ScopeArena`].
///
/// `repr(transparent)` because compiled programs pass it by value as
/// `ml_scope_t`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ScopeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Why a scope was created. Function and global scopes bound the search
/// that decides whether `VAR` declares or mutates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Branch,
    Loop,
}

impl ScopeKind {
    #[inline]
    pub fn is_frame(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Function)
    }
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    bindings: FxHashMap<Name, Value>,
    /// Captured by a closure; survives `exit`.
    pinned: bool,
    live: bool,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            bindings: FxHashMap::default(),
            pinned: false,
            live: true,
        }
    }
}

/// All scopes of one running program.
pub struct ScopeArena {
    scopes: Vec<Scope>,
    free: Vec<ScopeId>,
    interner: SharedInterner,
}

impl ScopeArena {
    /// An arena holding only the global scope.
    pub fn new(interner: SharedInterner) -> Self {
        ScopeArena {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
            free: Vec::new(),
            interner,
        }
    }

    #[inline]
    pub fn global(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Enter a new scope whose parent is `parent`.
    pub fn child(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let scope = Scope::new(kind, Some(parent));
        if let Some(id) = self.free.pop() {
            self.scopes[id.index()] = scope;
            return id;
        }
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(scope);
        id
    }

    /// Leave `scope`. Its bindings are dropped and the slot reused unless a
    /// closure pinned it. The global scope is never released.
    pub fn exit(&mut self, scope: ScopeId) {
        if scope == ScopeId::GLOBAL {
            return;
        }
        let Some(entry) = self.scopes.get_mut(scope.index()) else {
            return;
        };
        if entry.pinned || !entry.live {
            return;
        }
        entry.live = false;
        entry.bindings = FxHashMap::default();
        self.free.push(scope);
    }

    /// Keep `scope` and its ancestors alive for a closure.
    pub fn capture(&mut self, scope: ScopeId) {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = &mut self.scopes[id.index()];
            if entry.pinned {
                break;
            }
            entry.pinned = true;
            current = entry.parent;
        }
    }

    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope.index()].kind
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    /// Bind `name` in `scope` itself, shadowing any outer binding.
    pub fn define(&mut self, scope: ScopeId, name: Name, value: Value) {
        self.scopes[scope.index()].bindings.insert(name, value);
    }

    /// Resolve `name` from `scope` outwards.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> EvalResult<Value> {
        self.find(scope, name, false)
            .map(|id| self.scopes[id.index()].bindings[&name].clone())
            .ok_or_else(|| self.undefined(name))
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&mut self, scope: ScopeId, name: Name, value: Value) -> EvalResult<()> {
        match self.find(scope, name, false) {
            Some(id) => {
                self.scopes[id.index()].bindings.insert(name, value);
                Ok(())
            }
            None => Err(self.undefined(name)),
        }
    }

    /// Whether `name` is bound between `scope` and the nearest function or
    /// global scope, inclusive.
    pub fn declared_in_frame(&self, scope: ScopeId, name: Name) -> bool {
        self.find(scope, name, true).is_some()
    }

    /// `VAR name = value`: mutate a binding of the current frame, or
    /// declare a new one in `scope`.
    pub fn bind(&mut self, scope: ScopeId, name: Name, value: Value) {
        match self.find(scope, name, true) {
            Some(id) => {
                self.scopes[id.index()].bindings.insert(name, value);
            }
            None => self.define(scope, name, value),
        }
    }

    /// Number of scopes currently alive, the global scope included.
    pub fn live_count(&self) -> usize {
        self.scopes.iter().filter(|scope| scope.live).count()
    }

    fn find(&self, scope: ScopeId, name: Name, frame_only: bool) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = &self.scopes[id.index()];
            if entry.bindings.contains_key(&name) {
                return Some(id);
            }
            if frame_only && entry.kind.is_frame() {
                return None;
            }
            current = entry.parent;
        }
        None
    }

    #[cold]
    fn undefined(&self, name: Name) -> RuntimeError {
        RuntimeError::UndefinedVariable(self.interner.lookup(name).to_owned())
    }
}
