//! String interner for identifiers and literals.
//!
//! Interned strings are leaked to get a `'static` lifetime; a compiler run
//! interns a bounded vocabulary so the leak is bounded too.

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

#[derive(Default)]
struct Table {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Maps strings to compact [`Name`] handles and back.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// Create an interner with the empty string pre-interned as [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut table = Table::default();
        table.map.insert("", 0);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `s`, returning the existing name if it was seen before.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&index) = self.table.read().map.get(s) {
            return Name::from_raw(index);
        }

        let mut table = self.table.write();
        // Another caller may have inserted it between the two locks.
        if let Some(&index) = table.map.get(s) {
            return Name::from_raw(index);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        table.strings.push(leaked);
        table.map.insert(leaked, index);
        Name::from_raw(index)
    }

    /// Look up the string behind `name`.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Name for `s` if it has already been interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied().map(Name::from_raw)
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        // The empty string is always present.
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaply clonable handle to one interner shared by parser, interpreter and
/// lowering.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("total");
        let b = interner.intern("total");
        let c = interner.intern("count");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.lookup(a), "total");
        assert_eq!(interner.lookup(c), "count");
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn shared_handles_see_the_same_table() {
        let shared = SharedInterner::new();
        let other = shared.clone();
        let name = shared.intern("print");
        assert_eq!(other.get("print"), Some(name));
        assert_eq!(other.get("missing"), None);
    }
}
