//! Shared, mutable sequences.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::{EvalResult, RuntimeError, Value};

/// A reference-counted list of values.
///
/// Cloning a `Sequence` aliases it; use [`Sequence::deep_copy`] for an
/// independent one.
#[derive(Clone, Default)]
pub struct Sequence(Rc<RefCell<Vec<Value>>>);

impl Sequence {
    pub fn new(items: Vec<Value>) -> Self {
        Sequence(Rc::new(RefCell::new(items)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    /// Element list at this moment, detached from later mutation of the
    /// sequence itself (elements are still shared).
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Resolve a possibly negative index against the current length.
    pub fn resolve(&self, index: i64) -> EvalResult<usize> {
        let length = self.len();
        let signed_len = i64::try_from(length).unwrap_or(i64::MAX);
        let resolved = if index < 0 { index + signed_len } else { index };
        if (0..signed_len).contains(&resolved) {
            usize::try_from(resolved).map_err(|_| RuntimeError::IndexOutOfRange { index, length })
        } else {
            Err(RuntimeError::IndexOutOfRange { index, length })
        }
    }

    pub fn get(&self, index: i64) -> EvalResult<Value> {
        let slot = self.resolve(index)?;
        Ok(self.0.borrow()[slot].clone())
    }

    pub fn set(&self, index: i64, value: Value) -> EvalResult<()> {
        let slot = self.resolve(index)?;
        self.0.borrow_mut()[slot] = value;
        Ok(())
    }

    pub fn append(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Remove and return the element at `index`.
    pub fn remove(&self, index: i64) -> EvalResult<Value> {
        let slot = self.resolve(index)?;
        Ok(self.0.borrow_mut().remove(slot))
    }

    /// Copy element by element. A sequence reached again from inside
    /// itself maps to its own copy, so cycles are kept rather than
    /// unrolled.
    pub(crate) fn deep_copy(&self) -> Sequence {
        self.copy_within(&mut Vec::new())
    }

    /// `open` pairs each sequence being copied with its copy.
    fn copy_within(&self, open: &mut Vec<(Sequence, Sequence)>) -> Sequence {
        if let Some((_, copy)) = open.iter().find(|(original, _)| original.ptr_eq(self)) {
            return copy.clone();
        }
        let copy = Sequence::default();
        open.push((self.clone(), copy.clone()));
        let items = self
            .snapshot()
            .iter()
            .map(|item| match item {
                Value::Sequence(seq) => Value::Sequence(seq.copy_within(open)),
                other => other.clone(),
            })
            .collect();
        open.pop();
        *copy.0.borrow_mut() = items;
        copy
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Value::Sequence(self.clone()).render())
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Sequence::new(items)
    }
}
