//! Value handles.
//!
//! Every value handed to generated code is boxed and kept in a
//! thread-local list. Scopes and sequences store clones, never handles, so
//! generated code can take a [`mark`] before a loop iteration or entry
//! statement and [`reset`] to it afterwards. Handles allocated before the
//! mark survive; the rest are dropped.

use std::cell::RefCell;

use ml_eval::Value;

thread_local! {
    static VALUES: RefCell<Vec<Box<Value>>> = const { RefCell::new(Vec::new()) };
}

/// Keep `value` alive and return its handle.
pub(crate) fn alloc(value: Value) -> *const Value {
    VALUES.with(|values| {
        let boxed = Box::new(value);
        let handle: *const Value = &*boxed;
        values.borrow_mut().push(boxed);
        handle
    })
}

/// The value behind a handle.
pub(crate) fn value<'a>(handle: *const Value) -> &'a Value {
    // SAFETY: handles come from alloc. Generated code only resets to a
    // mark taken before every handle it still uses, and release_all only
    // runs when the runtime itself is freed.
    unsafe { &*handle }
}

/// Values behind `count` handles starting at `handles`.
pub(crate) fn values(handles: *const *const Value, count: usize) -> Vec<Value> {
    if handles.is_null() || count == 0 {
        return Vec::new();
    }
    // SAFETY: generated code passes an array literal of `count` handles.
    let handles = unsafe { std::slice::from_raw_parts(handles, count) };
    handles.iter().map(|&handle| value(handle).clone()).collect()
}

/// The current arena length, for a later [`reset`].
pub(crate) fn mark() -> usize {
    VALUES.with(|values| values.borrow().len())
}

/// Drop every handle allocated since `mark` was taken.
pub(crate) fn reset(mark: usize) {
    // Values drop outside the borrow.
    let dropped = VALUES.with(|values| {
        let mut values = values.borrow_mut();
        let mark = mark.min(values.len());
        values.split_off(mark)
    });
    drop(dropped);
}

pub(crate) fn release_all() {
    VALUES.with(|values| values.borrow_mut().clear());
}

/// Number of value handles allocated on this thread and not yet released.
pub fn live_values() -> usize {
    VALUES.with(|values| values.borrow().len())
}
