//! Stack growth for recursive tree walks.
//!
//! Parsing, lowering and interpretation all recurse on the nesting depth of
//! the user's program. Wrapping each recursive step in
//! [`ensure_sufficient_stack`] grows the stack on demand instead of
//! overflowing on deeply nested input.

/// Remaining stack below which a new segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
#[cfg(not(target_arch = "wasm32"))]
const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[cfg(not(target_arch = "wasm32"))]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            ensure_sufficient_stack(|| depth(n - 1) + 1)
        }
    }

    #[test]
    fn deep_recursion_completes() {
        assert_eq!(depth(100_000), 100_000);
    }
}
