//! C-visible sentinel values.
//!
//! Values are ABI-stable.

/// Returned by `bumpkit_arena_alloc` when a request is rejected.
pub const BUMPKIT_ALLOC_FAILED: i32 = -1;

/// Manual-array handle that refers to nothing; returned when creation fails.
pub const BUMPKIT_NULL_HANDLE: u64 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_values_are_stable() {
        assert_eq!(BUMPKIT_ALLOC_FAILED, -1);
        assert_eq!(BUMPKIT_NULL_HANDLE, 0);
    }
}
