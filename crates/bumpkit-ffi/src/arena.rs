//! Arena FFI: create, alloc, reset, typed accessors, destroy.
//!
//! Arena handles are host objects (see [`crate::host`]): the host owns the
//! handle storage and runs the finalizer when the handle is collected.
//! `bumpkit_arena_destroy` lets the owner free the buffer earlier; the
//! finalizer then finds nothing left to free.
//!
//! Offsets passed to the accessors are trusted. They must come from
//! `bumpkit_arena_alloc` on the same arena, since the last reset, and the
//! access width must fit inside that allocation.

use bumpkit_core::{BumpArena, Release};
use tracing::debug;

use crate::host;
use crate::status::BUMPKIT_ALLOC_FAILED;

/// Opaque arena handle.
#[derive(Debug)]
pub struct BumpkitArena {
    inner: BumpArena,
}

impl Release for BumpkitArena {
    fn release(&mut self) {
        self.inner.release();
    }

    fn holds_buffer(&self) -> bool {
        self.inner.holds_buffer()
    }
}

#[allow(unsafe_code)]
unsafe fn arena_ref<'a>(arena: *const BumpkitArena) -> Option<&'a BumpArena> {
    // SAFETY: caller guarantees arena is null or a live handle.
    unsafe { arena.as_ref() }.map(|a| &a.inner)
}

#[allow(unsafe_code)]
unsafe fn arena_mut<'a>(arena: *mut BumpkitArena) -> Option<&'a mut BumpArena> {
    // SAFETY: caller guarantees arena is null or a live handle, used from
    // one thread at a time.
    unsafe { arena.as_mut() }.map(|a| &mut a.inner)
}

/// Create an arena of `capacity` zeroed bytes.
///
/// A non-positive capacity creates an arena with no buffer on which every
/// allocation fails. Aborts if the buffer or the host storage cannot be
/// allocated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_arena_create(capacity: i32) -> *mut BumpkitArena {
    let arena = BumpkitArena {
        inner: BumpArena::new(capacity),
    };
    let handle = host::make_external(arena);
    debug!(capacity, ?handle, "arena created");
    handle
}

/// Reserve `size` bytes aligned to `align`.
///
/// Returns the start offset, or `BUMPKIT_ALLOC_FAILED` (-1) if `size` or
/// `align` is not positive or the request does not fit.
///
/// # Safety
///
/// `arena` must be null or a live handle from `bumpkit_arena_create`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_alloc(
    arena: *mut BumpkitArena,
    size: i32,
    align: i32,
) -> i32 {
    // SAFETY: per caller contract.
    let Some(arena) = (unsafe { arena_mut(arena) }) else {
        return BUMPKIT_ALLOC_FAILED;
    };
    arena.alloc(size, align).unwrap_or(BUMPKIT_ALLOC_FAILED)
}

/// Move the arena's cursor back to zero without clearing its contents.
///
/// # Safety
///
/// `arena` must be null or a live handle from `bumpkit_arena_create`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_reset(arena: *mut BumpkitArena) {
    // SAFETY: per caller contract.
    if let Some(arena) = unsafe { arena_mut(arena) } {
        arena.reset();
    }
}

/// Capacity in bytes as requested at creation (0 for a null handle).
///
/// # Safety
///
/// `arena` must be null or a live handle from `bumpkit_arena_create`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_capacity(arena: *const BumpkitArena) -> i32 {
    // SAFETY: per caller contract.
    unsafe { arena_ref(arena) }.map_or(0, BumpArena::capacity)
}

/// Bytes consumed since creation or the last reset (0 for a null handle).
///
/// # Safety
///
/// `arena` must be null or a live handle from `bumpkit_arena_create`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_used(arena: *const BumpkitArena) -> i32 {
    // SAFETY: per caller contract.
    unsafe { arena_ref(arena) }.map_or(0, BumpArena::used)
}

/// Store a native-order `i32` at `offset`.
///
/// # Safety
///
/// `arena` must be a live handle holding its buffer, and
/// `offset..offset + 4` must lie inside a region returned by
/// `bumpkit_arena_alloc`. Nothing is checked.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_write_i32(arena: *mut BumpkitArena, offset: i32, value: i32) {
    // SAFETY: per caller contract.
    if let Some(arena) = unsafe { arena_mut(arena) } {
        unsafe { arena.write_i32_unchecked(offset, value) };
    }
}

/// Load a native-order `i32` from `offset`.
///
/// # Safety
///
/// Same contract as `bumpkit_arena_write_i32`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_read_i32(arena: *const BumpkitArena, offset: i32) -> i32 {
    // SAFETY: per caller contract.
    unsafe { arena_ref(arena) }.map_or(0, |a| unsafe { a.read_i32_unchecked(offset) })
}

/// Store a native-order `f64` at `offset`.
///
/// # Safety
///
/// `arena` must be a live handle holding its buffer, and
/// `offset..offset + 8` must lie inside a region returned by
/// `bumpkit_arena_alloc`. Nothing is checked.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_write_f64(arena: *mut BumpkitArena, offset: i32, value: f64) {
    // SAFETY: per caller contract.
    if let Some(arena) = unsafe { arena_mut(arena) } {
        unsafe { arena.write_f64_unchecked(offset, value) };
    }
}

/// Load a native-order `f64` from `offset`.
///
/// # Safety
///
/// Same contract as `bumpkit_arena_write_f64`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_read_f64(arena: *const BumpkitArena, offset: i32) -> f64 {
    // SAFETY: per caller contract.
    unsafe { arena_ref(arena) }.map_or(0.0, |a| unsafe { a.read_f64_unchecked(offset) })
}

/// Store the low 8 bits of `value` at `offset`.
///
/// # Safety
///
/// `arena` must be a live handle holding its buffer, and `offset` must lie
/// inside a region returned by `bumpkit_arena_alloc`. Nothing is checked.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_write_byte(arena: *mut BumpkitArena, offset: i32, value: i32) {
    // SAFETY: per caller contract.
    if let Some(arena) = unsafe { arena_mut(arena) } {
        unsafe { arena.write_byte_unchecked(offset, value) };
    }
}

/// Load the byte at `offset` as an unsigned value in `0..=255`.
///
/// # Safety
///
/// Same contract as `bumpkit_arena_write_byte`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_read_byte(arena: *const BumpkitArena, offset: i32) -> i32 {
    // SAFETY: per caller contract.
    unsafe { arena_ref(arena) }.map_or(0, |a| unsafe { a.read_byte_unchecked(offset) })
}

/// Free the arena's buffer now. Safe to call more than once, and safe to
/// follow with the host's finalizer.
///
/// The handle keeps answering `capacity` and `used`, but the cursor is left
/// as is, so allocating or touching memory through it after destroy is a
/// caller error.
///
/// # Safety
///
/// `arena` must be null or a handle from `bumpkit_arena_create` that the
/// host has not yet finalized.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_arena_destroy(arena: *mut BumpkitArena) {
    // SAFETY: per caller contract.
    unsafe { host::release(arena) };
    debug!(handle = ?arena, "arena destroyed");
}
