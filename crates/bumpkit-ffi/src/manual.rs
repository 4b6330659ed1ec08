//! Manually managed fixed array FFI.
//!
//! No host finalizer is involved: the owner must call
//! `bumpkit_manual_array_destroy` exactly when done. Arrays live in a global
//! `HandleTable`, which owns both the element buffer and the handle's
//! slot, and hands out generation-checked `u64` handles.
//!
//! Creation reports failure with [`BUMPKIT_NULL_HANDLE`] instead of aborting;
//! callers test it with `bumpkit_manual_array_is_null` before any other
//! call. Destroyed or never-created handles resolve to nothing, so a second
//! destroy, or a get/set on a destroyed handle, is a logged no-op.

use std::sync::{Mutex, MutexGuard};

use bumpkit_core::{FixedArray, Release};
use tracing::{debug, warn};

use crate::handle::HandleTable;
use crate::status::BUMPKIT_NULL_HANDLE;

static MANUAL_ARRAYS: Mutex<HandleTable<FixedArray>> = Mutex::new(HandleTable::new());

fn arrays() -> MutexGuard<'static, HandleTable<FixedArray>> {
    // A panic cannot leave the table half-updated: every mutation is a
    // single push, pop or take.
    MANUAL_ARRAYS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Create an array of `length` zeroed `i32`s.
///
/// Returns [`BUMPKIT_NULL_HANDLE`] if the buffer cannot be allocated (including
/// when it exceeds the limit set with `bumpkit_set_buffer_limit`). A
/// non-positive length succeeds with an empty array.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_manual_array_create(length: i32) -> u64 {
    match FixedArray::try_new(length) {
        Ok(array) => {
            let handle = arrays().insert(array);
            debug!(length, handle, "manual array created");
            handle
        }
        Err(e) => {
            warn!(length, error = %e, "manual array allocation failed");
            BUMPKIT_NULL_HANDLE
        }
    }
}

/// Whether `handle` is the null handle returned on creation failure.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_manual_array_is_null(handle: u64) -> bool {
    handle == BUMPKIT_NULL_HANDLE
}

/// Element at `index`. Returns 0 for a null or destroyed handle.
///
/// # Safety
///
/// For a live handle, `0 <= index < length`. The index is not checked.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_manual_array_get(handle: u64, index: i32) -> i32 {
    let table = arrays();
    match table.get(handle) {
        // SAFETY: index in range per caller contract.
        Some(array) => unsafe { array.get_unchecked(index) },
        None => {
            warn!(handle, "get on stale manual array handle");
            0
        }
    }
}

/// Overwrite the element at `index`. No-op for a null or destroyed handle.
///
/// # Safety
///
/// For a live handle, `0 <= index < length`. The index is not checked.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_manual_array_set(handle: u64, index: i32, value: i32) {
    let mut table = arrays();
    match table.get_mut(handle) {
        // SAFETY: index in range per caller contract.
        Some(array) => unsafe { array.set_unchecked(index, value) },
        None => warn!(handle, "set on stale manual array handle"),
    }
}

/// Length as requested at creation. Returns 0 for a null or destroyed handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_manual_array_length(handle: u64) -> i32 {
    arrays().get(handle).map_or(0, FixedArray::length)
}

/// Free the array's buffer and its handle slot.
///
/// Safe to call with a null handle or more than once: later calls find a
/// stale generation and do nothing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_manual_array_destroy(handle: u64) {
    let removed = arrays().remove(handle);
    match removed {
        Some(mut array) => {
            array.release();
            debug!(handle, "manual array destroyed");
        }
        None => debug!(handle, "manual array destroy on stale handle ignored"),
    }
}
