//! Finalizer-backed fixed array FFI.
//!
//! Same ownership model as the arena: the host owns the handle storage and
//! finalizes it; `bumpkit_array_destroy` only frees the element buffer.

use bumpkit_core::{FixedArray, Release};
use tracing::debug;

use crate::host;

/// Opaque handle to a host-finalized fixed array.
#[derive(Debug)]
pub struct BumpkitArray {
    inner: FixedArray,
}

impl Release for BumpkitArray {
    fn release(&mut self) {
        self.inner.release();
    }

    fn holds_buffer(&self) -> bool {
        self.inner.holds_buffer()
    }
}

/// Create an array of `length` zeroed `i32`s.
///
/// A non-positive length creates an array with no buffer. Aborts if the
/// buffer or the host storage cannot be allocated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_array_create(length: i32) -> *mut BumpkitArray {
    let array = BumpkitArray {
        inner: FixedArray::new(length),
    };
    let handle = host::make_external(array);
    debug!(length, ?handle, "array created");
    handle
}

/// Element at `index`.
///
/// # Safety
///
/// `array` must be a live handle holding its buffer and
/// `0 <= index < length`. Nothing is checked.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_array_get(array: *const BumpkitArray, index: i32) -> i32 {
    // SAFETY: per caller contract.
    match unsafe { array.as_ref() } {
        Some(array) => unsafe { array.inner.get_unchecked(index) },
        None => 0,
    }
}

/// Overwrite the element at `index`.
///
/// # Safety
///
/// Same contract as `bumpkit_array_get`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_array_set(array: *mut BumpkitArray, index: i32, value: i32) {
    // SAFETY: per caller contract.
    if let Some(array) = unsafe { array.as_mut() } {
        unsafe { array.inner.set_unchecked(index, value) };
    }
}

/// Length as requested at creation (0 for a null handle).
///
/// # Safety
///
/// `array` must be null or a live handle from `bumpkit_array_create`.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_array_length(array: *const BumpkitArray) -> i32 {
    // SAFETY: per caller contract.
    unsafe { array.as_ref() }.map_or(0, |a| a.inner.length())
}

/// Free the element buffer now. Safe to call more than once, and safe to
/// follow with the host's finalizer.
///
/// # Safety
///
/// `array` must be null or a handle from `bumpkit_array_create` that the
/// host has not yet finalized.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn bumpkit_array_destroy(array: *mut BumpkitArray) {
    // SAFETY: per caller contract.
    unsafe { host::release(array) };
    debug!(handle = ?array, "array destroyed");
}
