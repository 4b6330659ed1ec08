//! Host-managed object storage with finalizer registration.
//!
//! The managed host provides one allocation entry point: given a finalizer
//! and a size, it returns storage for a native object and promises to run
//! the finalizer at most once, when its collector finds the object
//! unreachable. Objects created here live in that storage; the host, not
//! this crate, reclaims it.
//!
//! The finalizer releases the object's buffer through [`Release`], which is
//! idempotent, so it is safe whether or not the owner already called the
//! explicit destroy function.

use std::ffi::c_void;
use std::mem::{align_of, size_of};
use std::sync::Mutex;

use bumpkit_core::Release;
use tracing::{debug, error};

/// Finalizer callback handed to the host allocator.
pub type FinalizeFn = unsafe extern "C" fn(object: *mut c_void);

/// Host allocator: returns `size` bytes of storage whose finalizer is
/// `finalize`. Storage must be aligned for any scalar type.
pub type HostAllocFn = unsafe extern "C" fn(finalize: FinalizeFn, size: i32) -> *mut c_void;

static HOST: Mutex<Option<HostAllocFn>> = Mutex::new(None);

/// Register the host's external-object allocator.
///
/// Must be called before any finalizer-backed object is created. Passing
/// null unregisters the current allocator. Objects already created keep
/// their storage and finalizer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_register_host(alloc: Option<HostAllocFn>) {
    match HOST.lock() {
        Ok(mut host) => *host = alloc,
        Err(poisoned) => *poisoned.into_inner() = alloc,
    }
    debug!(registered = alloc.is_some(), "host allocator updated");
}

fn host_alloc() -> Option<HostAllocFn> {
    match HOST.lock() {
        Ok(host) => *host,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn fatal(reason: &str) -> ! {
    error!(reason, "cannot create host object, aborting");
    std::process::abort()
}

/// Move `value` into host-owned storage registered with [`finalize`].
///
/// Aborts if no host is registered, the host returns null, or the storage
/// is misaligned: the host already tracks the object, so there is no way
/// left to report the failure.
#[allow(unsafe_code)]
pub(crate) fn make_external<T: Release>(value: T) -> *mut T {
    let Some(alloc) = host_alloc() else {
        fatal("no host allocator registered");
    };
    let Ok(size) = i32::try_from(size_of::<T>()) else {
        fatal("object size exceeds i32");
    };
    // SAFETY: alloc is the host's allocator as registered; it accepts any
    // finalizer and size.
    let raw = unsafe { alloc(finalize::<T>, size) };
    if raw.is_null() {
        fatal("host allocator returned null");
    }
    let object = raw.cast::<T>();
    if (object as usize) % align_of::<T>() != 0 {
        fatal("host storage is misaligned");
    }
    // SAFETY: non-null, aligned, and at least size_of::<T>() bytes per the
    // host contract. The storage is uninitialised, so write, not assign.
    unsafe { object.write(value) };
    object
}

/// Finalizer registered for every host object of type `T`.
///
/// Releases the buffer and drops the object in place; the host then frees
/// the storage itself.
///
/// # Safety
///
/// `object` must be null or storage previously returned for a `T` by
/// [`make_external`], and the host must call this at most once per object.
#[allow(unsafe_code)]
pub(crate) unsafe extern "C" fn finalize<T: Release>(object: *mut c_void) {
    let object = object.cast::<T>();
    // SAFETY: per contract object is null or a live T written by make_external.
    let Some(value) = (unsafe { object.as_mut() }) else {
        return;
    };
    value.release();
    // SAFETY: the host runs the finalizer once, so the T is dropped once.
    unsafe { std::ptr::drop_in_place(object) };
}

/// Release the buffer of a host object without touching its storage.
///
/// # Safety
///
/// `object` must be null or a live object returned by [`make_external`].
#[allow(unsafe_code)]
pub(crate) unsafe fn release<T: Release>(object: *mut T) {
    // SAFETY: per contract.
    if let Some(value) = unsafe { object.as_mut() } {
        value.release();
    }
}
