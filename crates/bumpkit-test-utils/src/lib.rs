//! Test utilities for bumpkit development.
//!
//! Provides [`RecordingHost`], a stand-in for the managed host's
//! external-object allocator. It allocates handle storage, remembers each
//! object's finalizer, and lets a test play the collector by finalizing
//! objects on demand.
//!
//! Host state is per thread, so tests running in parallel do not see each
//! other's objects.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::cell::{Cell, RefCell};
use std::ffi::c_void;

use bumpkit_ffi::host::{bumpkit_register_host, FinalizeFn};

/// Alignment of every storage block handed out, enough for any scalar.
pub const HOST_ALIGN: usize = 16;

struct HostObject {
    ptr: *mut c_void,
    layout: Layout,
    finalize: FinalizeFn,
}

thread_local! {
    static OBJECTS: RefCell<Vec<HostObject>> = const { RefCell::new(Vec::new()) };
    static FINALIZED: Cell<usize> = const { Cell::new(0) };
}

#[allow(unsafe_code)]
unsafe extern "C" fn recording_alloc(finalize: FinalizeFn, size: i32) -> *mut c_void {
    let Ok(size) = usize::try_from(size) else {
        return std::ptr::null_mut();
    };
    let Ok(layout) = Layout::from_size_align(size.max(1), HOST_ALIGN) else {
        return std::ptr::null_mut();
    };
    // SAFETY: layout has non-zero size.
    let ptr = unsafe { alloc_zeroed(layout) }.cast::<c_void>();
    if !ptr.is_null() {
        OBJECTS.with(|objs| {
            objs.borrow_mut().push(HostObject {
                ptr,
                layout,
                finalize,
            })
        });
    }
    ptr
}

/// Handle to the thread's fake host. All methods act on the calling thread.
pub struct RecordingHost;

impl RecordingHost {
    /// Register the recording allocator with bumpkit-ffi and return a handle
    /// to this thread's host state.
    pub fn install() -> Self {
        bumpkit_register_host(Some(recording_alloc));
        RecordingHost
    }

    /// Objects allocated on this thread and not yet collected.
    pub fn live_objects(&self) -> usize {
        OBJECTS.with(|objs| objs.borrow().len())
    }

    /// Finalizers run on this thread so far.
    pub fn finalized(&self) -> usize {
        FINALIZED.with(Cell::get)
    }

    /// Play the collector for one object: run its finalizer once and free
    /// its storage. Returns `false` if the object is unknown or already
    /// collected.
    pub fn collect<T>(&self, handle: *mut T) -> bool {
        let target = handle.cast::<c_void>();
        let found = OBJECTS.with(|objs| {
            let mut objs = objs.borrow_mut();
            let idx = objs.iter().position(|o| o.ptr == target)?;
            Some(objs.swap_remove(idx))
        });
        match found {
            Some(obj) => {
                finalize_and_free(obj);
                true
            }
            None => false,
        }
    }

    /// Collect every live object on this thread. Returns how many ran.
    pub fn collect_all(&self) -> usize {
        let objs = OBJECTS.with(|objs| std::mem::take(&mut *objs.borrow_mut()));
        let n = objs.len();
        for obj in objs {
            finalize_and_free(obj);
        }
        n
    }
}

#[allow(unsafe_code)]
fn finalize_and_free(obj: HostObject) {
    // SAFETY: obj was allocated by recording_alloc with this finalizer and
    // has been removed from the table, so it is finalized exactly once.
    unsafe {
        (obj.finalize)(obj.ptr);
        dealloc(obj.ptr.cast::<u8>(), obj.layout);
    }
    FINALIZED.with(|n| n.set(n.get() + 1));
}
