//! The idempotent release contract shared by every component.
//!
//! A component may be released by more than one trigger: an explicit
//! destroy from its owner, a finalizer run by the host's collector, or an
//! ordinary Rust `Drop`. Whichever fires first frees the buffer; the rest
//! find nothing left to free.

/// A resource whose backing buffer can be freed ahead of the value itself.
pub trait Release {
    /// Free the backing buffer if one is owned and leave the value empty.
    ///
    /// Must be idempotent: calling it on an already-released value is a no-op.
    fn release(&mut self);

    /// Whether a backing buffer is currently owned.
    ///
    /// `false` both after [`release`](Release::release) and for values
    /// created with a non-positive size.
    fn holds_buffer(&self) -> bool;
}

impl<T: Release + ?Sized> Release for &mut T {
    fn release(&mut self) {
        (**self).release();
    }

    fn holds_buffer(&self) -> bool {
        (**self).holds_buffer()
    }
}

/// Releases the wrapped value when the guard goes out of scope.
///
/// Gives scoped, single-release ownership of a component that is otherwise
/// released by hand, e.g. when a Rust caller borrows a handle for the length
/// of one call.
#[derive(Debug)]
pub struct ReleaseOnDrop<T: Release> {
    inner: T,
}

impl<T: Release> ReleaseOnDrop<T> {
    /// Wrap `inner`; it is released when the guard drops.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Release> std::ops::Deref for ReleaseOnDrop<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Release> std::ops::DerefMut for ReleaseOnDrop<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Release> Drop for ReleaseOnDrop<T> {
    fn drop(&mut self) {
        self.inner.release();
    }
}
