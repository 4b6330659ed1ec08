//! Owned zero-initialised buffers and the unchecked accessors over them.
//!
//! This is the only module in `bumpkit-core` that contains `unsafe`. Every
//! unsafe block carries a `// SAFETY:` comment naming the caller contract
//! it relies on.

#![allow(unsafe_code)]

use std::alloc::{handle_alloc_error, Layout};
use std::mem::size_of;

use crate::config::BufferConfig;
use crate::error::BufferError;

/// Plain scalar types that may be read from or written to raw bytes.
///
/// Every bit pattern of the right width must be a valid value.
pub(crate) trait Scalar: Copy {}

impl Scalar for u8 {}
impl Scalar for i32 {}
impl Scalar for f64 {}

/// An owned, zero-initialised buffer of `T`, or nothing.
///
/// `None` covers both "never allocated" (non-positive length) and
/// "released". Releasing drops the box and leaves `None`, so a second
/// release finds nothing to free.
#[derive(Debug)]
pub(crate) struct ZeroedBuf<T> {
    data: Option<Box<[T]>>,
}

impl<T: Copy + Default> ZeroedBuf<T> {
    /// An empty buffer that owns no memory.
    pub fn empty() -> Self {
        Self { data: None }
    }

    /// Allocate `len` zeroed elements, reporting failure.
    ///
    /// `len == 0` yields an empty buffer without touching the allocator.
    pub fn try_zeroed(len: usize) -> Result<Self, BufferError> {
        if len == 0 {
            return Ok(Self::empty());
        }
        let elem_size = size_of::<T>();
        let requested = len
            .checked_mul(elem_size)
            .ok_or(BufferError::SizeOverflow { len, elem_size })?;
        let limit = BufferConfig::current().max_buffer_bytes;
        if requested > limit {
            return Err(BufferError::LimitExceeded { requested, limit });
        }
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| BufferError::AllocFailed { requested })?;
        data.resize(len, T::default());
        Ok(Self {
            data: Some(data.into_boxed_slice()),
        })
    }

    /// Allocate `len` zeroed elements, aborting the process on failure.
    pub fn zeroed_or_abort(len: usize) -> Self {
        match Self::try_zeroed(len) {
            Ok(buf) => buf,
            Err(e) => {
                tracing::error!(error = %e, len, "backing buffer allocation failed, aborting");
                match Layout::array::<T>(len) {
                    Ok(layout) => handle_alloc_error(layout),
                    Err(_) => std::process::abort(),
                }
            }
        }
    }
}

impl<T> ZeroedBuf<T> {
    /// Drop the backing memory. Idempotent.
    pub fn release(&mut self) {
        self.data = None;
    }

    /// Whether backing memory is currently owned.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Number of elements currently owned (0 once released).
    pub fn len(&self) -> usize {
        self.data.as_deref().map_or(0, <[T]>::len)
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_deref_mut().unwrap_or_default()
    }

    fn base_ptr(&self) -> *const T {
        self.data.as_deref().map_or(std::ptr::null(), <[T]>::as_ptr)
    }

    fn base_mut_ptr(&mut self) -> *mut T {
        self.data
            .as_deref_mut()
            .map_or(std::ptr::null_mut(), <[T]>::as_mut_ptr)
    }

    /// Read element `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// The buffer must be allocated and `index < self.len()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> T
    where
        T: Copy,
    {
        debug_assert!(index < self.len(), "index {index} out of bounds");
        // SAFETY: index is in bounds of the live allocation per caller contract.
        unsafe { *self.base_ptr().add(index) }
    }

    /// Write element `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// The buffer must be allocated and `index < self.len()`.
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) {
        debug_assert!(index < self.len(), "index {index} out of bounds");
        // SAFETY: index is in bounds of the live allocation per caller contract.
        unsafe { *self.base_mut_ptr().add(index) = value };
    }
}

impl ZeroedBuf<u8> {
    /// Reinterpret `size_of::<V>()` bytes at `offset` as a `V` (native order).
    ///
    /// # Safety
    ///
    /// The buffer must be allocated and `offset + size_of::<V>() <= self.len()`.
    pub unsafe fn read_unchecked<V: Scalar>(&self, offset: usize) -> V {
        debug_assert!(
            offset.saturating_add(size_of::<V>()) <= self.len(),
            "read of {} bytes at {offset} out of bounds",
            size_of::<V>()
        );
        // SAFETY: range is inside the allocation per caller contract; V accepts
        // any bit pattern and read_unaligned has no alignment requirement.
        unsafe { self.base_ptr().add(offset).cast::<V>().read_unaligned() }
    }

    /// Store `value` as `size_of::<V>()` native-order bytes at `offset`.
    ///
    /// # Safety
    ///
    /// The buffer must be allocated and `offset + size_of::<V>() <= self.len()`.
    pub unsafe fn write_unchecked<V: Scalar>(&mut self, offset: usize, value: V) {
        debug_assert!(
            offset.saturating_add(size_of::<V>()) <= self.len(),
            "write of {} bytes at {offset} out of bounds",
            size_of::<V>()
        );
        // SAFETY: range is inside the allocation per caller contract.
        unsafe {
            self.base_mut_ptr()
                .add(offset)
                .cast::<V>()
                .write_unaligned(value)
        };
    }

    /// Checked counterpart of [`read_unchecked`](Self::read_unchecked).
    pub fn read<V: Scalar>(&self, offset: usize) -> Option<V> {
        let end = offset.checked_add(size_of::<V>())?;
        if end > self.len() {
            return None;
        }
        // SAFETY: bounds checked above; len() > 0 implies allocated.
        Some(unsafe { self.read_unchecked(offset) })
    }

    /// Checked counterpart of [`write_unchecked`](Self::write_unchecked).
    pub fn write<V: Scalar>(&mut self, offset: usize, value: V) -> bool {
        let Some(end) = offset.checked_add(size_of::<V>()) else {
            return false;
        };
        if end > self.len() {
            return false;
        }
        // SAFETY: bounds checked above; len() > 0 implies allocated.
        unsafe { self.write_unchecked(offset, value) };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_len_does_not_allocate() {
        let buf = ZeroedBuf::<u8>::try_zeroed(0).unwrap();
        assert!(!buf.is_allocated());
        assert_eq!(buf.len(), 0);
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn allocation_is_zeroed() {
        let buf = ZeroedBuf::<i32>::try_zeroed(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn release_is_idempotent() {
        let mut buf = ZeroedBuf::<u8>::try_zeroed(8).unwrap();
        buf.release();
        assert!(!buf.is_allocated());
        buf.release();
        assert!(!buf.is_allocated());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn limit_is_enforced_in_bytes() {
        let _guard = BufferConfig::with_limit(15).install();
        // 4 i32s = 16 bytes > 15.
        let err = ZeroedBuf::<i32>::try_zeroed(4).unwrap_err();
        assert_eq!(
            err,
            BufferError::LimitExceeded {
                requested: 16,
                limit: 15
            }
        );
        assert!(ZeroedBuf::<u8>::try_zeroed(15).is_ok());
    }

    #[test]
    fn size_overflow_is_reported() {
        let err = ZeroedBuf::<f64>::try_zeroed(usize::MAX).unwrap_err();
        assert!(matches!(err, BufferError::SizeOverflow { .. }));
    }

    #[test]
    fn unaligned_scalar_round_trip() {
        let mut buf = ZeroedBuf::<u8>::try_zeroed(16).unwrap();
        unsafe {
            buf.write_unchecked::<f64>(3, -2.5);
            assert_eq!(buf.read_unchecked::<f64>(3), -2.5);
        }
        assert_eq!(buf.read::<f64>(3), Some(-2.5));
    }

    #[test]
    fn checked_access_rejects_tail_overrun() {
        let mut buf = ZeroedBuf::<u8>::try_zeroed(6).unwrap();
        assert!(buf.write::<i32>(2, 7));
        assert!(!buf.write::<i32>(3, 7));
        assert_eq!(buf.read::<i32>(3), None);
        assert_eq!(buf.read::<i32>(usize::MAX), None);
    }

    #[test]
    fn native_byte_order() {
        let mut buf = ZeroedBuf::<u8>::try_zeroed(4).unwrap();
        assert!(buf.write::<i32>(0, 0x0102_0304));
        assert_eq!(buf.as_slice(), &0x0102_0304i32.to_ne_bytes());
    }
}
