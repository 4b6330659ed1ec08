//! Fixed-capacity bump arena over a single zeroed byte buffer.
//!
//! A [`BumpArena`] hands out byte offsets, not pointers. Callers keep the
//! offsets and read or write through the arena's typed accessors, which lets
//! the arena serve as an untyped scratch buffer across a foreign-call
//! boundary where only `i32`s travel.

use tracing::trace;

use crate::error::{ArenaError, BufferError};
use crate::raw::ZeroedBuf;
use crate::release::Release;

/// A monotonic bump allocator over a fixed byte buffer.
///
/// There is no free list and no per-allocation metadata: individual
/// allocations are never reclaimed, only the whole arena via
/// [`reset`](BumpArena::reset). The capacity is fixed for the arena's
/// lifetime.
///
/// Invariant: `0 <= offset <= max(capacity, 0)`.
#[derive(Debug)]
pub struct BumpArena {
    /// Backing storage; empty when `capacity <= 0` or after release.
    base: ZeroedBuf<u8>,
    /// Requested capacity, stored as given (may be negative).
    capacity: i32,
    /// Bump pointer: first unallocated byte.
    offset: i32,
}

impl BumpArena {
    /// Create an arena of `capacity` zeroed bytes, aborting if the buffer
    /// cannot be allocated.
    ///
    /// A non-positive `capacity` creates an arena with no buffer on which
    /// every allocation fails.
    pub fn new(capacity: i32) -> Self {
        let len = usize::try_from(capacity).unwrap_or(0);
        Self {
            base: ZeroedBuf::zeroed_or_abort(len),
            capacity,
            offset: 0,
        }
    }

    /// Create an arena of `capacity` zeroed bytes, reporting allocation failure.
    pub fn try_new(capacity: i32) -> Result<Self, BufferError> {
        let len = usize::try_from(capacity).unwrap_or(0);
        Ok(Self {
            base: ZeroedBuf::try_zeroed(len)?,
            capacity,
            offset: 0,
        })
    }

    /// Reserve `size` bytes aligned to `align` and return their start offset.
    ///
    /// Any positive alignment is accepted, not only powers of two. Bounds
    /// are checked by subtracting from `capacity`, never by adding to
    /// `offset`, so no intermediate value can overflow.
    pub fn alloc(&mut self, size: i32, align: i32) -> Result<i32, ArenaError> {
        if size <= 0 || align <= 0 {
            trace!(size, align, "rejecting non-positive allocation request");
            return Err(ArenaError::InvalidRequest { size, align });
        }

        let remainder = self.offset % align;
        let padding = if remainder == 0 { 0 } else { align - remainder };
        let remaining = self.capacity - self.offset;
        if padding > remaining {
            return Err(self.exhausted(size, padding));
        }

        let aligned = self.offset + padding;
        if size > self.capacity - aligned {
            return Err(self.exhausted(size, padding));
        }

        self.offset = aligned + size;
        Ok(aligned)
    }

    fn exhausted(&self, size: i32, padding: i32) -> ArenaError {
        let remaining = self.capacity - self.offset;
        trace!(size, padding, remaining, "arena exhausted");
        ArenaError::CapacityExceeded {
            requested: size,
            padding,
            remaining,
        }
    }

    /// Move the cursor back to zero.
    ///
    /// Contents are NOT zeroed. Offsets handed out before the reset become
    /// invalid; using them afterwards is a caller error the arena cannot
    /// detect.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Capacity in bytes, exactly as requested at creation.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Bytes consumed so far, including alignment padding.
    pub fn used(&self) -> i32 {
        self.offset
    }

    /// Bytes left between the cursor and the end of the arena.
    pub fn remaining(&self) -> i32 {
        (self.capacity - self.offset).max(0)
    }

    /// The whole backing buffer (empty once released).
    pub fn as_bytes(&self) -> &[u8] {
        self.base.as_slice()
    }

    /// Checked read of a native-order `i32` at `offset`.
    pub fn read_i32(&self, offset: i32) -> Option<i32> {
        self.base.read(usize::try_from(offset).ok()?)
    }

    /// Checked write of a native-order `i32`. Returns `false` if out of range.
    pub fn write_i32(&mut self, offset: i32, value: i32) -> bool {
        usize::try_from(offset).is_ok_and(|o| self.base.write(o, value))
    }

    /// Checked read of a native-order `f64` at `offset`.
    pub fn read_f64(&self, offset: i32) -> Option<f64> {
        self.base.read(usize::try_from(offset).ok()?)
    }

    /// Checked write of a native-order `f64`. Returns `false` if out of range.
    pub fn write_f64(&mut self, offset: i32, value: f64) -> bool {
        usize::try_from(offset).is_ok_and(|o| self.base.write(o, value))
    }

    /// Checked read of one byte, widened to `0..=255`.
    pub fn read_byte(&self, offset: i32) -> Option<i32> {
        let byte: u8 = self.base.read(usize::try_from(offset).ok()?)?;
        Some(i32::from(byte))
    }

    /// Checked write of the low 8 bits of `value`. Returns `false` if out of range.
    pub fn write_byte(&mut self, offset: i32, value: i32) -> bool {
        usize::try_from(offset).is_ok_and(|o| self.base.write(o, value as u8))
    }

    /// Read a native-order `i32` at `offset` without a bounds check.
    ///
    /// # Safety
    ///
    /// The arena must hold its buffer and `offset..offset + 4` must lie
    /// within `0..capacity`.
    #[allow(unsafe_code)]
    pub unsafe fn read_i32_unchecked(&self, offset: i32) -> i32 {
        // SAFETY: forwarded caller contract.
        unsafe { self.base.read_unchecked(offset as usize) }
    }

    /// Write a native-order `i32` at `offset` without a bounds check.
    ///
    /// # Safety
    ///
    /// Same contract as [`read_i32_unchecked`](Self::read_i32_unchecked).
    #[allow(unsafe_code)]
    pub unsafe fn write_i32_unchecked(&mut self, offset: i32, value: i32) {
        // SAFETY: forwarded caller contract.
        unsafe { self.base.write_unchecked(offset as usize, value) }
    }

    /// Read a native-order `f64` at `offset` without a bounds check.
    ///
    /// # Safety
    ///
    /// The arena must hold its buffer and `offset..offset + 8` must lie
    /// within `0..capacity`.
    #[allow(unsafe_code)]
    pub unsafe fn read_f64_unchecked(&self, offset: i32) -> f64 {
        // SAFETY: forwarded caller contract.
        unsafe { self.base.read_unchecked(offset as usize) }
    }

    /// Write a native-order `f64` at `offset` without a bounds check.
    ///
    /// # Safety
    ///
    /// Same contract as [`read_f64_unchecked`](Self::read_f64_unchecked).
    #[allow(unsafe_code)]
    pub unsafe fn write_f64_unchecked(&mut self, offset: i32, value: f64) {
        // SAFETY: forwarded caller contract.
        unsafe { self.base.write_unchecked(offset as usize, value) }
    }

    /// Read one byte at `offset`, widened to `0..=255`, without a bounds check.
    ///
    /// # Safety
    ///
    /// The arena must hold its buffer and `0 <= offset < capacity`.
    #[allow(unsafe_code)]
    pub unsafe fn read_byte_unchecked(&self, offset: i32) -> i32 {
        // SAFETY: forwarded caller contract.
        let byte: u8 = unsafe { self.base.read_unchecked(offset as usize) };
        i32::from(byte)
    }

    /// Store the low 8 bits of `value` at `offset` without a bounds check.
    ///
    /// # Safety
    ///
    /// Same contract as [`read_byte_unchecked`](Self::read_byte_unchecked).
    #[allow(unsafe_code)]
    pub unsafe fn write_byte_unchecked(&mut self, offset: i32, value: i32) {
        // SAFETY: forwarded caller contract.
        unsafe { self.base.write_unchecked(offset as usize, value as u8) }
    }
}

impl Release for BumpArena {
    fn release(&mut self) {
        self.base.release();
    }

    fn holds_buffer(&self) -> bool {
        self.base.is_allocated()
    }
}
