//! Fixed-length zero-initialised `i32` storage.

use crate::error::BufferError;
use crate::raw::ZeroedBuf;
use crate::release::Release;

/// A fixed-length block of `i32`s.
///
/// The length is fixed at creation; there is no push, grow or shrink. A
/// non-positive length yields an array with no buffer.
#[derive(Debug)]
pub struct FixedArray {
    data: ZeroedBuf<i32>,
    length: i32,
}

impl FixedArray {
    /// Create `length` zeroed elements, aborting if the buffer cannot be
    /// allocated.
    pub fn new(length: i32) -> Self {
        let len = usize::try_from(length).unwrap_or(0);
        Self {
            data: ZeroedBuf::zeroed_or_abort(len),
            length,
        }
    }

    /// Create `length` zeroed elements, reporting allocation failure.
    pub fn try_new(length: i32) -> Result<Self, BufferError> {
        let len = usize::try_from(length).unwrap_or(0);
        Ok(Self {
            data: ZeroedBuf::try_zeroed(len)?,
            length,
        })
    }

    /// The length requested at creation.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Checked read of element `index`.
    pub fn get(&self, index: i32) -> Option<i32> {
        let index = usize::try_from(index).ok()?;
        self.data.as_slice().get(index).copied()
    }

    /// Checked write of element `index`. Returns `false` if out of range.
    pub fn set(&mut self, index: i32, value: i32) -> bool {
        let Ok(index) = usize::try_from(index) else {
            return false;
        };
        match self.data.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Read element `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// The array must hold its buffer and `0 <= index < length`.
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked(&self, index: i32) -> i32 {
        // SAFETY: forwarded caller contract.
        unsafe { self.data.get_unchecked(index as usize) }
    }

    /// Write element `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// The array must hold its buffer and `0 <= index < length`.
    #[allow(unsafe_code)]
    pub unsafe fn set_unchecked(&mut self, index: i32, value: i32) {
        // SAFETY: forwarded caller contract.
        unsafe { self.data.set_unchecked(index as usize, value) }
    }

    /// The elements as a slice (empty once released).
    pub fn as_slice(&self) -> &[i32] {
        self.data.as_slice()
    }

    /// The elements as a mutable slice (empty once released).
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        self.data.as_mut_slice()
    }
}

impl Release for FixedArray {
    fn release(&mut self) {
        self.data.release();
    }

    fn holds_buffer(&self) -> bool {
        self.data.is_allocated()
    }
}
