//! Error types for buffer acquisition and arena allocation.

use thiserror::Error;

/// Errors raised while acquiring a zero-initialised backing buffer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BufferError {
    /// `len * size_of::<T>()` does not fit in `usize`.
    #[error("buffer size overflow: {len} elements of {elem_size} bytes")]
    SizeOverflow {
        /// Requested element count.
        len: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// The request is larger than the calling thread's configured limit.
    #[error("buffer limit exceeded: requested {requested} bytes, limit {limit} bytes")]
    LimitExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Active `BufferConfig::max_buffer_bytes`.
        limit: usize,
    },
    /// The global allocator refused the request.
    #[error("allocation of {requested} bytes failed")]
    AllocFailed {
        /// Number of bytes requested.
        requested: usize,
    },
}

/// Reasons a [`BumpArena::alloc`](crate::BumpArena::alloc) request is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Size or alignment was zero or negative.
    #[error("invalid allocation request: size {size}, align {align}")]
    InvalidRequest {
        /// Requested size in bytes.
        size: i32,
        /// Requested alignment in bytes.
        align: i32,
    },
    /// Not enough room left after alignment padding.
    #[error(
        "arena capacity exceeded: requested {requested} bytes + {padding} padding, {remaining} remaining"
    )]
    CapacityExceeded {
        /// Requested size in bytes.
        requested: i32,
        /// Padding needed to reach the requested alignment.
        padding: i32,
        /// Bytes between the cursor and the end of the arena.
        remaining: i32,
    },
}
