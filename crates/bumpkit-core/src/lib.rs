//! Native memory primitives for managed hosts.
//!
//! Provides a fixed-capacity bump arena and a fixed-length `i32` array,
//! both owning a single zero-initialised heap buffer. This crate is one
//! of two that may contain `unsafe` code (along with `bumpkit-ffi`). All
//! unsafe memory access lives in `raw.rs`; the `*_unchecked` methods on
//! [`BumpArena`] and [`FixedArray`] are `unsafe fn` forwarders to it.
//!
//! # Architecture
//!
//! ```text
//! BumpArena            FixedArray
//! ├── capacity: i32    ├── length: i32
//! ├── offset:   i32    └── ZeroedBuf<i32>
//! └── ZeroedBuf<u8>
//!        │
//!        └── Option<Box<[T]>>  (None = never allocated or released)
//! ```
//!
//! # Release
//!
//! Both components implement [`Release`]: releasing drops the backing
//! buffer and leaves the component in the empty state, so releasing twice
//! is a no-op. How release is triggered (host finalizer, explicit destroy,
//! plain `Drop`) is decided by the caller, not by this crate.
//!
//! # Checked and unchecked access
//!
//! The checked accessors (`read_i32`, `get`, ...) return `Option` and never
//! touch memory outside the buffer. The `*_unchecked` accessors are `unsafe`
//! and perform no bounds checks; they exist for the C surface, which trusts
//! offsets and indices the host obtained from `alloc`/`length`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod bump;
pub mod config;
pub mod error;
mod raw;
pub mod release;

// Public re-exports for the primary API surface.
pub use array::FixedArray;
pub use bump::BumpArena;
pub use config::BufferConfig;
pub use error::{ArenaError, BufferError};
pub use release::{Release, ReleaseOnDrop};
