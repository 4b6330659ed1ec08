//! C ABI for the bumpkit arena and fixed array.
//!
//! Exposes a C-compatible API for managed-language hosts. This crate is
//! one of two that may contain `unsafe` code (along with `bumpkit-core`).
//!
//! Two ownership models share the same core types:
//!
//! - **Host-finalized** ([`arena`], [`array`]): handles are pointers into
//!   storage allocated by the host's registered allocator (see
//!   [`host::bumpkit_register_host`]). The host runs the finalizer when the
//!   handle becomes unreachable; an explicit destroy may run first.
//! - **Manual** ([`manual`]): `u64` handles into a generation-checked table.
//!   The owner destroys explicitly; creation failure returns the null
//!   handle instead of aborting.
//!
//! Either way the buffer is released at most once: release is idempotent.
//!
//! No entry point is thread-safe with respect to a single handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod array;
pub mod config;
mod handle;
pub mod host;
pub mod manual;
pub mod status;
