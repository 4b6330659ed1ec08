//! Buffer limit configuration over the C ABI.

use bumpkit_core::BufferConfig;
use tracing::debug;

/// Cap the size of buffers created on the calling thread.
///
/// Applies to every later create call made from this thread. Manual arrays
/// above the limit come back as the null handle; finalizer-backed arenas
/// and arrays above the limit abort. A negative `max_bytes` restores the
/// default (no practical limit).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bumpkit_set_buffer_limit(max_bytes: i64) {
    let config = match usize::try_from(max_bytes) {
        Ok(limit) => BufferConfig::with_limit(limit),
        Err(_) => BufferConfig::default(),
    };
    config.set();
    debug!(max_buffer_bytes = config.max_buffer_bytes, "buffer limit updated");
}
