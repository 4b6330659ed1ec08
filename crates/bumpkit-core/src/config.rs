//! Buffer acquisition limits.
//!
//! The active [`BufferConfig`] is per thread. Components are single-owner
//! and never cross threads mid-operation, so a thread-local limit lets a
//! host (or a test) cap buffer sizes without affecting other threads.

use std::cell::Cell;

thread_local! {
    static MAX_BUFFER_BYTES: Cell<usize> = const { Cell::new(BufferConfig::DEFAULT_MAX_BUFFER_BYTES) };
}

/// Configuration for backing-buffer acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Largest single buffer, in bytes, that may be allocated.
    ///
    /// Default: `isize::MAX`, the largest size the global allocator accepts.
    pub max_buffer_bytes: usize,
}

impl BufferConfig {
    /// Default maximum buffer size in bytes.
    pub const DEFAULT_MAX_BUFFER_BYTES: usize = isize::MAX as usize;

    /// Config with the given byte limit.
    pub fn with_limit(max_buffer_bytes: usize) -> Self {
        Self { max_buffer_bytes }
    }

    /// The config active on the calling thread.
    pub fn current() -> Self {
        Self {
            max_buffer_bytes: MAX_BUFFER_BYTES.with(Cell::get),
        }
    }

    /// Make this config active on the calling thread until further notice.
    pub fn set(self) {
        MAX_BUFFER_BYTES.with(|c| c.set(self.max_buffer_bytes));
    }

    /// Make this config active on the calling thread until the guard drops.
    ///
    /// The previously active config is restored on drop.
    pub fn install(self) -> ConfigGuard {
        let previous = Self::current();
        self.set();
        ConfigGuard { previous }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_MAX_BUFFER_BYTES)
    }
}

/// Restores the previous thread config when dropped.
#[must_use = "the config is reverted as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ConfigGuard {
    previous: BufferConfig,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        self.previous.set();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_isize_max() {
        assert_eq!(BufferConfig::current(), BufferConfig::default());
        assert_eq!(
            BufferConfig::default().max_buffer_bytes,
            isize::MAX as usize
        );
    }

    #[test]
    fn install_restores_previous_on_drop() {
        {
            let _outer = BufferConfig::with_limit(128).install();
            assert_eq!(BufferConfig::current().max_buffer_bytes, 128);
            {
                let _inner = BufferConfig::with_limit(8).install();
                assert_eq!(BufferConfig::current().max_buffer_bytes, 8);
            }
            assert_eq!(BufferConfig::current().max_buffer_bytes, 128);
        }
        assert_eq!(BufferConfig::current(), BufferConfig::default());
    }

    #[test]
    fn limit_is_thread_local() {
        let _guard = BufferConfig::with_limit(1).install();
        let other = std::thread::spawn(BufferConfig::current).join().unwrap();
        assert_eq!(other, BufferConfig::default());
    }
}
