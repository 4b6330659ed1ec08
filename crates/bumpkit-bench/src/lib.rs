//! Benchmark profiles for the bumpkit arena.
//!
//! - [`record_layout`]: the (size, align) requests of one mixed record
//! - [`fill_arena`]: allocate records until the arena is full

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bumpkit_core::BumpArena;

/// Allocation requests for one record: a tag byte, two `i32`s, an `f64`,
/// and a 12-byte payload aligned to 3.
///
/// Mixes power-of-two and odd alignments so the padding path is exercised.
pub fn record_layout() -> [(i32, i32); 5] {
    [(1, 1), (4, 4), (4, 4), (8, 8), (12, 3)]
}

/// Allocate whole records until one no longer fits. Returns the number of
/// records placed.
pub fn fill_arena(arena: &mut BumpArena) -> usize {
    let layout = record_layout();
    let mut records = 0;
    loop {
        for &(size, align) in &layout {
            if arena.alloc(size, align).is_err() {
                return records;
            }
        }
        records += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_stops_at_capacity() {
        let mut arena = BumpArena::new(4096);
        let records = fill_arena(&mut arena);
        assert!(records > 0);
        assert!(arena.used() <= 4096);
        // One record is at most 1 + 3 + 4 + 4 + 4 + 8 + 12 + 2 bytes.
        assert!(arena.remaining() < 40);
    }
}
