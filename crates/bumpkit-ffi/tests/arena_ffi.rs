//! Arena C surface driven the way a managed host drives it: create through
//! the registered host allocator, use, destroy explicitly and/or collect.

#![allow(unsafe_code)]

use bumpkit_ffi::arena::*;
use bumpkit_ffi::status::BUMPKIT_ALLOC_FAILED;
use bumpkit_test_utils::RecordingHost;
use proptest::prelude::*;

#[test]
fn fresh_arena_reports_capacity_and_zero_contents() {
    let host = RecordingHost::install();
    let a = bumpkit_arena_create(16);
    unsafe {
        assert_eq!(bumpkit_arena_capacity(a), 16);
        assert_eq!(bumpkit_arena_used(a), 0);
        for off in 0..16 {
            assert_eq!(bumpkit_arena_read_byte(a, off), 0);
        }
    }
    host.collect(a);
}

#[test]
fn alloc_rejects_bad_requests_with_sentinel() {
    let host = RecordingHost::install();
    let a = bumpkit_arena_create(10);
    unsafe {
        assert_eq!(bumpkit_arena_alloc(a, 0, 1), BUMPKIT_ALLOC_FAILED);
        assert_eq!(bumpkit_arena_alloc(a, 1, 0), BUMPKIT_ALLOC_FAILED);
        assert_eq!(bumpkit_arena_alloc(a, -3, 4), BUMPKIT_ALLOC_FAILED);
        assert_eq!(bumpkit_arena_alloc(a, 8, 1), 0);
        assert_eq!(bumpkit_arena_used(a), 8);
        assert_eq!(bumpkit_arena_alloc(a, 4, 1), BUMPKIT_ALLOC_FAILED);
        assert_eq!(bumpkit_arena_alloc(a, 2, 1), 8);
        assert_eq!(bumpkit_arena_used(a), 10);
    }
    host.collect(a);
}

#[test]
fn reset_allows_full_reuse() {
    let host = RecordingHost::install();
    let a = bumpkit_arena_create(12);
    unsafe {
        let first = bumpkit_arena_alloc(a, 12, 4);
        assert_eq!(first, 0);
        assert_eq!(bumpkit_arena_alloc(a, 1, 1), BUMPKIT_ALLOC_FAILED);
        bumpkit_arena_reset(a);
        assert_eq!(bumpkit_arena_used(a), 0);
        assert_eq!(bumpkit_arena_alloc(a, 12, 4), first);
    }
    host.collect(a);
}

#[test]
fn typed_accessors_round_trip() {
    let host = RecordingHost::install();
    let a = bumpkit_arena_create(64);
    unsafe {
        let i = bumpkit_arena_alloc(a, 4, 4);
        let d = bumpkit_arena_alloc(a, 8, 8);
        let b = bumpkit_arena_alloc(a, 2, 1);
        assert!(i >= 0 && d >= 0 && b >= 0);

        for v in [0, 123_456, -98_765, i32::MIN, i32::MAX] {
            bumpkit_arena_write_i32(a, i, v);
            assert_eq!(bumpkit_arena_read_i32(a, i), v);
        }
        for v in [0.0, -1.5, 0.125, 1_234.567_8] {
            bumpkit_arena_write_f64(a, d, v);
            assert_eq!(bumpkit_arena_read_f64(a, d), v);
        }
        bumpkit_arena_write_byte(a, b, 0);
        bumpkit_arena_write_byte(a, b + 1, 255);
        assert_eq!(bumpkit_arena_read_byte(a, b), 0);
        assert_eq!(bumpkit_arena_read_byte(a, b + 1), 255);
    }
    host.collect(a);
}

#[test]
fn zero_capacity_arena_never_allocates() {
    let host = RecordingHost::install();
    for cap in [0, -16] {
        let a = bumpkit_arena_create(cap);
        unsafe {
            assert_eq!(bumpkit_arena_capacity(a), cap);
            assert_eq!(bumpkit_arena_alloc(a, 1, 1), BUMPKIT_ALLOC_FAILED);
            assert_eq!(bumpkit_arena_used(a), 0);
        }
        host.collect(a);
    }
}

#[test]
fn destroy_twice_then_finalize_leaves_neighbour_intact() {
    let host = RecordingHost::install();
    let finalized_before = host.finalized();
    let victim = bumpkit_arena_create(32);
    let neighbour = bumpkit_arena_create(32);
    unsafe {
        let off = bumpkit_arena_alloc(neighbour, 4, 4);
        bumpkit_arena_write_i32(neighbour, off, 0x5a5a_5a5a);

        bumpkit_arena_destroy(victim);
        bumpkit_arena_destroy(victim);
        assert!(host.collect(victim));

        assert_eq!(bumpkit_arena_read_i32(neighbour, off), 0x5a5a_5a5a);
        assert_eq!(bumpkit_arena_capacity(neighbour), 32);
    }
    assert!(host.collect(neighbour));
    assert_eq!(host.finalized() - finalized_before, 2);
}

#[test]
fn finalizer_alone_releases_arena() {
    let host = RecordingHost::install();
    let live_before = host.live_objects();
    let _a = bumpkit_arena_create(1024);
    let _b = bumpkit_arena_create(0);
    assert_eq!(host.live_objects(), live_before + 2);
    assert_eq!(host.collect_all(), live_before + 2);
    assert_eq!(host.live_objects(), 0);
}

#[test]
fn null_handle_is_inert() {
    let null = std::ptr::null_mut();
    unsafe {
        assert_eq!(bumpkit_arena_alloc(null, 4, 4), BUMPKIT_ALLOC_FAILED);
        assert_eq!(bumpkit_arena_capacity(null), 0);
        assert_eq!(bumpkit_arena_used(null), 0);
        bumpkit_arena_reset(null);
        bumpkit_arena_destroy(null);
    }
}

proptest! {
    #[test]
    fn allocations_are_disjoint_and_aligned(
        capacity in 1i32..256,
        requests in proptest::collection::vec((1i32..32, 1i32..12), 1..24),
    ) {
        let host = RecordingHost::install();
        let a = bumpkit_arena_create(capacity);
        let mut regions: Vec<(i32, i32)> = Vec::new();
        for (size, align) in requests {
            let start = unsafe { bumpkit_arena_alloc(a, size, align) };
            if start == BUMPKIT_ALLOC_FAILED {
                continue;
            }
            prop_assert_eq!(start % align, 0);
            prop_assert!(start + size <= capacity);
            prop_assert!(regions.iter().all(|&(s, n)| start >= s + n || start + size <= s));
            regions.push((start, size));
        }
        host.collect(a);
    }
}
