//! Fixed array C surface under both ownership models.

#![allow(unsafe_code)]

use bumpkit_ffi::array::*;
use bumpkit_ffi::config::bumpkit_set_buffer_limit;
use bumpkit_ffi::manual::*;
use bumpkit_test_utils::RecordingHost;

#[test]
fn finalized_array_starts_zeroed_and_round_trips() {
    let host = RecordingHost::install();
    let arr = bumpkit_array_create(5);
    unsafe {
        assert_eq!(bumpkit_array_length(arr), 5);
        for i in 0..5 {
            assert_eq!(bumpkit_array_get(arr, i), 0);
        }
        for i in 0..5 {
            bumpkit_array_set(arr, i, i * 10 - 20);
        }
        for i in 0..5 {
            assert_eq!(bumpkit_array_get(arr, i), i * 10 - 20);
        }
    }
    assert!(host.collect(arr));
}

#[test]
fn finalized_array_zero_length() {
    let host = RecordingHost::install();
    let arr = bumpkit_array_create(0);
    unsafe { assert_eq!(bumpkit_array_length(arr), 0) };
    assert!(host.collect(arr));
}

#[test]
fn finalized_array_destroy_is_idempotent() {
    let host = RecordingHost::install();
    let finalized_before = host.finalized();
    let arr = bumpkit_array_create(3);
    let keep = bumpkit_array_create(3);
    unsafe {
        bumpkit_array_set(keep, 2, 42);
        bumpkit_array_destroy(arr);
        bumpkit_array_destroy(arr);
        // Length survives destroy; it describes the array as created.
        assert_eq!(bumpkit_array_length(arr), 3);
        assert_eq!(bumpkit_array_get(keep, 2), 42);
    }
    assert!(host.collect(arr));
    assert!(host.collect(keep));
    assert_eq!(host.finalized() - finalized_before, 2);
}

#[test]
fn manual_array_full_lifecycle() {
    let h = bumpkit_manual_array_create(5);
    assert!(!bumpkit_manual_array_is_null(h));
    assert_eq!(bumpkit_manual_array_length(h), 5);
    unsafe {
        bumpkit_manual_array_set(h, 4, i32::MAX);
        assert_eq!(bumpkit_manual_array_get(h, 4), i32::MAX);
        assert_eq!(bumpkit_manual_array_get(h, 0), 0);
    }
    bumpkit_manual_array_destroy(h);
    bumpkit_manual_array_destroy(h);
    assert_eq!(bumpkit_manual_array_length(h), 0);
}

#[test]
fn manual_array_simulated_oom_is_null() {
    bumpkit_set_buffer_limit(16);
    let too_big = bumpkit_manual_array_create(5);
    let fits = bumpkit_manual_array_create(4);
    bumpkit_set_buffer_limit(-1);

    assert!(bumpkit_manual_array_is_null(too_big));
    assert!(!bumpkit_manual_array_is_null(fits));
    assert_eq!(bumpkit_manual_array_length(fits), 4);
    bumpkit_manual_array_destroy(fits);
}
