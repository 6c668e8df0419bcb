// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use cloister_region::{AllocationError, RegionError};

use crate::error::BufferError;

#[test]
fn test_from_allocation_error() {
    let err: BufferError = AllocationError::InvalidLength { len: 0 }.into();

    assert!(matches!(
        err,
        BufferError::Allocation(AllocationError::InvalidLength { len: 0 })
    ));
    assert_eq!(
        err.to_string(),
        "AllocationError: invalid secret region length: 0"
    );
}

#[test]
fn test_from_region_error() {
    let err: BufferError = RegionError::SourceTooLong {
        src_len: 2,
        region_len: 1,
    }
    .into();

    assert!(matches!(err, BufferError::Region(_)));
}

#[test]
fn test_callback_error_wraps_debug_value() {
    let err = BufferError::callback_error("boom");

    assert_eq!(err.to_string(), "callback error: \"boom\"");
}
