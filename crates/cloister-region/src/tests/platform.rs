// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Contract between the allocator and a `Platform` implementation.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ffi::c_void;

use crate::platform::{MapProtection, MapSharing, Platform, RawDescriptor};
use crate::profile::PlatformProfile;
use crate::support::test_utils::{MockPlatform, MockPlatformBehaviour};
use crate::SecretRegionAllocator;

/// Forwards to a mock and records the addresses crossing `map`/`unmap`.
struct Recording<'a> {
    inner: &'a MockPlatform,
    mapped: RefCell<Vec<(usize, usize)>>,
    unmapped: RefCell<Vec<(usize, usize)>>,
}

impl<'a> Recording<'a> {
    fn new(inner: &'a MockPlatform) -> Self {
        Self {
            inner,
            mapped: RefCell::new(Vec::new()),
            unmapped: RefCell::new(Vec::new()),
        }
    }
}

// Safety: every call is forwarded to `MockPlatform`.
unsafe impl Platform for Recording<'_> {
    fn profile(&self) -> PlatformProfile {
        self.inner.profile()
    }

    fn syscall(&self, number: i64, arg: i64) -> i64 {
        self.inner.syscall(number, arg)
    }

    fn resize(&self, fd: RawDescriptor, len: i64) -> i32 {
        self.inner.resize(fd, len)
    }

    fn map(
        &self,
        hint: *mut c_void,
        len: usize,
        protection: MapProtection,
        sharing: MapSharing,
        fd: RawDescriptor,
        offset: i64,
    ) -> *mut c_void {
        let addr = self.inner.map(hint, len, protection, sharing, fd, offset);
        self.mapped.borrow_mut().push((addr as usize, len));
        addr
    }

    fn unmap(&self, addr: *mut c_void, len: usize) -> i32 {
        self.unmapped.borrow_mut().push((addr as usize, len));
        self.inner.unmap(addr, len)
    }

    fn close(&self, fd: RawDescriptor) -> i32 {
        self.inner.close(fd)
    }

    fn last_error(&self) -> i32 {
        self.inner.last_error()
    }

    fn describe_error(&self, code: i32) -> String {
        self.inner.describe_error(code)
    }
}

#[test]
fn test_region_is_the_mapping_returned_by_map() {
    let mock = MockPlatform::new(MockPlatformBehaviour::None);
    let platform = Recording::new(&mock);
    let allocator = SecretRegionAllocator::new(&platform);

    let region = allocator.create(24).expect("Failed to create(..)");

    assert_eq!(
        platform.mapped.borrow().as_slice(),
        &[(region.as_ptr() as usize, 24)]
    );

    allocator.release(region);
}

#[test]
fn test_unmap_only_sees_addresses_from_map() {
    let mock = MockPlatform::new(MockPlatformBehaviour::None);
    let platform = Recording::new(&mock);
    let allocator = SecretRegionAllocator::new(&platform);

    let first = allocator.create(8).expect("Failed to create(..)");
    let second = allocator.create(4096).expect("Failed to create(..)");
    allocator.release(second);
    allocator.release(first);

    let mapped = platform.mapped.borrow();
    let unmapped = platform.unmapped.borrow();

    assert_eq!(unmapped.len(), 2);
    assert!(unmapped.iter().all(|entry| mapped.contains(entry)));
    assert_eq!(mock.live_mappings(), 0);
}

#[test]
fn test_failed_map_is_never_unmapped() {
    let mock = MockPlatform::new(MockPlatformBehaviour::FailMap(12));
    let platform = Recording::new(&mock);
    let allocator = SecretRegionAllocator::new(&platform);

    let result = allocator.create(16);

    assert!(result.is_err());
    assert_eq!(platform.mapped.borrow().len(), 1);
    assert!(platform.unmapped.borrow().is_empty());
}

#[test]
fn test_reference_forwards_to_platform() {
    let mock = MockPlatform::new(MockPlatformBehaviour::None);
    let by_ref: &MockPlatform = &mock;

    assert_eq!(Platform::profile(&by_ref), PlatformProfile::LinuxX86_64);
    assert_eq!(by_ref.describe_error(12), mock.describe_error(12));
}
