// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::alloc::{Layout, alloc_zeroed, dealloc};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::ffi::c_void;

use crate::platform::{MapProtection, MapSharing, Platform, RawDescriptor};
use crate::profile::PlatformProfile;

const EPERM: i32 = 1;
const EBADF: i32 = 9;
const ENOMEM: i32 = 12;
const EINVAL: i32 = 22;

/// Alignment of fake mappings.
const FAKE_PAGE_ALIGN: usize = 4096;

/// First descriptor handed out (0-2 are stdio).
const FIRST_DESCRIPTOR: RawDescriptor = 3;

/// Configurable behavior for [`MockPlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPlatformBehaviour {
    /// Every primitive succeeds.
    None,
    /// `syscall` fails with the profile's `ENOSYS`.
    SyscallUnavailable,
    /// `syscall` fails with the given errno.
    FailDescriptor(i32),
    /// `resize` fails with the given errno.
    FailResize(i32),
    /// `map` returns the failure sentinel with the given errno.
    FailMap(i32),
    /// Both `resize` and `map` fail.
    FailResizeAndMap {
        /// Errno set by `resize`.
        resize: i32,
        /// Errno set by `map`.
        map: i32,
    },
    /// `close` fails with the given errno (the descriptor is still released).
    FailClose(i32),
    /// `unmap` fails with the given errno (the fake mapping is kept).
    FailUnmap(i32),
    /// `map` panics, simulating an unexpected fault mid-sequence.
    PanicOnMap,
}

/// Mock platform for testing.
///
/// Hands out fake descriptors and heap-backed fake mappings, fails on demand
/// via [`MockPlatformBehaviour`], and counts every call so tests can check
/// that descriptors and mappings are balanced.
#[derive(Debug)]
pub struct MockPlatform {
    profile: PlatformProfile,
    behaviour: MockPlatformBehaviour,
    errno: Cell<i32>,
    next_fd: Cell<RawDescriptor>,
    open_fds: RefCell<Vec<RawDescriptor>>,
    mappings: RefCell<Vec<(usize, usize)>>,
    syscall_count: Cell<usize>,
    resize_count: Cell<usize>,
    map_count: Cell<usize>,
    unmap_count: Cell<usize>,
    close_count: Cell<usize>,
    last_syscall_number: Cell<Option<i64>>,
    last_resize_len: Cell<Option<i64>>,
    last_map_request: Cell<Option<(MapProtection, MapSharing)>>,
    last_unmapped_zeroized: Cell<Option<bool>>,
}

impl MockPlatform {
    /// Creates a mock with the `LinuxX86_64` profile.
    pub fn new(behaviour: MockPlatformBehaviour) -> Self {
        Self::with_profile(PlatformProfile::LinuxX86_64, behaviour)
    }

    /// Creates a mock reporting the given profile.
    pub fn with_profile(profile: PlatformProfile, behaviour: MockPlatformBehaviour) -> Self {
        Self {
            profile,
            behaviour,
            errno: Cell::new(0),
            next_fd: Cell::new(FIRST_DESCRIPTOR),
            open_fds: RefCell::new(Vec::new()),
            mappings: RefCell::new(Vec::new()),
            syscall_count: Cell::new(0),
            resize_count: Cell::new(0),
            map_count: Cell::new(0),
            unmap_count: Cell::new(0),
            close_count: Cell::new(0),
            last_syscall_number: Cell::new(None),
            last_resize_len: Cell::new(None),
            last_map_request: Cell::new(None),
            last_unmapped_zeroized: Cell::new(None),
        }
    }

    /// Changes the mock behavior at runtime.
    pub fn change_behaviour(&mut self, behaviour: MockPlatformBehaviour) {
        self.behaviour = behaviour;
    }

    /// Number of `syscall` calls.
    pub fn syscall_count(&self) -> usize {
        self.syscall_count.get()
    }

    /// Number of `resize` calls.
    pub fn resize_count(&self) -> usize {
        self.resize_count.get()
    }

    /// Number of `map` calls.
    pub fn map_count(&self) -> usize {
        self.map_count.get()
    }

    /// Number of `unmap` calls.
    pub fn unmap_count(&self) -> usize {
        self.unmap_count.get()
    }

    /// Number of `close` calls.
    pub fn close_count(&self) -> usize {
        self.close_count.get()
    }

    /// Total number of descriptors handed out.
    pub fn opened_count(&self) -> usize {
        (self.next_fd.get() - FIRST_DESCRIPTOR) as usize
    }

    /// Number of calls into any primitive.
    pub fn total_calls(&self) -> usize {
        self.syscall_count() + self.resize_count() + self.map_count() + self.unmap_count()
            + self.close_count()
    }

    /// Descriptors handed out and not yet closed.
    pub fn open_descriptors(&self) -> usize {
        self.open_fds.borrow().len()
    }

    /// Fake mappings not yet unmapped.
    pub fn live_mappings(&self) -> usize {
        self.mappings.borrow().len()
    }

    /// Syscall number of the last `syscall` call.
    pub fn last_syscall_number(&self) -> Option<i64> {
        self.last_syscall_number.get()
    }

    /// Length passed to the last `resize` call.
    pub fn last_resize_len(&self) -> Option<i64> {
        self.last_resize_len.get()
    }

    /// Protection and sharing passed to the last `map` call.
    pub fn last_map_request(&self) -> Option<(MapProtection, MapSharing)> {
        self.last_map_request.get()
    }

    /// Whether the last successfully unmapped fake mapping was all zeros.
    pub fn last_unmapped_zeroized(&self) -> Option<bool> {
        self.last_unmapped_zeroized.get()
    }

    fn fail<T>(&self, errno: i32, value: T) -> T {
        self.errno.set(errno);
        value
    }

    fn sentinel(&self) -> *mut c_void {
        self.profile.map_failed_sentinel() as *mut c_void
    }

    fn is_open(&self, fd: RawDescriptor) -> bool {
        self.open_fds.borrow().contains(&fd)
    }
}

// Safety: `map` returns either the sentinel or a fresh zeroed heap block of
// `len` bytes, kept alive until `unmap` (or the mock's Drop) frees it.
unsafe impl Platform for MockPlatform {
    fn profile(&self) -> PlatformProfile {
        self.profile
    }

    fn syscall(&self, number: i64, _arg: i64) -> i64 {
        self.syscall_count.set(self.syscall_count.get() + 1);
        self.last_syscall_number.set(Some(number));

        match self.behaviour {
            MockPlatformBehaviour::SyscallUnavailable => self.fail(self.profile.enosys(), -1),
            MockPlatformBehaviour::FailDescriptor(errno) => self.fail(errno, -1),
            _ => {
                let fd = self.next_fd.get();
                self.next_fd.set(fd + 1);
                self.open_fds.borrow_mut().push(fd);

                i64::from(fd)
            }
        }
    }

    fn resize(&self, fd: RawDescriptor, len: i64) -> i32 {
        self.resize_count.set(self.resize_count.get() + 1);
        self.last_resize_len.set(Some(len));

        if !self.is_open(fd) {
            return self.fail(EBADF, -1);
        }

        match self.behaviour {
            MockPlatformBehaviour::FailResize(errno) => self.fail(errno, -1),
            MockPlatformBehaviour::FailResizeAndMap { resize, .. } => self.fail(resize, -1),
            _ => 0,
        }
    }

    fn map(
        &self,
        _hint: *mut c_void,
        len: usize,
        protection: MapProtection,
        sharing: MapSharing,
        fd: RawDescriptor,
        _offset: i64,
    ) -> *mut c_void {
        self.map_count.set(self.map_count.get() + 1);
        self.last_map_request.set(Some((protection, sharing)));

        match self.behaviour {
            MockPlatformBehaviour::PanicOnMap => panic!("mock map fault"),
            MockPlatformBehaviour::FailMap(errno) => return self.fail(errno, self.sentinel()),
            MockPlatformBehaviour::FailResizeAndMap { map, .. } => {
                return self.fail(map, self.sentinel());
            }
            _ => {}
        }

        if !self.is_open(fd) {
            return self.fail(EBADF, self.sentinel());
        }

        let Ok(layout) = Layout::from_size_align(len, FAKE_PAGE_ALIGN) else {
            return self.fail(EINVAL, self.sentinel());
        };
        if len == 0 {
            return self.fail(EINVAL, self.sentinel());
        }

        // Safety: layout has non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return self.fail(ENOMEM, self.sentinel());
        }

        self.mappings.borrow_mut().push((ptr as usize, len));

        ptr.cast::<c_void>()
    }

    fn unmap(&self, addr: *mut c_void, len: usize) -> i32 {
        self.unmap_count.set(self.unmap_count.get() + 1);

        if let MockPlatformBehaviour::FailUnmap(errno) = self.behaviour {
            return self.fail(errno, -1);
        }

        let mut mappings = self.mappings.borrow_mut();
        let Some(index) = mappings.iter().position(|&m| m == (addr as usize, len)) else {
            return self.fail(EINVAL, -1);
        };
        mappings.swap_remove(index);

        let ptr = addr.cast::<u8>();
        // Safety: (ptr, len) was produced by `map` and has not been freed.
        let zeroized = unsafe { core::slice::from_raw_parts(ptr, len) }
            .iter()
            .all(|&b| b == 0);
        self.last_unmapped_zeroized.set(Some(zeroized));

        // Safety: same layout as the allocation in `map`.
        unsafe { dealloc(ptr, Layout::from_size_align_unchecked(len, FAKE_PAGE_ALIGN)) };

        0
    }

    fn close(&self, fd: RawDescriptor) -> i32 {
        self.close_count.set(self.close_count.get() + 1);

        let mut open_fds = self.open_fds.borrow_mut();
        let Some(index) = open_fds.iter().position(|&open| open == fd) else {
            return self.fail(EBADF, -1);
        };
        open_fds.swap_remove(index);

        match self.behaviour {
            MockPlatformBehaviour::FailClose(errno) => self.fail(errno, -1),
            _ => 0,
        }
    }

    fn last_error(&self) -> i32 {
        self.errno.get()
    }

    fn describe_error(&self, code: i32) -> String {
        let message = match code {
            EPERM => "Operation not permitted",
            EBADF => "Bad file descriptor",
            ENOMEM => "Cannot allocate memory",
            EINVAL => "Invalid argument",
            c if c == self.profile.enosys() => "Function not implemented",
            _ => return format!("Unknown error {code}"),
        };

        String::from(message)
    }
}

impl Drop for MockPlatform {
    fn drop(&mut self) {
        for (addr, len) in self.mappings.get_mut().drain(..) {
            // Safety: leaked fake mappings still own their allocation.
            unsafe {
                dealloc(
                    addr as *mut u8,
                    Layout::from_size_align_unchecked(len, FAKE_PAGE_ALIGN),
                )
            };
        }
    }
}
