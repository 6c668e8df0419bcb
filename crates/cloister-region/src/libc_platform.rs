// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! LibcPlatform - the real capability bundle, straight onto libc.

use alloc::format;
use alloc::string::String;
use core::ffi::{CStr, c_void};

use crate::platform::{MapProtection, MapSharing, Platform, RawDescriptor};
use crate::profile::PlatformProfile;

/// Platform backed by libc on the running host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibcPlatform {
    profile: PlatformProfile,
}

impl LibcPlatform {
    /// Creates a platform for the compilation target.
    pub fn new() -> Self {
        Self {
            profile: PlatformProfile::detect(),
        }
    }
}

impl Default for LibcPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn protection_bits(protection: MapProtection) -> libc::c_int {
    let mut bits = libc::PROT_NONE;

    if protection.contains(MapProtection::READ) {
        bits |= libc::PROT_READ;
    }
    if protection.contains(MapProtection::WRITE) {
        bits |= libc::PROT_WRITE;
    }

    bits
}

fn sharing_bits(sharing: MapSharing) -> libc::c_int {
    let mut bits = 0;

    if sharing.contains(MapSharing::SHARED) {
        bits |= libc::MAP_SHARED;
    }
    if sharing.contains(MapSharing::PRIVATE) {
        bits |= libc::MAP_PRIVATE;
    }

    bits
}

// Safety: `map` is `mmap(2)`, which returns `MAP_FAILED` or a mapping of
// `len` bytes; `unmap` is `munmap(2)`.
unsafe impl Platform for LibcPlatform {
    fn profile(&self) -> PlatformProfile {
        self.profile
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn syscall(&self, number: i64, arg: i64) -> i64 {
        unsafe { libc::syscall(number as libc::c_long, arg as libc::c_long) as i64 }
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    #[allow(deprecated)]
    fn syscall(&self, number: i64, arg: i64) -> i64 {
        unsafe { libc::syscall(number as libc::c_int, arg as libc::c_int) as i64 }
    }

    fn resize(&self, fd: RawDescriptor, len: i64) -> i32 {
        unsafe { libc::ftruncate(fd, len as libc::off_t) }
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
        unsafe {
            libc::mmap(
                hint,
                len,
                protection_bits(protection),
                sharing_bits(sharing),
                fd,
                offset as libc::off_t,
            )
        }
    }

    fn unmap(&self, addr: *mut c_void, len: usize) -> i32 {
        unsafe { libc::munmap(addr, len) }
    }

    fn close(&self, fd: RawDescriptor) -> i32 {
        unsafe { libc::close(fd) }
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn last_error(&self) -> i32 {
        unsafe { *libc::__errno_location() }
    }

    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
    fn last_error(&self) -> i32 {
        unsafe { *libc::__error() }
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd"
    )))]
    fn last_error(&self) -> i32 {
        // No portable errno accessor; the profile never issues the syscall here.
        0
    }

    fn describe_error(&self, code: i32) -> String {
        let mut buf = [0 as libc::c_char; 256];

        let rc = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
        if rc != 0 {
            return format!("Unknown error {code}");
        }

        let message = unsafe { CStr::from_ptr(buf.as_ptr()) };
        String::from_utf8_lossy(message.to_bytes()).into_owned()
    }
}
