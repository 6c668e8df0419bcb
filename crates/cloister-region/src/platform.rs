// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::string::String;
use core::ffi::c_void;

use bitflags::bitflags;

use crate::profile::PlatformProfile;

/// Kernel resource handle (a file descriptor on Unix).
pub type RawDescriptor = i32;

bitflags! {
    /// Page protection requested from [`Platform::map`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapProtection: i32 {
        /// `PROT_READ`
        const READ = 1;
        /// `PROT_WRITE`
        const WRITE = 2;
    }
}

bitflags! {
    /// Sharing mode requested from [`Platform::map`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapSharing: i32 {
        /// `MAP_SHARED`
        const SHARED = 1;
        /// `MAP_PRIVATE`
        const PRIVATE = 2;
    }
}

/// Capability bundle of OS primitives used to build a secret region.
///
/// Each method mirrors the C calling convention of the primitive it wraps:
/// failures are signalled through the return value and the cause is read
/// with [`Platform::last_error`] immediately afterwards.
///
/// # Safety
///
/// [`SecretRegionAllocator`](crate::SecretRegionAllocator) hands the address
/// returned by [`Platform::map`] to safe code as a byte slice. Implementors
/// must guarantee that:
///
/// - a `map` result that is neither null nor equal to
///   [`PlatformProfile::map_failed_sentinel`] is a live read/write mapping of
///   exactly `len` bytes that nothing else references;
/// - that mapping stays valid until it is passed to [`Platform::unmap`];
/// - `unmap` accepts any address and length previously returned by a
///   successful `map` on the same platform.
///
/// An implementation that returns any other address from `map` is unsound,
/// which is why a plain `impl` is rejected:
///
/// ```compile_fail,E0200
/// use core::ffi::c_void;
///
/// use cloister_region::{MapProtection, MapSharing, Platform, PlatformProfile, RawDescriptor};
///
/// struct Unchecked;
///
/// impl Platform for Unchecked {
///     fn profile(&self) -> PlatformProfile {
///         PlatformProfile::LinuxX86_64
///     }
///     fn syscall(&self, _number: i64, _arg: i64) -> i64 {
///         3
///     }
///     fn resize(&self, _fd: RawDescriptor, _len: i64) -> i32 {
///         0
///     }
///     fn map(
///         &self,
///         _hint: *mut c_void,
///         _len: usize,
///         _protection: MapProtection,
///         _sharing: MapSharing,
///         _fd: RawDescriptor,
///         _offset: i64,
///     ) -> *mut c_void {
///         0x10 as *mut c_void
///     }
///     fn unmap(&self, _addr: *mut c_void, _len: usize) -> i32 {
///         0
///     }
///     fn close(&self, _fd: RawDescriptor) -> i32 {
///         0
///     }
///     fn last_error(&self) -> i32 {
///         0
///     }
///     fn describe_error(&self, _code: i32) -> String {
///         String::new()
///     }
/// }
/// ```
pub unsafe trait Platform {
    /// Profile of the target this platform talks to.
    fn profile(&self) -> PlatformProfile;

    /// Issues raw syscall `number` with one integer argument.
    ///
    /// Returns `-1` on failure.
    fn syscall(&self, number: i64, arg: i64) -> i64;

    /// Truncates or extends the resource behind `fd` to `len` bytes.
    ///
    /// Returns `-1` on failure.
    fn resize(&self, fd: RawDescriptor, len: i64) -> i32;

    /// Maps `len` bytes of `fd` at `offset`.
    ///
    /// Returns the address of the mapping, or an address equal to
    /// [`PlatformProfile::map_failed_sentinel`] on failure.
    fn map(
        &self,
        hint: *mut c_void,
        len: usize,
        protection: MapProtection,
        sharing: MapSharing,
        fd: RawDescriptor,
        offset: i64,
    ) -> *mut c_void;

    /// Unmaps `[addr, addr + len)`.
    ///
    /// Returns `-1` on failure.
    fn unmap(&self, addr: *mut c_void, len: usize) -> i32;

    /// Closes `fd`.
    ///
    /// Returns `-1` on failure.
    fn close(&self, fd: RawDescriptor) -> i32;

    /// Reads the calling thread's last error code.
    fn last_error(&self) -> i32;

    /// Translates an error code into a human-readable message.
    fn describe_error(&self, code: i32) -> String;
}

// Safety: forwards every call to `P`, which upholds the contract.
unsafe impl<P: Platform + ?Sized> Platform for &P {
    fn profile(&self) -> PlatformProfile {
        (**self).profile()
    }

    fn syscall(&self, number: i64, arg: i64) -> i64 {
        (**self).syscall(number, arg)
    }

    fn resize(&self, fd: RawDescriptor, len: i64) -> i32 {
        (**self).resize(fd, len)
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
        (**self).map(hint, len, protection, sharing, fd, offset)
    }

    fn unmap(&self, addr: *mut c_void, len: usize) -> i32 {
        (**self).unmap(addr, len)
    }

    fn close(&self, fd: RawDescriptor) -> i32 {
        (**self).close(fd)
    }

    fn last_error(&self) -> i32 {
        (**self).last_error()
    }

    fn describe_error(&self, code: i32) -> String {
        (**self).describe_error(code)
    }
}
