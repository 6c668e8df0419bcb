// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # cloister_region
//!
//! Secret memory regions backed by Linux `memfd_secret(2)`.
//!
//! A secret region is an anonymous mapping whose pages are removed from the
//! kernel's direct map once the owning process maps them. This crate performs
//! the whole acquisition sequence in one call and guarantees the kernel
//! descriptor is closed exactly once, whatever the outcome.
//!
//! ## Creation sequence
//!
//! 1. `memfd_secret(0)` through the raw syscall invoker
//! 2. `ftruncate(fd, len)` to size the descriptor
//! 3. `mmap(NULL, len, PROT_READ | PROT_WRITE, MAP_SHARED, fd, 0)`
//! 4. `close(fd)`, on every exit path, including unwinding
//!
//! The mapping result is compared against the platform's failure sentinel
//! before it is ever turned into a pointer. Nothing falls back to ordinary
//! memory: every failure is returned as an [`AllocationError`].
//!
//! ## Platform capabilities
//!
//! All OS access goes through the [`Platform`] trait. [`LibcPlatform`] is the
//! real implementation; with the `test-utils` feature a configurable
//! `MockPlatform` is exported under [`test_utils`].
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[cfg(unix)]
//! # fn example() -> Result<(), cloister_region::AllocationError> {
//! use cloister_region::{LibcPlatform, SecretRegionAllocator};
//!
//! let allocator = SecretRegionAllocator::new(LibcPlatform::new());
//! let mut region = allocator.create(32)?;
//!
//! region.as_mut_slice()[0] = 42;
//! assert_eq!(region.as_slice()[0], 42);
//!
//! // Zeroized and unmapped.
//! allocator.release(region);
//! # Ok(())
//! # }
//! ```
//!
//! Kernels have to be booted with `secretmem.enable=1` for `memfd_secret` to
//! exist; otherwise `create` returns [`AllocationError::SyscallUnavailable`].

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod allocator;
mod config;
mod descriptor;
mod error;
mod platform;
mod profile;
mod region;
mod support;

#[cfg(unix)]
mod libc_platform;

pub use allocator::SecretRegionAllocator;
pub use config::{AllocatorConfig, ResizePolicy};
pub use error::{AllocationError, AllocationErrorKind, RegionError};
pub use platform::{MapProtection, MapSharing, Platform, RawDescriptor};
pub use profile::PlatformProfile;
pub use region::SecretRegion;

#[cfg(unix)]
pub use libc_platform::LibcPlatform;

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
