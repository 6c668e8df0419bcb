// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecretRegionAllocator - memfd_secret + ftruncate + mmap, close guaranteed.
//!
//! Every step maps its C-style failure signal to a typed error right after
//! the call, reading the last error before anything else can overwrite it.
//! The descriptor lives in a [`DescriptorGuard`] from the moment the kernel
//! returns it, so it is closed exactly once on every exit path.

use core::ffi::c_void;
use core::ptr::{self, NonNull};

use zeroize::Zeroize;

use crate::config::{AllocatorConfig, ResizePolicy};
use crate::descriptor::DescriptorGuard;
use crate::error::AllocationError;
use crate::platform::{MapProtection, MapSharing, Platform, RawDescriptor};
use crate::region::SecretRegion;

/// Creates and releases [`SecretRegion`]s through an injected [`Platform`].
#[derive(Debug, Clone)]
pub struct SecretRegionAllocator<P: Platform> {
    platform: P,
    config: AllocatorConfig,
}

impl<P: Platform> SecretRegionAllocator<P> {
    /// Creates an allocator with the default [`AllocatorConfig`].
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, AllocatorConfig::default())
    }

    /// Creates an allocator with an explicit configuration.
    pub fn with_config(platform: P, config: AllocatorConfig) -> Self {
        Self { platform, config }
    }

    /// Returns the platform capability bundle.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Creates a secret region of exactly `len` bytes.
    ///
    /// Makes exactly one attempt. On error nothing needs cleaning up: the
    /// descriptor is already closed and no mapping survives.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidLength`] if `len` is zero or exceeds
    ///   `i64::MAX` (the platform is not called)
    /// - [`AllocationError::UnsupportedPlatform`] if the profile has no
    ///   secret memory mechanism (the platform is not called)
    /// - [`AllocationError::SyscallUnavailable`] if `memfd_secret` returned
    ///   `ENOSYS`
    /// - [`AllocationError::DescriptorFailed`] for any other `memfd_secret`
    ///   failure
    /// - [`AllocationError::ResizeFailed`] if `ftruncate` failed
    /// - [`AllocationError::MappingFailed`] if `mmap` returned the sentinel
    pub fn create(&self, len: usize) -> Result<SecretRegion, AllocationError> {
        let file_len = match i64::try_from(len) {
            Ok(file_len) if file_len > 0 => file_len,
            _ => return Err(AllocationError::InvalidLength { len }),
        };

        let profile = self.platform.profile();
        let Some(number) = profile.secret_memory_syscall() else {
            return Err(AllocationError::UnsupportedPlatform { profile });
        };

        let descriptor = self.open_descriptor(number)?;
        log::debug!("memfd_secret returned descriptor {}", descriptor.fd());

        let resize_error = match self.resize(&descriptor, file_len) {
            Ok(()) => None,
            Err(e) if self.config.resize_policy == ResizePolicy::AttemptMapping => {
                log::warn!("{e}; attempting mapping anyway");
                Some(e)
            }
            Err(e) => return Err(e),
        };

        let ptr = self.map(&descriptor, len)?;

        if let Some(e) = resize_error {
            self.unmap(ptr, len);
            return Err(e);
        }

        log::debug!("mapped {len}-byte secret region");

        // Safety: `ptr` passed the sentinel check and maps exactly `len` bytes.
        Ok(unsafe { SecretRegion::from_raw_parts(ptr, len) })
    }

    /// Releases a region: zeroizes it (unless disabled by
    /// [`AllocatorConfig::zeroize_on_release`]) and unmaps it.
    ///
    /// Consuming the region makes a second release impossible. An `munmap`
    /// failure is logged and otherwise ignored.
    ///
    /// `region` must come from an allocator over the same platform: the
    /// mapping is handed to this allocator's [`Platform::unmap`].
    pub fn release(&self, mut region: SecretRegion) {
        if self.config.zeroize_on_release {
            region.as_mut_slice().zeroize();
        }

        let (ptr, len) = region.into_raw_parts();
        self.unmap(ptr, len);

        log::debug!("released {len}-byte secret region");
    }

    fn open_descriptor(&self, number: i64) -> Result<DescriptorGuard<'_, P>, AllocationError> {
        let fd = self.platform.syscall(number, 0);

        if fd < 0 {
            let code = self.platform.last_error();
            let message = self.platform.describe_error(code);

            if code == self.platform.profile().enosys() {
                return Err(AllocationError::SyscallUnavailable { code, message });
            }

            return Err(AllocationError::DescriptorFailed { code, message });
        }

        Ok(DescriptorGuard::new(&self.platform, fd as RawDescriptor))
    }

    fn resize(&self, descriptor: &DescriptorGuard<'_, P>, len: i64) -> Result<(), AllocationError> {
        if self.platform.resize(descriptor.fd(), len) == -1 {
            let code = self.platform.last_error();
            let message = self.platform.describe_error(code);

            return Err(AllocationError::ResizeFailed { code, message });
        }

        Ok(())
    }

    fn map(
        &self,
        descriptor: &DescriptorGuard<'_, P>,
        len: usize,
    ) -> Result<NonNull<u8>, AllocationError> {
        let addr = self.platform.map(
            ptr::null_mut(),
            len,
            MapProtection::READ | MapProtection::WRITE,
            MapSharing::SHARED,
            descriptor.fd(),
            0,
        );

        // Never dereference before comparing against MAP_FAILED.
        let failed = addr as usize == self.platform.profile().map_failed_sentinel();

        match NonNull::new(addr.cast::<u8>()) {
            Some(ptr) if !failed => Ok(ptr),
            _ => {
                let code = self.platform.last_error();
                let message = self.platform.describe_error(code);

                Err(AllocationError::MappingFailed { code, message })
            }
        }
    }

    fn unmap(&self, ptr: NonNull<u8>, len: usize) {
        if self.platform.unmap(ptr.as_ptr().cast::<c_void>(), len) == -1 {
            let code = self.platform.last_error();
            log::warn!(
                "munmap of {len}-byte secret region failed (errno={code}): {}",
                self.platform.describe_error(code)
            );
        }
    }
}
