// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecretRegion - A live secret memory mapping.

use core::ptr::NonNull;

use crate::error::RegionError;

/// A live, fixed-length secret memory mapping.
///
/// Produced only by [`SecretRegionAllocator::create`](crate::SecretRegionAllocator::create)
/// after the mapping address was checked against the failure sentinel, so
/// `[as_ptr(), as_ptr() + len())` is always readable and writable.
///
/// The region is not released on drop. Hand it back to
/// [`SecretRegionAllocator::release`](crate::SecretRegionAllocator::release),
/// which consumes it; dropping it instead leaks the mapping.
#[must_use = "a SecretRegion must be passed to SecretRegionAllocator::release"]
pub struct SecretRegion {
    ptr: NonNull<u8>,
    len: usize,
}

// Safety: SecretRegion is the only handle to its mapping.
unsafe impl Send for SecretRegion {}
unsafe impl Sync for SecretRegion {}

impl SecretRegion {
    /// # Safety
    ///
    /// `ptr` must point to a live read/write mapping of exactly `len` bytes
    /// that nothing else references.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Returns the length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: [`create`](crate::SecretRegionAllocator::create)
    /// rejects zero lengths.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the base address of the mapping.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Returns the region contents.
    pub fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the region contents mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Copies `src` into the start of the region.
    ///
    /// Bytes past `src.len()` are left untouched.
    pub fn copy_from(&mut self, src: &[u8]) -> Result<(), RegionError> {
        if src.len() > self.len {
            return Err(RegionError::SourceTooLong {
                src_len: src.len(),
                region_len: self.len,
            });
        }

        self.as_mut_slice()[..src.len()].copy_from_slice(src);

        Ok(())
    }

    pub(crate) fn into_raw_parts(self) -> (NonNull<u8>, usize) {
        (self.ptr, self.len)
    }
}

impl core::fmt::Debug for SecretRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecretRegion")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
