// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecretBuffer - Self-releasing buffer over a SecretRegion.
//!
//! Owns its allocator so the region can be zeroized and unmapped on drop.

use cloister_region::{Platform, SecretRegion, SecretRegionAllocator};

use crate::error::BufferError;
use crate::traits::Buffer;

/// A buffer backed by a secret memory region, released on drop.
pub struct SecretBuffer<P: Platform> {
    allocator: SecretRegionAllocator<P>,
    region: Option<SecretRegion>,
    len: usize,
}

impl<P: Platform> SecretBuffer<P> {
    /// Creates a zero-filled buffer of `len` bytes.
    pub fn new(allocator: SecretRegionAllocator<P>, len: usize) -> Result<Self, BufferError> {
        let region = allocator.create(len)?;

        Ok(Self {
            allocator,
            region: Some(region),
            len,
        })
    }

    /// Creates a buffer holding a copy of `bytes`.
    ///
    /// Wipe the source afterwards if it is sensitive; only the copy is
    /// protected.
    pub fn with_contents(
        allocator: SecretRegionAllocator<P>,
        bytes: &[u8],
    ) -> Result<Self, BufferError> {
        let mut buffer = Self::new(allocator, bytes.len())?;
        buffer.region_mut()?.copy_from(bytes)?;

        Ok(buffer)
    }

    /// Returns true once the region has been released.
    pub fn is_disposed(&self) -> bool {
        self.region.is_none()
    }

    /// Releases the region. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(region) = self.region.take() {
            self.allocator.release(region);
            log::debug!("disposed {}-byte secret buffer", self.len);
        }
    }

    fn region(&self) -> Result<&SecretRegion, BufferError> {
        self.region.as_ref().ok_or(BufferError::RegionReleased)
    }

    fn region_mut(&mut self) -> Result<&mut SecretRegion, BufferError> {
        self.region.as_mut().ok_or(BufferError::RegionReleased)
    }
}

impl<P: Platform> Drop for SecretBuffer<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<P: Platform> core::fmt::Debug for SecretBuffer<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &self.len)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl<P: Platform> Buffer for SecretBuffer<P> {
    fn open(
        &mut self,
        f: &mut dyn FnMut(&[u8]) -> Result<(), BufferError>,
    ) -> Result<(), BufferError> {
        f(self.region()?.as_slice())
    }

    fn open_mut(
        &mut self,
        f: &mut dyn FnMut(&mut [u8]) -> Result<(), BufferError>,
    ) -> Result<(), BufferError> {
        f(self.region_mut()?.as_mut_slice())
    }

    fn len(&self) -> usize {
        self.len
    }
}
