// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::error::BufferError;

/// Closure-scoped access to secret bytes.
///
/// Contents are only reachable inside the callbacks, so no reference to the
/// secret outlives the call. Once the backing region has been released
/// (see [`SecretBuffer::dispose`](crate::SecretBuffer::dispose)) both
/// accessors fail with [`BufferError::RegionReleased`] without running the
/// callback; [`len`](Buffer::len) keeps reporting the original length.
pub trait Buffer: core::fmt::Debug {
    /// Runs `f` over the contents.
    ///
    /// An error returned by `f` is passed through unchanged.
    fn open(
        &mut self,
        f: &mut dyn FnMut(&[u8]) -> Result<(), BufferError>,
    ) -> Result<(), BufferError>;

    /// Runs `f` over the contents, allowing it to overwrite them in place.
    fn open_mut(
        &mut self,
        f: &mut dyn FnMut(&mut [u8]) -> Result<(), BufferError>,
    ) -> Result<(), BufferError>;

    /// Length of the secret in bytes, fixed at creation.
    fn len(&self) -> usize;

    /// Returns true if the buffer holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
