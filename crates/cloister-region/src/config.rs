// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// What to do when sizing the secret descriptor fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Return [`AllocationError::ResizeFailed`](crate::AllocationError::ResizeFailed)
    /// immediately.
    #[default]
    Abort,
    /// Still attempt the mapping, so a mapping failure can be reported
    /// instead. A mapping that does succeed is torn down and the resize
    /// failure is returned: a region is never handed out unsized.
    AttemptMapping,
}

/// Allocator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Behaviour on `ftruncate` failure.
    pub resize_policy: ResizePolicy,
    /// Zeroize region contents before unmapping in `release`.
    pub zeroize_on_release: bool,
}

impl AllocatorConfig {
    /// Sets [`AllocatorConfig::resize_policy`].
    pub fn with_resize_policy(mut self, resize_policy: ResizePolicy) -> Self {
        self.resize_policy = resize_policy;
        self
    }

    /// Sets [`AllocatorConfig::zeroize_on_release`].
    pub fn with_zeroize_on_release(mut self, zeroize_on_release: bool) -> Self {
        self.zeroize_on_release = zeroize_on_release;
        self
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            resize_policy: ResizePolicy::Abort,
            zeroize_on_release: true,
        }
    }
}
