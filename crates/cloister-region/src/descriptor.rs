// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Scoped ownership of the secret descriptor during creation.

use crate::platform::{Platform, RawDescriptor};

/// Owns a descriptor for the duration of one `create` call and closes it
/// exactly once when dropped, including during unwinding.
pub(crate) struct DescriptorGuard<'a, P: Platform> {
    platform: &'a P,
    fd: RawDescriptor,
}

impl<'a, P: Platform> DescriptorGuard<'a, P> {
    pub(crate) fn new(platform: &'a P, fd: RawDescriptor) -> Self {
        Self { platform, fd }
    }

    pub(crate) fn fd(&self) -> RawDescriptor {
        self.fd
    }
}

impl<P: Platform> Drop for DescriptorGuard<'_, P> {
    fn drop(&mut self) {
        if self.platform.close(self.fd) == -1 {
            let code = self.platform.last_error();
            log::warn!(
                "close({}) on secret descriptor failed (errno={}): {}",
                self.fd,
                code,
                self.platform.describe_error(code)
            );
        } else {
            log::debug!("closed secret descriptor {}", self.fd);
        }
    }
}
