// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Per-target constants for the secret memory sequence.

/// `SYS_memfd_secret` on every Linux architecture that wires it up.
const LINUX_SYS_MEMFD_SECRET: i64 = 447;

/// `ENOSYS` from `asm-generic/errno.h`.
const LINUX_ENOSYS: i32 = 38;

/// `ENOSYS` from `sys/errno.h`.
const MACOS_ENOSYS: i32 = 78;

/// Target platform, selected once and queried for its constants.
///
/// Syscall numbers, errno encodings and the availability of `memfd_secret`
/// differ between targets. Everything the allocator needs to know about the
/// target comes from here instead of being branched on at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformProfile {
    /// Linux on x86_64.
    LinuxX86_64,
    /// Linux on aarch64.
    LinuxAarch64,
    /// Linux on riscv64.
    LinuxRiscv64,
    /// macOS (no secret memory mechanism).
    MacOs,
    /// Any other target (no secret memory mechanism).
    Other,
}

impl PlatformProfile {
    /// Returns the profile of the compilation target.
    pub const fn detect() -> Self {
        if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
            Self::LinuxX86_64
        } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
            Self::LinuxAarch64
        } else if cfg!(all(target_os = "linux", target_arch = "riscv64")) {
            Self::LinuxRiscv64
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    /// Syscall number of `memfd_secret`, or `None` if the target has no
    /// secret memory mechanism.
    pub const fn secret_memory_syscall(&self) -> Option<i64> {
        match self {
            Self::LinuxX86_64 | Self::LinuxAarch64 | Self::LinuxRiscv64 => {
                Some(LINUX_SYS_MEMFD_SECRET)
            }
            Self::MacOs | Self::Other => None,
        }
    }

    /// Errno value meaning "no such system call".
    pub const fn enosys(&self) -> i32 {
        match self {
            Self::MacOs => MACOS_ENOSYS,
            _ => LINUX_ENOSYS,
        }
    }

    /// Address returned by `mmap` on failure (`MAP_FAILED`, all bits set).
    pub const fn map_failed_sentinel(&self) -> usize {
        usize::MAX
    }

    /// Human-readable target name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LinuxX86_64 => "linux-x86_64",
            Self::LinuxAarch64 => "linux-aarch64",
            Self::LinuxRiscv64 => "linux-riscv64",
            Self::MacOs => "macos",
            Self::Other => "unknown",
        }
    }
}

impl core::fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
