// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for cloister-region.

use alloc::string::String;
use thiserror::Error;

use crate::profile::PlatformProfile;

/// Discriminant of [`AllocationError`], for callers that branch on the
/// failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationErrorKind {
    /// Requested length is zero or not representable as `off_t`.
    InvalidLength,
    /// Target has no secret memory mechanism.
    UnsupportedPlatform,
    /// `memfd_secret` does not exist in the running kernel.
    SyscallUnavailable,
    /// `memfd_secret` failed for another reason.
    DescriptorFailed,
    /// `ftruncate` failed.
    ResizeFailed,
    /// `mmap` returned the failure sentinel.
    MappingFailed,
}

/// Errors returned by [`SecretRegionAllocator::create`](crate::SecretRegionAllocator::create).
///
/// None of them leave anything behind: the descriptor, if one was obtained,
/// has already been closed and no mapping survives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Requested length is zero or exceeds `i64::MAX`.
    #[error("invalid secret region length: {len}")]
    InvalidLength {
        /// Requested length.
        len: usize,
    },

    /// Target has no secret memory mechanism.
    #[error("secret memory is not supported on {profile}")]
    UnsupportedPlatform {
        /// Profile of the target.
        profile: PlatformProfile,
    },

    /// The kernel returned `ENOSYS` for `memfd_secret`.
    #[error(
        "memfd_secret does not exist (errno={code}, {message}); the kernel may need the 'secretmem.enable=1' boot option"
    )]
    SyscallUnavailable {
        /// Raw errno.
        code: i32,
        /// Translated errno.
        message: String,
    },

    /// `memfd_secret` failed with something other than `ENOSYS`.
    #[error("memfd_secret failed (errno={code}): {message}")]
    DescriptorFailed {
        /// Raw errno.
        code: i32,
        /// Translated errno.
        message: String,
    },

    /// `ftruncate` on the secret descriptor failed.
    #[error("ftruncate failed (errno={code}): {message}")]
    ResizeFailed {
        /// Raw errno.
        code: i32,
        /// Translated errno.
        message: String,
    },

    /// `mmap` on the secret descriptor failed.
    #[error("mmap failed (errno={code}): {message}")]
    MappingFailed {
        /// Raw errno.
        code: i32,
        /// Translated errno.
        message: String,
    },
}

impl AllocationError {
    /// Returns the failure class.
    pub fn kind(&self) -> AllocationErrorKind {
        match self {
            Self::InvalidLength { .. } => AllocationErrorKind::InvalidLength,
            Self::UnsupportedPlatform { .. } => AllocationErrorKind::UnsupportedPlatform,
            Self::SyscallUnavailable { .. } => AllocationErrorKind::SyscallUnavailable,
            Self::DescriptorFailed { .. } => AllocationErrorKind::DescriptorFailed,
            Self::ResizeFailed { .. } => AllocationErrorKind::ResizeFailed,
            Self::MappingFailed { .. } => AllocationErrorKind::MappingFailed,
        }
    }

    /// Returns the raw platform error code, if the failure came from the OS.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::SyscallUnavailable { code, .. }
            | Self::DescriptorFailed { code, .. }
            | Self::ResizeFailed { code, .. }
            | Self::MappingFailed { code, .. } => Some(*code),
            Self::InvalidLength { .. } | Self::UnsupportedPlatform { .. } => None,
        }
    }

    /// Returns the translated platform error message, if the failure came
    /// from the OS.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::SyscallUnavailable { message, .. }
            | Self::DescriptorFailed { message, .. }
            | Self::ResizeFailed { message, .. }
            | Self::MappingFailed { message, .. } => Some(message.as_str()),
            Self::InvalidLength { .. } | Self::UnsupportedPlatform { .. } => None,
        }
    }
}

/// Errors from accessing a live [`SecretRegion`](crate::SecretRegion).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// Source does not fit in the region.
    #[error("source of {src_len} bytes does not fit in a {region_len}-byte region")]
    SourceTooLong {
        /// Length of the source slice.
        src_len: usize,
        /// Length of the region.
        region_len: usize,
    },
}
