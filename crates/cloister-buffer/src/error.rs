// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for cloister-buffer.
use alloc::boxed::Box;
use thiserror::Error;

use cloister_region::{AllocationError, RegionError};

/// Errors that can occur when working with buffers.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The secret region could not be created.
    #[error("AllocationError: {0}")]
    Allocation(#[from] AllocationError),

    /// The secret region rejected an access.
    #[error("RegionError: {0}")]
    Region(#[from] RegionError),

    /// The region was already released.
    #[error("secret region has been released")]
    RegionReleased,

    /// An error occurred in a callback function.
    #[error("callback error: {0:?}")]
    CallbackError(Box<dyn core::fmt::Debug + Send + Sync + 'static>),
}

impl BufferError {
    /// Creates a CallbackError from any Debug + Send + Sync error.
    pub fn callback_error<E: core::fmt::Debug + Send + Sync + 'static>(e: E) -> Self {
        Self::CallbackError(Box::new(e))
    }
}
