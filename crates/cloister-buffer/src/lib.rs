// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Self-releasing secret memory buffers.
//!
//! [`SecretBuffer`] wraps a [`SecretRegion`](cloister_region::SecretRegion)
//! together with the allocator that created it, exposes the contents only
//! through closures, and zeroizes and unmaps the region when disposed or
//! dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(unix)]
//! # fn example() -> Result<(), cloister_buffer::BufferError> {
//! use cloister_buffer::{Buffer, SecretBuffer};
//! use cloister_region::{LibcPlatform, SecretRegionAllocator};
//!
//! let allocator = SecretRegionAllocator::new(LibcPlatform::new());
//! let mut buffer = SecretBuffer::with_contents(allocator, b"secret decryption key")?;
//!
//! buffer.open(&mut |slice: &[u8]| {
//!     assert_eq!(slice, b"secret decryption key");
//!     Ok(())
//! })?;
//!
//! // Zeroized and unmapped on drop
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod error;
mod secret_buffer;
mod traits;

pub use error::BufferError;
pub use secret_buffer::SecretBuffer;
pub use traits::Buffer;
