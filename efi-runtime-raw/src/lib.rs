// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw types for the EFI runtime gateway.
//!
//! This crate holds the definitions shared by both sides of the gateway: the
//! firmware-facing records (status codes, the firmware time record, variable
//! attributes) and the user-facing request blocks and command codes of the
//! ioctl interface.
//!
//! It contains no logic beyond field-by-field encoding of the request blocks.
//! The gateway itself lives in the `efi-runtime` crate.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(
    clippy::all,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate,
    clippy::ptr_as_ptr,
    clippy::use_self,
    missing_debug_implementations,
    unused
)]

#[macro_use]
mod enums;

pub mod ioctl;
pub mod runtime;
pub mod time;

mod status;

pub use status::Status;
pub use uguid::{guid, Guid};

/// Two-byte character.
///
/// Unless otherwise noted, the encoding is UCS-2. The UCS-2 encoding was
/// defined by Unicode 2.1 and ISO/IEC 10646 standards, but is no longer part of
/// the modern Unicode standards. It is essentially UTF-16 without support for
/// surrogate pairs.
pub type Char16 = u16;

/// ABI-compatible EFI boolean.
///
/// This is similar to a `bool`, but allows values other than 0 or 1 to be
/// stored without it being undefined behavior. Caller-supplied blocks can
/// carry any byte here, so the gateway never reads one as a `bool` directly.
///
/// Any non-zero value is treated as logically `true`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Ord, PartialOrd, Eq, Hash)]
#[repr(transparent)]
pub struct Boolean(pub u8);

impl Boolean {
    /// [`Boolean`] representing `true`.
    pub const TRUE: Self = Self(1);

    /// [`Boolean`] representing `false`.
    pub const FALSE: Self = Self(0);
}

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        match value {
            true => Self::TRUE,
            false => Self::FALSE,
        }
    }
}

impl From<Boolean> for bool {
    fn from(value: Boolean) -> Self {
        // Any bit pattern other than zero is true.
        value.0 != 0
    }
}
