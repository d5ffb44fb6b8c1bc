// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway from an unprivileged caller to the firmware runtime services.
//!
//! A caller that may not call the firmware itself asks this crate to do it
//! through a narrow ioctl-style interface: a command code and the address of
//! a fixed-size request block in the caller's memory. Six commands are
//! supported: get/set variable, get/set time, and get/set wakeup time.
//!
//! Everything the caller supplies is treated as hostile. Request blocks are
//! copied across the trust boundary whole and with their exact size checked,
//! the firmware only ever sees gateway-owned copies, and each command issues
//! exactly one firmware call.
//!
//! # Crate organisation
//!
//! - [`ioctl`], [`time`], [`runtime`]: the raw records, re-exported from
//!   `efi-runtime-raw`.
//! - [`boundary`]: [`UserMemory`], the only way caller memory is touched,
//!   and the sized transfers built on it.
//! - [`convert`]: conversion between the caller's and the firmware's time
//!   records.
//! - [`services`]: [`RuntimeServices`], the firmware the gateway calls.
//! - [`Gateway`]: the six operations and the command dispatcher.
//! - [`device`]: registration with the host and stateless sessions.
//!
//! # Results
//!
//! Operations return [`Result`]. The three error classes map to the errno
//! values the caller sees:
//!
//! | Error                              | errno    |
//! |------------------------------------|----------|
//! | [`Error::UnsupportedOperation`]    | `ENOTTY` |
//! | [`Error::BoundaryFault`]           | `EFAULT` |
//! | [`Error::FirmwareCallFailed`]      | `EINVAL` |
//!
//! # Optional crate features
//!
//! - `logger`: Logging implementation for the standard [`log`] crate that
//!   writes to a console provided by the host. No buffering is done.
//!
//! [`UserMemory`]: boundary::UserMemory
//! [`RuntimeServices`]: services::RuntimeServices

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![no_std]
// Enable some additional warnings and lints.
#![warn(clippy::ptr_as_ptr, missing_docs, unused)]
#![deny(clippy::all)]
#![deny(clippy::must_use_candidate)]

extern crate alloc;

pub use efi_runtime_raw::{ioctl, runtime, time, Boolean, Char16};
pub use uguid::{guid, Guid};

mod result;
pub use self::result::{errno, to_ioctl_return, Error, Result, Status, StatusExt};

pub mod boundary;
pub mod convert;
pub mod device;
pub mod helpers;
pub mod services;

mod dispatch;
mod gateway;
mod name;

pub use self::gateway::{Gateway, GatewayConfig};
pub use self::name::VariableName;
