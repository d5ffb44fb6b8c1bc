// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional helpers for integrating the gateway with its host.
//!
//! For now, this includes:
//! - an implementation of [`Log`] writing to a host console (feature
//!   `logger`)
//!
//! [`Log`]: log::Log

#[cfg(feature = "logger")]
pub mod logger;
