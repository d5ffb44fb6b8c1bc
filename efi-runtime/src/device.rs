// SPDX-License-Identifier: MIT OR Apache-2.0

//! The gateway as a character device.
//!
//! The host registers the gateway once under [`DEVICE_NAME`] and then opens
//! sessions on it. Sessions carry no state: any number can be open at the
//! same time, and each ioctl on any of them is independent.

use crate::boundary::UserMemory;
use crate::gateway::Gateway;
use crate::result::to_ioctl_return;
use crate::services::RuntimeServices;
use core::fmt::{self, Display, Formatter};
use log::{error, info};

/// Name the device is registered under.
pub const DEVICE_NAME: &str = "efi_runtime";

/// Version reported when the device is registered.
pub const DRIVER_VERSION: &str = "0.1";

/// Minor number asking the host to pick a free one.
pub const MISC_DYNAMIC_MINOR: u32 = 255;

/// The host's hook for registering a miscellaneous character device.
pub trait MiscRegistrar {
    /// Registers `name` on `minor`. Returns a positive errno on failure.
    fn register(&mut self, name: &'static str, minor: u32) -> Result<(), i32>;
}

/// The host refused to register the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegistrationError(pub i32);

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "can't register {DEVICE_NAME}: errno {}", self.0)
    }
}

impl core::error::Error for RegistrationError {}

/// A registered gateway device.
#[derive(Debug)]
pub struct Device<R> {
    gateway: Gateway<R>,
}

impl<R: RuntimeServices> Device<R> {
    /// Registers `gateway` with the host.
    pub fn register<H>(host: &mut H, gateway: Gateway<R>) -> Result<Self, RegistrationError>
    where
        H: MiscRegistrar + ?Sized,
    {
        info!("EFI_RUNTIME Driver v{DRIVER_VERSION}");

        host.register(DEVICE_NAME, MISC_DYNAMIC_MINOR)
            .map_err(|errno| {
                error!("can't misc_register on minor={MISC_DYNAMIC_MINOR}");
                RegistrationError(errno)
            })?;

        Ok(Self { gateway })
    }

    /// Opens a session.
    pub const fn open(&self) -> Session<'_, R> {
        Session {
            gateway: &self.gateway,
        }
    }

    /// The gateway behind this device.
    pub const fn gateway(&self) -> &Gateway<R> {
        &self.gateway
    }
}

/// An open handle on a [`Device`].
#[derive(Debug)]
pub struct Session<'a, R> {
    gateway: &'a Gateway<R>,
}

impl<R: RuntimeServices> Session<'_, R> {
    /// Handles one ioctl. Returns zero on success, a negated errno
    /// otherwise.
    pub fn ioctl<M>(&self, mem: &mut M, cmd: u32, arg: u64) -> i64
    where
        M: UserMemory + ?Sized,
    {
        to_ioctl_return(&self.gateway.ioctl(mem, cmd, arg))
    }

    /// Closes the session.
    pub fn release(self) {}
}

impl<R> Clone for Session<'_, R> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway,
        }
    }
}
