// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facilities for dealing with gateway operation results.
//!
//! Every gateway operation ends in one of three ways besides success, and
//! the caller must be able to tell them apart: the command was not one the
//! gateway knows, a transfer across the trust boundary failed (the firmware
//! may not have been called at all), or the firmware was called and
//! reported a failure.

use crate::boundary::Fault;
use crate::ioctl::Command;
use core::fmt::{self, Display, Formatter};

mod status;
pub use self::status::StatusExt;

pub use efi_runtime_raw::Status;

/// Errno values handed back to the caller.
pub mod errno {
    /// Bad address.
    pub const EFAULT: i32 = 14;
    /// Invalid argument.
    pub const EINVAL: i32 = 22;
    /// Inappropriate ioctl for device.
    pub const ENOTTY: i32 = 25;
}

/// Return type of every gateway operation.
pub type Result<Output = ()> = core::result::Result<Output, Error>;

/// Reasons a gateway operation can fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// The command code is not one of the supported commands. Nothing was
    /// read, written or called.
    UnsupportedOperation(Command),

    /// A transfer across the trust boundary could not be completed.
    BoundaryFault(Fault),

    /// The firmware call was made and did not report success. The status is
    /// kept for diagnostics only; callers see a single failure class.
    FirmwareCallFailed(Status),
}

impl Error {
    /// The positive errno value for this error.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::UnsupportedOperation(_) => errno::ENOTTY,
            Self::BoundaryFault(_) => errno::EFAULT,
            Self::FirmwareCallFailed(_) => errno::EINVAL,
        }
    }

    /// The value an ioctl handler returns for this error: the negated errno.
    #[must_use]
    pub const fn to_ioctl_return(&self) -> i64 {
        -(self.errno() as i64)
    }

    /// The firmware status, if the firmware was called and failed.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::FirmwareCallFailed(status) => Some(*status),
            _ => None,
        }
    }
}

/// Converts the result of an operation to an ioctl return value: zero on
/// success, a negated errno otherwise.
#[must_use]
pub const fn to_ioctl_return(result: &Result) -> i64 {
    match result {
        Ok(()) => 0,
        Err(err) => err.to_ioctl_return(),
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Self::FirmwareCallFailed(status)
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        Self::BoundaryFault(fault)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperation(cmd) => {
                write!(f, "unsupported command {:#010x}", cmd.0)
            }
            Self::BoundaryFault(fault) => write!(f, "bad address: {fault}"),
            Self::FirmwareCallFailed(status) => {
                write!(f, "firmware call failed with status {status}")
            }
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::BoundaryFault(fault) => Some(fault),
            _ => None,
        }
    }
}
