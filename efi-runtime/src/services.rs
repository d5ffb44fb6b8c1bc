// SPDX-License-Identifier: MIT OR Apache-2.0

//! The firmware runtime services the gateway calls into.

use crate::runtime::{TimeCapabilities, VariableAttributes};
use crate::time::Time;
use crate::{Char16, Guid, Status};

/// Handle to the firmware's variable, time and wake-alarm services.
///
/// The gateway owns one of these and makes exactly one call per command.
/// It adds no locking of its own: the gateway may call these methods from
/// several threads at once, and any ordering between concurrent set
/// operations is up to the implementation.
///
/// Each method returns the firmware's status. Out-parameters are only
/// meaningful when the status is [`Status::SUCCESS`], with the exception
/// noted on [`get_variable`](Self::get_variable).
pub trait RuntimeServices {
    /// Reads the variable `name` (NUL-terminated) in namespace `vendor` into
    /// `data`.
    ///
    /// On entry `data_size` equals `data.len()`. On success it holds the
    /// number of bytes written to `data`. If the value does not fit, the
    /// firmware returns [`Status::BUFFER_TOO_SMALL`] and sets `data_size` to
    /// the size required.
    fn get_variable(
        &self,
        name: &[Char16],
        vendor: &Guid,
        attributes: &mut VariableAttributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status;

    /// Creates, replaces or (with empty `data`) deletes a variable.
    fn set_variable(
        &self,
        name: &[Char16],
        vendor: &Guid,
        attributes: VariableAttributes,
        data: &[u8],
    ) -> Status;

    /// Reads the real time clock and its capabilities.
    fn get_time(&self, time: &mut Time, capabilities: &mut TimeCapabilities) -> Status;

    /// Sets the real time clock.
    fn set_time(&self, time: &Time) -> Status;

    /// Reads the wake alarm: whether it is armed, whether it has fired and
    /// is waiting to be serviced, and the time it is set to.
    fn get_wakeup_time(&self, enabled: &mut bool, pending: &mut bool, time: &mut Time)
        -> Status;

    /// Arms (`enable`) or disarms the wake alarm.
    fn set_wakeup_time(&self, enable: bool, time: &Time) -> Status;
}

impl<R: RuntimeServices + ?Sized> RuntimeServices for &R {
    fn get_variable(
        &self,
        name: &[Char16],
        vendor: &Guid,
        attributes: &mut VariableAttributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status {
        (**self).get_variable(name, vendor, attributes, data_size, data)
    }

    fn set_variable(
        &self,
        name: &[Char16],
        vendor: &Guid,
        attributes: VariableAttributes,
        data: &[u8],
    ) -> Status {
        (**self).set_variable(name, vendor, attributes, data)
    }

    fn get_time(&self, time: &mut Time, capabilities: &mut TimeCapabilities) -> Status {
        (**self).get_time(time, capabilities)
    }

    fn set_time(&self, time: &Time) -> Status {
        (**self).set_time(time)
    }

    fn get_wakeup_time(
        &self,
        enabled: &mut bool,
        pending: &mut bool,
        time: &mut Time,
    ) -> Status {
        (**self).get_wakeup_time(enabled, pending, time)
    }

    fn set_wakeup_time(&self, enable: bool, time: &Time) -> Status {
        (**self).set_wakeup_time(enable, time)
    }
}
