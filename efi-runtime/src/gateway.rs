// SPDX-License-Identifier: MIT OR Apache-2.0

//! The six gateway operations.
//!
//! Every operation has the same shape: copy the request block in, convert
//! what needs converting, make one firmware call, translate its status, and
//! on success copy the result block out. Nothing is retried, and nothing is
//! written back to the caller unless the whole result can be written.

use crate::boundary::{self, Fault, UserMemory, UserPtr};
use crate::convert::{to_firmware_time, to_wire_time};
use crate::ioctl::{
    Command, GetTime, GetVariable, GetWakeupTime, IoctlArg, SetTime, SetVariable,
    SetWakeupTime, WireTimeCapabilities,
};
use crate::name::VariableName;
use crate::runtime::{TimeCapabilities, VariableAttributes};
use crate::services::RuntimeServices;
use crate::time::Time;
use crate::{Result, Status, StatusExt};
use alloc::vec;
use log::error;

/// Limits applied to caller-described transfers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Longest variable name accepted, terminator excluded.
    pub max_name_chars: usize,

    /// Largest variable payload copied across the boundary. Larger
    /// set-variable payloads are refused; get-variable reads at most this
    /// many bytes whatever the caller's buffer size.
    pub max_data_size: usize,
}

impl GatewayConfig {
    /// Default for [`max_name_chars`](Self::max_name_chars).
    pub const DEFAULT_MAX_NAME_CHARS: usize = 1024;

    /// Default for [`max_data_size`](Self::max_data_size).
    pub const DEFAULT_MAX_DATA_SIZE: usize = 64 * 1024;
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_name_chars: Self::DEFAULT_MAX_NAME_CHARS,
            max_data_size: Self::DEFAULT_MAX_DATA_SIZE,
        }
    }
}

/// Gateway from an unprivileged caller to the firmware runtime services.
///
/// The gateway holds no per-call state, so one instance can serve any
/// number of callers concurrently provided `R` allows it.
#[derive(Debug)]
pub struct Gateway<R> {
    services: R,
    config: GatewayConfig,
}

impl<R: RuntimeServices> Gateway<R> {
    /// Creates a gateway to `services` with the default limits.
    pub fn new(services: R) -> Self {
        Self::with_config(services, GatewayConfig::default())
    }

    /// Creates a gateway to `services` with the given limits.
    pub const fn with_config(services: R, config: GatewayConfig) -> Self {
        Self { services, config }
    }

    /// The firmware services this gateway calls.
    pub const fn services(&self) -> &R {
        &self.services
    }

    /// The limits in effect.
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn read_name<M>(&self, mem: &M, src: u64) -> Result<VariableName>
    where
        M: UserMemory + ?Sized,
    {
        let src = UserPtr::new(src);
        let chars = boundary::ingest_ucs2(mem, src, self.config.max_name_chars)?;
        // `ingest_ucs2` stops at the first NUL, so this cannot fail.
        VariableName::from_u16_with_nul(chars).ok_or_else(|| {
            Fault::Unterminated {
                addr: src,
                limit: self.config.max_name_chars,
            }
            .into()
        })
    }

    /// Reads a variable into the caller's buffer.
    ///
    /// On success the caller's block gets the variable's attributes and size,
    /// and the first `data_size` bytes of its buffer get the value. The rest
    /// of the buffer is not touched. On failure nothing is written.
    pub fn get_variable<M>(&self, mem: &mut M, arg: UserPtr) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let mut request: GetVariable =
            boundary::ingest(mem, arg, Command::GET_VARIABLE.size())?;
        let name = self.read_name(mem, request.variable_name)?;

        let capacity = usize::try_from(request.data_size)
            .unwrap_or(usize::MAX)
            .min(self.config.max_data_size);
        let mut data = vec![0; capacity];
        let mut data_size = capacity;
        let mut attributes = VariableAttributes::from_bits_retain(request.attributes);

        let status = self.services.get_variable(
            name.as_slice_with_nul(),
            &request.vendor_guid,
            &mut attributes,
            &mut data_size,
            &mut data,
        );
        status.to_result().inspect_err(|_| {
            error!("can't get variable {name}: {status}");
        })?;

        if data_size > capacity {
            error!("firmware returned {data_size} bytes of {name} into a {capacity} byte buffer");
            return Err(Status::BAD_BUFFER_SIZE.into());
        }

        // Check both destinations first so that either both are written or
        // neither is.
        let dst = UserPtr::new(request.data);
        if !mem.access_ok(dst, data_size) {
            return Err(Fault::Inaccessible {
                addr: dst,
                len: data_size,
            }
            .into());
        }
        if !mem.access_ok(arg, GetVariable::SIZE) {
            return Err(Fault::Inaccessible {
                addr: arg,
                len: GetVariable::SIZE,
            }
            .into());
        }

        request.attributes = attributes.bits();
        request.data_size = data_size as u64;
        mem.copy_to_user(dst, &data[..data_size])?;
        boundary::egress(mem, arg, Command::GET_VARIABLE.size(), &request)?;
        Ok(())
    }

    /// Creates, updates or deletes a variable from the caller's block.
    pub fn set_variable<M>(&self, mem: &mut M, arg: UserPtr) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let request: SetVariable = boundary::ingest(mem, arg, Command::SET_VARIABLE.size())?;
        let name = self.read_name(mem, request.variable_name)?;
        let data = boundary::ingest_bytes(
            mem,
            UserPtr::new(request.data),
            request.data_size,
            self.config.max_data_size,
        )?;

        let status = self.services.set_variable(
            name.as_slice_with_nul(),
            &request.vendor_guid,
            VariableAttributes::from_bits_retain(request.attributes),
            &data,
        );
        status.to_result().inspect_err(|_| {
            error!("can't set variable {name}: {status}");
        })
    }

    /// Reads the real time clock and its capabilities into the caller's
    /// block.
    pub fn get_time<M>(&self, mem: &mut M, arg: UserPtr) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let mut time = Time::invalid();
        let mut capabilities = TimeCapabilities::default();

        let status = self.services.get_time(&mut time, &mut capabilities);
        status.to_result().inspect_err(|_| {
            error!("can't read time: {status}");
        })?;

        let reply = GetTime {
            capabilities: WireTimeCapabilities {
                resolution: capabilities.resolution,
                accuracy: capabilities.accuracy,
                sets_to_zero: capabilities.sets_to_zero.into(),
            },
            time: to_wire_time(&time),
        };
        boundary::egress(mem, arg, Command::GET_TIME.size(), &reply)?;
        Ok(())
    }

    /// Sets the real time clock to the time in the caller's block.
    pub fn set_time<M>(&self, mem: &mut M, arg: UserPtr) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let request: SetTime = boundary::ingest(mem, arg, Command::SET_TIME.size())?;
        let time = to_firmware_time(&request.time);

        let status = self.services.set_time(&time);
        status.to_result().inspect_err(|_| {
            error!("can't set time to {time}: {status}");
        })
    }

    /// Reads the wake alarm into the caller's block.
    pub fn get_wakeup_time<M>(&self, mem: &mut M, arg: UserPtr) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let mut enabled = false;
        let mut pending = false;
        let mut time = Time::invalid();

        let status = self
            .services
            .get_wakeup_time(&mut enabled, &mut pending, &mut time);
        status.to_result().inspect_err(|_| {
            error!("can't read wakeup time: {status}");
        })?;

        let reply = GetWakeupTime {
            enabled: enabled.into(),
            pending: pending.into(),
            time: to_wire_time(&time),
        };
        boundary::egress(mem, arg, Command::GET_WAKEUP_TIME.size(), &reply)?;
        Ok(())
    }

    /// Arms or disarms the wake alarm as the caller's block says.
    pub fn set_wakeup_time<M>(&self, mem: &mut M, arg: UserPtr) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let request: SetWakeupTime =
            boundary::ingest(mem, arg, Command::SET_WAKEUP_TIME.size())?;
        let enable = bool::from(request.enabled);
        let time = to_firmware_time(&request.time);

        let status = self.services.set_wakeup_time(enable, &time);
        status.to_result().inspect_err(|_| {
            error!("can't set wakeup time (enable={enable}): {status}");
        })
    }
}
