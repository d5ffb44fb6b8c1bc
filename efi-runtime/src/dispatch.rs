// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps command codes to gateway operations.

use crate::boundary::{UserMemory, UserPtr};
use crate::gateway::Gateway;
use crate::ioctl::Command;
use crate::services::RuntimeServices;
use crate::{Error, Result};
use log::{debug, warn};

impl<R: RuntimeServices> Gateway<R> {
    /// Runs the operation named by `cmd` on the block at `arg`.
    ///
    /// The dispatcher does not look at the block itself. A code that names
    /// no operation fails with [`Error::UnsupportedOperation`] without
    /// touching caller memory or calling the firmware.
    pub fn ioctl<M>(&self, mem: &mut M, cmd: u32, arg: u64) -> Result
    where
        M: UserMemory + ?Sized,
    {
        let cmd = Command(cmd);
        let arg = UserPtr::new(arg);
        debug!("{cmd:?} on block at {arg}");

        let result = match cmd {
            Command::GET_VARIABLE => self.get_variable(mem, arg),
            Command::SET_VARIABLE => self.set_variable(mem, arg),
            Command::GET_TIME => self.get_time(mem, arg),
            Command::SET_TIME => self.set_time(mem, arg),
            Command::GET_WAKEUP_TIME => self.get_wakeup_time(mem, arg),
            Command::SET_WAKEUP_TIME => self.set_wakeup_time(mem, arg),
            _ => {
                warn!("unsupported command {:#010x}", cmd.0);
                Err(Error::UnsupportedOperation(cmd))
            }
        };
        result.inspect_err(|err| match err {
            Error::BoundaryFault(fault) => warn!("{cmd:?}: {fault}"),
            _ => debug!("{cmd:?} failed: {err}"),
        })
    }
}
