// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Error, Result};
use efi_runtime_raw::Status;

/// Translates firmware status codes into gateway results.
///
/// Only [`Status::SUCCESS`] counts as success. Warnings are failures, as is
/// every error code; all of them land in [`Error::FirmwareCallFailed`].
pub trait StatusExt {
    /// Converts this status code into a [`Result`].
    fn to_result(self) -> Result;

    /// Converts this status code into a [`Result`] with a given `Ok` value.
    ///
    /// `val` is only evaluated on success.
    fn to_result_with_val<T>(self, val: impl FnOnce() -> T) -> Result<T>;
}

impl StatusExt for Status {
    #[inline]
    fn to_result(self) -> Result {
        self.to_result_with_val(|| ())
    }

    #[inline]
    fn to_result_with_val<T>(self, val: impl FnOnce() -> T) -> Result<T> {
        if self.is_success() {
            Ok(val())
        } else {
            Err(Error::FirmwareCallFailed(self))
        }
    }
}
