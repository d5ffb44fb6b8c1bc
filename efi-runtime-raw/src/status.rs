// SPDX-License-Identifier: MIT OR Apache-2.0

newtype_enum! {
/// Outcome code returned by every firmware runtime service call.
///
/// Firmware may return implementation-specific codes, so the constants below
/// are not a comprehensive list of all possible values. Only the codes the
/// variable and time services are documented to return are named.
#[must_use]
pub enum Status: usize => {
    /// The operation completed successfully.
    SUCCESS                 =  0,

    /// The resulting buffer was too small, and the data was truncated.
    WARN_BUFFER_TOO_SMALL   =  4,
    /// The operation will be processed across a system reset.
    WARN_RESET_REQUIRED     =  7,

    /// A parameter was incorrect.
    INVALID_PARAMETER       = Self::ERROR_BIT |  2,
    /// The operation is not supported.
    UNSUPPORTED             = Self::ERROR_BIT |  3,
    /// The buffer was not the proper size for the request.
    BAD_BUFFER_SIZE         = Self::ERROR_BIT |  4,
    /// The buffer is not large enough to hold the requested data.
    /// The required buffer size is returned in the size parameter.
    BUFFER_TOO_SMALL        = Self::ERROR_BIT |  5,
    /// The physical device reported an error while attempting the operation.
    DEVICE_ERROR            = Self::ERROR_BIT |  7,
    /// The variable store or clock cannot be written to.
    WRITE_PROTECTED         = Self::ERROR_BIT |  8,
    /// Not enough storage is available to hold the variable.
    OUT_OF_RESOURCES        = Self::ERROR_BIT |  9,
    /// The variable was not found.
    NOT_FOUND               = Self::ERROR_BIT | 14,
    /// Access was denied.
    ACCESS_DENIED           = Self::ERROR_BIT | 15,
    /// The variable could not be written due to a security violation.
    SECURITY_VIOLATION      = Self::ERROR_BIT | 26,
}}

impl Status {
    /// Bit indicating that a status code is an error.
    pub const ERROR_BIT: usize = 1 << (usize::BITS - 1);

    /// Returns true if status code indicates success.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Returns true if status code indicates a warning.
    #[inline]
    #[must_use]
    pub fn is_warning(self) -> bool {
        (self != Self::SUCCESS) && (self.0 & Self::ERROR_BIT == 0)
    }

    /// Returns true if the status code indicates an error.
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.0 & Self::ERROR_BIT != 0
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}
