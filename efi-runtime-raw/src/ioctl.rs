// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user-facing command interface.
//!
//! Each command code names exactly one request block. A block is a fixed-size
//! C structure that the caller places at the address passed along with the
//! command. Blocks are encoded and decoded field by field at fixed offsets
//! in native byte order, without ever reinterpreting memory as a struct.
//! The offsets are those of the 64-bit C layout, where `u64` fields are
//! 8-byte aligned; they are used on every target, so a 32-bit caller must
//! lay its blocks out the same way.
//!
//! Addresses embedded in a block (variable names, data buffers) are plain
//! `u64` values in the caller's address space. They are never dereferenced
//! here.

use crate::{Boolean, Guid};
use core::fmt::{self, Display, Formatter};

/// Error returned when a byte buffer does not have the size of the block
/// being encoded or decoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayoutError {
    /// Size of the block.
    pub expected: usize,
    /// Size of the buffer that was supplied.
    pub actual: usize,
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block is {} bytes but {} bytes were supplied",
            self.expected, self.actual
        )
    }
}

impl core::error::Error for LayoutError {}

/// A fixed-size block transferred across the command interface.
pub trait IoctlArg: Sized {
    /// Exact size of the encoded block in bytes.
    const SIZE: usize;

    /// Decodes a block. `bytes` must be exactly [`Self::SIZE`] bytes long.
    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError>;

    /// Encodes this block. `bytes` must be exactly [`Self::SIZE`] bytes long.
    /// Padding bytes are written as zero.
    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError>;
}

const fn check_len<T: IoctlArg>(len: usize) -> Result<(), LayoutError> {
    if len == T::SIZE {
        Ok(())
    } else {
        Err(LayoutError {
            expected: T::SIZE,
            actual: len,
        })
    }
}

/// Copies `N` bytes starting at `offset`. Callers have checked the length.
fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

fn put(bytes: &mut [u8], offset: usize, value: &[u8]) {
    bytes[offset..offset + value.len()].copy_from_slice(value);
}

/// Date and time as exchanged with the caller.
///
/// Carries the same information as the firmware's [`Time`], field for field.
/// The daylight flags are kept as the raw byte the caller supplied.
///
/// [`Time`]: crate::time::Time
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct WireTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Reserved.
    pub pad1: u8,
    pub nanosecond: u32,
    /// Offset from UTC in minutes, or [`WireTime::UNSPECIFIED_TIMEZONE`].
    pub time_zone: i16,
    pub daylight: u8,
    /// Reserved.
    pub pad2: u8,
}

impl WireTime {
    /// Sentinel time zone meaning "local time".
    pub const UNSPECIFIED_TIMEZONE: i16 = 0x07ff;
}

impl IoctlArg for WireTime {
    const SIZE: usize = 16;

    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len::<Self>(bytes.len())?;
        Ok(Self {
            year: u16::from_ne_bytes(field(bytes, 0)),
            month: bytes[2],
            day: bytes[3],
            hour: bytes[4],
            minute: bytes[5],
            second: bytes[6],
            pad1: bytes[7],
            nanosecond: u32::from_ne_bytes(field(bytes, 8)),
            time_zone: i16::from_ne_bytes(field(bytes, 12)),
            daylight: bytes[14],
            pad2: bytes[15],
        })
    }

    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
        check_len::<Self>(bytes.len())?;
        put(bytes, 0, &self.year.to_ne_bytes());
        put(
            bytes,
            2,
            &[
                self.month,
                self.day,
                self.hour,
                self.minute,
                self.second,
                self.pad1,
            ],
        );
        put(bytes, 8, &self.nanosecond.to_ne_bytes());
        put(bytes, 12, &self.time_zone.to_ne_bytes());
        put(bytes, 14, &[self.daylight, self.pad2]);
        Ok(())
    }
}

/// Real time clock capabilities as exchanged with the caller.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct WireTimeCapabilities {
    pub resolution: u32,
    pub accuracy: u32,
    pub sets_to_zero: Boolean,
}

impl IoctlArg for WireTimeCapabilities {
    const SIZE: usize = 12;

    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len::<Self>(bytes.len())?;
        Ok(Self {
            resolution: u32::from_ne_bytes(field(bytes, 0)),
            accuracy: u32::from_ne_bytes(field(bytes, 4)),
            sets_to_zero: Boolean(bytes[8]),
        })
    }

    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
        check_len::<Self>(bytes.len())?;
        bytes.fill(0);
        put(bytes, 0, &self.resolution.to_ne_bytes());
        put(bytes, 4, &self.accuracy.to_ne_bytes());
        bytes[8] = self.sets_to_zero.0;
        Ok(())
    }
}

/// Request block of [`Command::GET_VARIABLE`].
///
/// On input `data_size` is the capacity of the buffer at `data`. On success
/// the gateway writes the block back with `attributes` and `data_size`
/// updated, and the variable's value at `data`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct GetVariable {
    /// Address of the NUL-terminated UCS-2 variable name.
    pub variable_name: u64,
    pub vendor_guid: Guid,
    pub attributes: u32,
    pub data_size: u64,
    /// Address of the caller's data buffer.
    pub data: u64,
}

/// Request block of [`Command::SET_VARIABLE`].
///
/// `data_size` bytes are read from `data`. Nothing is written back.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct SetVariable {
    /// Address of the NUL-terminated UCS-2 variable name.
    pub variable_name: u64,
    pub vendor_guid: Guid,
    pub attributes: u32,
    pub data_size: u64,
    /// Address of the value to store.
    pub data: u64,
}

// Both variable blocks share one layout: name @0, guid @8, attributes @24,
// 4 bytes padding, size @32, data @40.
macro_rules! variable_block {
    ($type:ty) => {
        impl IoctlArg for $type {
            const SIZE: usize = 48;

            fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
                check_len::<Self>(bytes.len())?;
                Ok(Self {
                    variable_name: u64::from_ne_bytes(field(bytes, 0)),
                    vendor_guid: Guid::from_bytes(field(bytes, 8)),
                    attributes: u32::from_ne_bytes(field(bytes, 24)),
                    data_size: u64::from_ne_bytes(field(bytes, 32)),
                    data: u64::from_ne_bytes(field(bytes, 40)),
                })
            }

            fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
                check_len::<Self>(bytes.len())?;
                bytes.fill(0);
                put(bytes, 0, &self.variable_name.to_ne_bytes());
                put(bytes, 8, &self.vendor_guid.to_bytes());
                put(bytes, 24, &self.attributes.to_ne_bytes());
                put(bytes, 32, &self.data_size.to_ne_bytes());
                put(bytes, 40, &self.data.to_ne_bytes());
                Ok(())
            }
        }
    };
}

variable_block!(GetVariable);
variable_block!(SetVariable);

/// Request block of [`Command::GET_TIME`]. Output only.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct GetTime {
    pub capabilities: WireTimeCapabilities,
    pub time: WireTime,
}

impl IoctlArg for GetTime {
    const SIZE: usize = 28;

    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len::<Self>(bytes.len())?;
        Ok(Self {
            capabilities: WireTimeCapabilities::read_from(&bytes[..12])?,
            time: WireTime::read_from(&bytes[12..])?,
        })
    }

    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
        check_len::<Self>(bytes.len())?;
        let (capabilities, time) = bytes.split_at_mut(12);
        self.capabilities.write_to(capabilities)?;
        self.time.write_to(time)
    }
}

/// Request block of [`Command::SET_TIME`]. Input only.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct SetTime {
    pub time: WireTime,
}

impl IoctlArg for SetTime {
    const SIZE: usize = WireTime::SIZE;

    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        Ok(Self {
            time: WireTime::read_from(bytes)?,
        })
    }

    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
        self.time.write_to(bytes)
    }
}

/// Request block of [`Command::GET_WAKEUP_TIME`]. Output only.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct GetWakeupTime {
    pub enabled: Boolean,
    pub pending: Boolean,
    pub time: WireTime,
}

impl IoctlArg for GetWakeupTime {
    const SIZE: usize = 20;

    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len::<Self>(bytes.len())?;
        Ok(Self {
            enabled: Boolean(bytes[0]),
            pending: Boolean(bytes[1]),
            time: WireTime::read_from(&bytes[4..])?,
        })
    }

    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
        check_len::<Self>(bytes.len())?;
        put(bytes, 0, &[self.enabled.0, self.pending.0, 0, 0]);
        self.time.write_to(&mut bytes[4..])
    }
}

/// Request block of [`Command::SET_WAKEUP_TIME`]. Input only.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct SetWakeupTime {
    pub enabled: Boolean,
    pub time: WireTime,
}

impl IoctlArg for SetWakeupTime {
    const SIZE: usize = 20;

    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len::<Self>(bytes.len())?;
        Ok(Self {
            enabled: Boolean(bytes[0]),
            time: WireTime::read_from(&bytes[4..])?,
        })
    }

    fn write_to(&self, bytes: &mut [u8]) -> Result<(), LayoutError> {
        check_len::<Self>(bytes.len())?;
        put(bytes, 0, &[self.enabled.0, 0, 0, 0]);
        self.time.write_to(&mut bytes[4..])
    }
}

/// Ioctl type byte shared by all commands.
pub const IOCTL_TYPE: u8 = b'p';

/// Direction bits of an ioctl command code, as seen from the caller.
pub mod direction {
    /// No data transfer.
    pub const NONE: u32 = 0;
    /// The caller writes, the gateway reads.
    pub const WRITE: u32 = 1;
    /// The gateway writes, the caller reads.
    pub const READ: u32 = 2;
}

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;

const TYPE_SHIFT: u32 = NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

/// Encodes an ioctl command code the way Linux `_IOC` does.
#[must_use]
pub const fn encode(dir: u32, ty: u8, nr: u8, size: usize) -> u32 {
    (dir << DIR_SHIFT) | ((size as u32) << SIZE_SHIFT) | ((ty as u32) << TYPE_SHIFT) | nr as u32
}

newtype_enum! {
/// A command code as passed by the caller.
///
/// Codes embed the direction and the exact size of their request block.
pub enum Command: u32 => {
    /// Read a variable.
    GET_VARIABLE    = encode(direction::READ | direction::WRITE, IOCTL_TYPE, 0x01, GetVariable::SIZE),
    /// Create, update or delete a variable.
    SET_VARIABLE    = encode(direction::WRITE, IOCTL_TYPE, 0x02, SetVariable::SIZE),
    /// Read the real time clock and its capabilities.
    GET_TIME        = encode(direction::READ, IOCTL_TYPE, 0x03, GetTime::SIZE),
    /// Set the real time clock.
    SET_TIME        = encode(direction::WRITE, IOCTL_TYPE, 0x04, SetTime::SIZE),
    /// Read the wake alarm.
    GET_WAKEUP_TIME = encode(direction::READ, IOCTL_TYPE, 0x05, GetWakeupTime::SIZE),
    /// Arm or disarm the wake alarm.
    SET_WAKEUP_TIME = encode(direction::WRITE, IOCTL_TYPE, 0x06, SetWakeupTime::SIZE),
}}

impl Command {
    /// Transfer direction bits.
    #[must_use]
    pub const fn direction(self) -> u32 {
        self.0 >> DIR_SHIFT
    }

    /// Ioctl type byte.
    #[must_use]
    pub const fn ty(self) -> u8 {
        (self.0 >> TYPE_SHIFT) as u8
    }

    /// Command number within the type.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0 as u8
    }

    /// Size of the request block this code declares.
    #[must_use]
    pub const fn size(self) -> usize {
        ((self.0 >> SIZE_SHIFT) & ((1 << SIZE_BITS) - 1)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid;

    const fn sample_time() -> WireTime {
        WireTime {
            year: 2024,
            month: 2,
            day: 29,
            hour: 23,
            minute: 59,
            second: 58,
            pad1: 0x11,
            nanosecond: 999_999_999,
            time_zone: -480,
            daylight: 0x03,
            pad2: 0x22,
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_sizes_match_c_layout() {
        assert_eq!(WireTime::SIZE, size_of::<WireTime>());
        assert_eq!(WireTimeCapabilities::SIZE, size_of::<WireTimeCapabilities>());
        assert_eq!(GetVariable::SIZE, size_of::<GetVariable>());
        assert_eq!(SetVariable::SIZE, size_of::<SetVariable>());
        assert_eq!(GetTime::SIZE, size_of::<GetTime>());
        assert_eq!(SetTime::SIZE, size_of::<SetTime>());
        assert_eq!(GetWakeupTime::SIZE, size_of::<GetWakeupTime>());
        assert_eq!(SetWakeupTime::SIZE, size_of::<SetWakeupTime>());
    }

    #[test]
    fn test_wire_time_offsets() {
        let mut bytes = [0; WireTime::SIZE];
        sample_time().write_to(&mut bytes).unwrap();
        assert_eq!(&bytes[0..2], &2024u16.to_ne_bytes());
        assert_eq!(&bytes[2..8], &[2, 29, 23, 59, 58, 0x11]);
        assert_eq!(&bytes[8..12], &999_999_999u32.to_ne_bytes());
        assert_eq!(&bytes[12..14], &(-480i16).to_ne_bytes());
        assert_eq!(&bytes[14..16], &[0x03, 0x22]);
        assert_eq!(WireTime::read_from(&bytes).unwrap(), sample_time());
    }

    #[test]
    fn test_variable_block_offsets() {
        let block = GetVariable {
            variable_name: 0x1000,
            vendor_guid: guid!("8be4df61-93ca-11d2-aa0d-00e098032b8c"),
            attributes: 0x7,
            data_size: 8,
            data: 0x2000,
        };
        let mut bytes = [0xff; GetVariable::SIZE];
        block.write_to(&mut bytes).unwrap();

        assert_eq!(&bytes[0..8], &0x1000u64.to_ne_bytes());
        assert_eq!(&bytes[8..24], &block.vendor_guid.to_bytes());
        assert_eq!(&bytes[24..28], &7u32.to_ne_bytes());
        assert_eq!(&bytes[28..32], &[0; 4], "padding is zeroed");
        assert_eq!(&bytes[32..40], &8u64.to_ne_bytes());
        assert_eq!(&bytes[40..48], &0x2000u64.to_ne_bytes());
        assert_eq!(GetVariable::read_from(&bytes).unwrap(), block);
    }

    #[test]
    fn test_time_block_offsets() {
        let block = GetTime {
            capabilities: WireTimeCapabilities {
                resolution: 1,
                accuracy: 50_000_000,
                sets_to_zero: Boolean::TRUE,
            },
            time: sample_time(),
        };
        let mut bytes = [0xff; GetTime::SIZE];
        block.write_to(&mut bytes).unwrap();
        assert_eq!(&bytes[8..12], &[1, 0, 0, 0]);
        assert_eq!(&bytes[12..14], &2024u16.to_ne_bytes());

        let wakeup = GetWakeupTime {
            enabled: Boolean::TRUE,
            pending: Boolean::FALSE,
            time: sample_time(),
        };
        let mut bytes = [0xff; GetWakeupTime::SIZE];
        wakeup.write_to(&mut bytes).unwrap();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(GetWakeupTime::read_from(&bytes).unwrap(), wakeup);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert_eq!(
            SetTime::read_from(&[0; 15]),
            Err(LayoutError {
                expected: 16,
                actual: 15
            })
        );
        let mut bytes = [0; 49];
        assert!(SetVariable::default().write_to(&mut bytes).is_err());
    }

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::GET_VARIABLE.0, 0xc030_7001);
        assert_eq!(Command::SET_VARIABLE.0, 0x4030_7002);
        assert_eq!(Command::GET_TIME.0, 0x801c_7003);
        assert_eq!(Command::SET_TIME.0, 0x4010_7004);
        assert_eq!(Command::GET_WAKEUP_TIME.0, 0x8014_7005);
        assert_eq!(Command::SET_WAKEUP_TIME.0, 0x4014_7006);

        let cmd = Command::SET_WAKEUP_TIME;
        assert_eq!(cmd.direction(), direction::WRITE);
        assert_eq!(cmd.ty(), b'p');
        assert_eq!(cmd.number(), 6);
        assert_eq!(cmd.size(), SetWakeupTime::SIZE);
    }
}
