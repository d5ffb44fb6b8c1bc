// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between the caller's [`WireTime`] and the firmware's [`Time`].
//!
//! Both directions copy field by field and never check ranges; rejecting a
//! bad date is the firmware's call. The reserved padding fields have no
//! meaning to the firmware, so a firmware record built from caller input
//! always has them zeroed, while a record coming back from the firmware
//! passes them through as they are.

use crate::ioctl::WireTime;
use crate::time::{Daylight, Time};

/// Builds a firmware time record from caller input.
#[must_use]
pub const fn to_firmware_time(wire: &WireTime) -> Time {
    Time {
        year: wire.year,
        month: wire.month,
        day: wire.day,
        hour: wire.hour,
        minute: wire.minute,
        second: wire.second,
        pad1: 0,
        nanosecond: wire.nanosecond,
        time_zone: wire.time_zone,
        daylight: Daylight::from_bits_retain(wire.daylight),
        pad2: 0,
    }
}

/// Builds the caller's view of a firmware time record.
#[must_use]
pub const fn to_wire_time(time: &Time) -> WireTime {
    WireTime {
        year: time.year,
        month: time.month,
        day: time.day,
        hour: time.hour,
        minute: time.minute,
        second: time.second,
        pad1: time.pad1,
        nanosecond: time.nanosecond,
        time_zone: time.time_zone,
        daylight: time.daylight.bits(),
        pad2: time.pad2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> [WireTime; 4] {
        [
            WireTime::default(),
            WireTime {
                year: 2024,
                month: 13,
                day: 0,
                hour: 25,
                minute: 61,
                second: 99,
                nanosecond: u32::MAX,
                time_zone: WireTime::UNSPECIFIED_TIMEZONE,
                daylight: 0xff,
                ..WireTime::default()
            },
            WireTime {
                year: 1900,
                month: 1,
                day: 1,
                time_zone: -1440,
                daylight: 0x01,
                pad1: 0x5a,
                pad2: 0xa5,
                ..WireTime::default()
            },
            WireTime {
                year: u16::MAX,
                month: 12,
                day: 31,
                hour: 23,
                minute: 59,
                second: 59,
                nanosecond: 999_999_999,
                time_zone: i16::MIN,
                daylight: 0x02,
                ..WireTime::default()
            },
        ]
    }

    #[test]
    fn test_round_trip_preserves_semantic_fields() {
        for wire in samples() {
            let back = to_wire_time(&to_firmware_time(&wire));
            assert_eq!(
                back,
                WireTime {
                    pad1: 0,
                    pad2: 0,
                    ..wire
                }
            );
        }
    }

    #[test]
    fn test_padding_is_zeroed_towards_firmware() {
        let time = to_firmware_time(&samples()[2]);
        assert_eq!((time.pad1, time.pad2), (0, 0));
        assert_eq!(time.daylight, Daylight::ADJUST_DAYLIGHT);
    }

    #[test]
    fn test_padding_passes_through_from_firmware() {
        let time = Time {
            pad1: 3,
            pad2: 4,
            daylight: Daylight::from_bits_retain(0x80),
            ..Time::invalid()
        };
        let wire = to_wire_time(&time);
        assert_eq!((wire.pad1, wire.pad2), (3, 4));
        assert_eq!(wire.daylight, 0x80);
    }
}
