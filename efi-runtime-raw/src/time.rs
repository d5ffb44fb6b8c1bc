// SPDX-License-Identifier: MIT OR Apache-2.0

//! The firmware time record.
//!
//! This is the layout the firmware's get/set-time and get/set-wakeup-time
//! services read and write. Callers of the gateway never see it; they use
//! [`WireTime`] instead, and the gateway converts between the two.
//!
//! [`WireTime`]: crate::ioctl::WireTime

#[cfg(feature = "time")]
pub use time_crate_integration::*;

use bitflags::bitflags;
use core::fmt::{self, Display, Formatter};

/// Date and time as kept by the firmware's real-time clock.
#[derive(Debug, Default, Copy, Clone, Eq)]
#[repr(C)]
pub struct Time {
    /// Year. Valid range: `1900..=9999`.
    pub year: u16,

    /// Month. Valid range: `1..=12`.
    pub month: u8,

    /// Day of the month. Valid range: `1..=31`.
    pub day: u8,

    /// Hour. Valid range: `0..=23`.
    pub hour: u8,

    /// Minute. Valid range: `0..=59`.
    pub minute: u8,

    /// Second. Valid range: `0..=59`.
    pub second: u8,

    /// Unused padding.
    pub pad1: u8,

    /// Nanosecond. Valid range: `0..=999_999_999`.
    pub nanosecond: u32,

    /// Offset in minutes from UTC. Valid range: `-1440..=1440`, or
    /// [`Time::UNSPECIFIED_TIMEZONE`].
    pub time_zone: i16,

    /// Daylight savings time information.
    pub daylight: Daylight,

    /// Unused padding.
    pub pad2: u8,
}

impl Time {
    /// Indicates the time should be interpreted as local time.
    pub const UNSPECIFIED_TIMEZONE: i16 = 0x07ff;

    /// Create an invalid `Time` with all fields set to zero.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            pad1: 0,
            nanosecond: 0,
            time_zone: 0,
            daylight: Daylight::empty(),
            pad2: 0,
        }
    }

    /// True if all fields are within valid ranges, false otherwise.
    ///
    /// This only checks each field on its own; February 30th passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1900..=9999).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
            && self.nanosecond <= 999_999_999
            && ((-1440..=1440).contains(&self.time_zone)
                || self.time_zone == Self::UNSPECIFIED_TIMEZONE)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:09}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.nanosecond
        )?;

        if self.time_zone == Self::UNSPECIFIED_TIMEZONE {
            f.write_str(" (local)")
        } else {
            let sign = if self.time_zone < 0 { '-' } else { '+' };
            let minutes = self.time_zone.unsigned_abs();
            write!(f, " UTC{sign}{:02}:{:02}", minutes / 60, minutes % 60)
        }
    }
}

/// The padding fields of `Time` are ignored for comparison.
impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year
            && self.month == other.month
            && self.day == other.day
            && self.hour == other.hour
            && self.minute == other.minute
            && self.second == other.second
            && self.nanosecond == other.nanosecond
            && self.time_zone == other.time_zone
            && self.daylight == other.daylight
    }
}

bitflags! {
    /// A bitmask containing daylight savings time information.
    ///
    /// Undefined bits are retained so that a value read from the clock can be
    /// written back unchanged.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Daylight: u8 {
        /// Daylight information not available or not applicable to the time
        /// zone.
        const NONE = 0;

        /// Time is affected by daylight savings time.
        const ADJUST_DAYLIGHT = 0x01;

        /// Time has been adjusted for daylight savings time.
        const IN_DAYLIGHT = 0x02;
    }
}

#[cfg(feature = "time")]
mod time_crate_integration {
    use super::*;
    use core::error;
    use time::{Date, Month, OffsetDateTime, UtcOffset};

    /// Errors converting between [`Time`] and [`OffsetDateTime`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum TimeConversionError {
        /// A field is outside the range [`Time::is_valid`] accepts.
        Invalid(Time),
        /// The fields are in range but name no calendar date (e.g. February
        /// 30th), or the offset is not representable.
        ComponentRange(time::error::ComponentRange),
        /// The year does not fit the firmware's `u16` year field.
        InvalidYear(i32),
        /// The firmware record stores offsets in whole minutes.
        OffsetWithSeconds(i8),
    }

    impl Display for TimeConversionError {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match self {
                Self::Invalid(t) => write!(f, "time fields out of range: {t}"),
                Self::ComponentRange(e) => write!(f, "not a calendar time: {e}"),
                Self::InvalidYear(y) => write!(f, "year {y} is not representable"),
                Self::OffsetWithSeconds(s) => {
                    write!(f, "time zone offset has seconds ({s})")
                }
            }
        }
    }

    impl error::Error for TimeConversionError {
        fn source(&self) -> Option<&(dyn error::Error + 'static)> {
            match self {
                Self::ComponentRange(e) => Some(e),
                _ => None,
            }
        }
    }

    impl Time {
        /// Converts this [`Time`] to an [`OffsetDateTime`].
        ///
        /// `local` is the offset used when the record's time zone is
        /// [`Time::UNSPECIFIED_TIMEZONE`]. Fails if a field is out of range or
        /// the fields do not name a real calendar date.
        pub fn to_offset_date_time(
            &self,
            local: UtcOffset,
        ) -> Result<OffsetDateTime, TimeConversionError> {
            if !self.is_valid() {
                return Err(TimeConversionError::Invalid(*self));
            }

            let offset = if self.time_zone == Self::UNSPECIFIED_TIMEZONE {
                Ok(local)
            } else {
                UtcOffset::from_whole_seconds(i32::from(self.time_zone) * 60)
            };

            let datetime: Result<OffsetDateTime, time::error::ComponentRange> = (|| {
                let month = Month::try_from(self.month)?;
                let date = Date::from_calendar_date(i32::from(self.year), month, self.day)?;
                let time = time::Time::from_hms_nano(
                    self.hour,
                    self.minute,
                    self.second,
                    self.nanosecond,
                )?;
                Ok(OffsetDateTime::new_in_offset(date, time, offset?))
            })();

            datetime.map_err(TimeConversionError::ComponentRange)
        }
    }

    impl TryFrom<OffsetDateTime> for Time {
        type Error = TimeConversionError;

        fn try_from(value: OffsetDateTime) -> Result<Self, Self::Error> {
            let year = value.year();
            let (h, m, s) = value.offset().as_hms();
            if s != 0 {
                return Err(TimeConversionError::OffsetWithSeconds(s));
            }

            let this = Self {
                year: u16::try_from(year).map_err(|_| TimeConversionError::InvalidYear(year))?,
                month: u8::from(value.month()),
                day: value.day(),
                hour: value.hour(),
                minute: value.minute(),
                second: value.second(),
                pad1: 0,
                nanosecond: value.nanosecond(),
                time_zone: i16::from(h) * 60 + i16::from(m),
                daylight: Daylight::NONE,
                pad2: 0,
            };

            if this.is_valid() {
                Ok(this)
            } else {
                Err(TimeConversionError::Invalid(this))
            }
        }
    }
}
