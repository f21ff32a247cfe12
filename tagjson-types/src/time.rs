//! Time of day with a fixed UTC offset.
//!
//! chrono only offers a naive `NaiveTime`; an aware time of day has to carry
//! its own offset.

use crate::{Error, Result};
use chrono::{FixedOffset, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// A time of day that knows its UTC offset, e.g. `12:30:00+01:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: NaiveTime,
    offset: FixedOffset,
}

impl OffsetTime {
    /// Creates an aware time from a naive time and an offset.
    #[must_use]
    pub const fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// Creates an aware time from whole hours, minutes and seconds.
    ///
    /// Returns `None` if any component is out of range.
    #[must_use]
    pub fn from_hms(hour: u32, minute: u32, second: u32, offset: FixedOffset) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(|time| Self::new(time, offset))
    }

    /// The local time of day.
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// The UTC offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns true if the time has a fractional-second component.
    #[must_use]
    pub fn has_subsecond(&self) -> bool {
        self.time.nanosecond() != 0
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: FixedOffset) -> fmt::Result {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    write!(f, "{sign}{hours:02}:{minutes:02}")?;
    if seconds != 0 {
        write!(f, ":{seconds:02}")?;
    }
    Ok(())
}

fn parse_offset(s: &str) -> Result<FixedOffset> {
    let invalid = || Error::InvalidOffset(s.to_string());
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let mut parts = rest.split(':');
    let mut component = |max: u32| -> Result<Option<i32>> {
        match parts.next() {
            None => Ok(None),
            Some(p) if p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit()) => {
                let n: u32 = p.parse().map_err(|_| invalid())?;
                if n > max {
                    return Err(invalid());
                }
                Ok(Some(n as i32))
            }
            Some(_) => Err(invalid()),
        }
    };
    let hours = component(23)?.ok_or_else(invalid)?;
    let minutes = component(59)?.ok_or_else(invalid)?;
    let seconds = component(59)?.unwrap_or(0);
    if parts.next().is_some() {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60 + seconds)).ok_or_else(invalid)
}

/// Renders `HH:MM:SS±HH:MM`, with fractional seconds only when non-zero.
impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M:%S%.f"))?;
        write_offset(f, self.offset)
    }
}

impl FromStr for OffsetTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.find(['+', '-']) {
            Some(split) => {
                let (time, offset) = s.split_at(split);
                let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
                    .map_err(|e| Error::InvalidTime(format!("{s}: {e}")))?;
                Ok(Self::new(time, parse_offset(offset)?))
            }
            None => match NaiveTime::parse_from_str(s, "%H:%M:%S%.f") {
                Ok(_) => Err(Error::MissingOffset(s.to_string())),
                Err(e) => Err(Error::InvalidTime(format!("{s}: {e}"))),
            },
        }
    }
}
