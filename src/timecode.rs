/*!
 * Millisecond clock values for subtitle timing.
 *
 * A `TimeCode` is the number of milliseconds since midnight, always within a
 * single day. All arithmetic is integer arithmetic so that repeated
 * transforms never drift. Adding an offset wraps around midnight, the way a
 * wall clock does.
 */

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::TimeCodeError;

/// Milliseconds in one day, the exclusive upper bound of a time code
pub const DAY_MS: i64 = 86_400_000;

const HOUR_MS: u32 = 3_600_000;
const MINUTE_MS: u32 = 60_000;
const SECOND_MS: u32 = 1_000;

// HH:MM:SS,mmm with exactly two/two/two/three digits
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

/// A point on the subtitle clock, in milliseconds since 00:00:00,000
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeCode(u32);

impl TimeCode {
    /// 00:00:00,000
    pub const MIDNIGHT: TimeCode = TimeCode(0);

    /// 23:59:59,999
    pub const MAX: TimeCode = TimeCode((DAY_MS - 1) as u32);

    /// Build a time code from its clock components
    pub fn from_hms_millis(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Result<Self, TimeCodeError> {
        if hours > 23 || minutes > 59 || seconds > 59 || millis > 999 {
            return Err(TimeCodeError::OutOfRange { hours, minutes, seconds, millis });
        }
        Ok(TimeCode(hours * HOUR_MS + minutes * MINUTE_MS + seconds * SECOND_MS + millis))
    }

    /// Build a time code from milliseconds since midnight
    pub fn from_millis(ms: i64) -> Result<Self, TimeCodeError> {
        if !(0..DAY_MS).contains(&ms) {
            return Err(TimeCodeError::MillisOutOfRange(ms));
        }
        Ok(TimeCode(ms as u32))
    }

    /// Milliseconds since midnight
    pub fn as_millis(self) -> u32 {
        self.0
    }

    pub fn hours(self) -> u32 {
        self.0 / HOUR_MS
    }

    pub fn minutes(self) -> u32 {
        (self.0 % HOUR_MS) / MINUTE_MS
    }

    pub fn seconds(self) -> u32 {
        (self.0 % MINUTE_MS) / SECOND_MS
    }

    pub fn millis(self) -> u32 {
        self.0 % SECOND_MS
    }

    /// Add a signed offset, wrapping around midnight in either direction
    pub fn add_millis(self, delta_ms: i64) -> Self {
        let wrapped = (self.0 as i64 + delta_ms).rem_euclid(DAY_MS);
        TimeCode(wrapped as u32)
    }

    /// Signed milliseconds from `self` to `other` (positive when `other` is later)
    pub fn millis_to(self, other: TimeCode) -> i64 {
        other.0 as i64 - self.0 as i64
    }

    /// Signed difference `b - a` in milliseconds
    pub fn difference(a: TimeCode, b: TimeCode) -> i64 {
        a.millis_to(b)
    }

    /// Parse an `HH:MM:SS,mmm` string
    pub fn parse(text: &str) -> Result<Self, TimeCodeError> {
        let caps = TIMECODE_REGEX
            .captures(text.trim())
            .ok_or_else(|| TimeCodeError::InvalidFormat(text.to_string()))?;

        // The regex only admits digits, so these parses cannot overflow
        let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);
        Self::from_hms_millis(field(1), field(2), field(3), field(4))
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.millis()
        )
    }
}

impl FromStr for TimeCode {
    type Err = TimeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for TimeCode {
    type Error = TimeCodeError;

    fn try_from(ms: u32) -> Result<Self, Self::Error> {
        Self::from_millis(ms as i64)
    }
}

impl From<TimeCode> for u32 {
    fn from(time: TimeCode) -> Self {
        time.0
    }
}
