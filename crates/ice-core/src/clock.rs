//! Period-local `mm:ss` clock values.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Pre-compiled regex for `mm:ss` clock strings.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+):([0-9]{2})$").unwrap());

/// Errors from parsing a clock string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The value is not of the form `mm:ss`.
    #[error("not a mm:ss time: {0:?}")]
    Malformed(String),
    /// The seconds component is 60 or more.
    #[error("seconds out of range in {0:?}")]
    SecondsOutOfRange(String),
    /// The value does not fit in a `u32` second count.
    #[error("time too large: {0:?}")]
    Overflow(String),
}

/// A non-negative clock reading stored as total seconds.
///
/// Arithmetic is done on the total, so subtracting `01:45` from `10:30`
/// borrows across the minute boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Whole minutes, as written in the `mm` component.
    pub const fn minutes(self) -> u32 {
        self.0 / 60
    }

    /// Parses a field that uses the empty string as the missing sentinel.
    pub fn parse_optional(value: &str) -> Result<Option<Self>, ClockError> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }

    /// Returns `self - other`, or `None` if it would go below zero.
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(seconds) => Some(Self(seconds)),
            None => None,
        }
    }

    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(caps) = CLOCK_RE.captures(trimmed) else {
            return Err(ClockError::Malformed(s.to_string()));
        };

        let minutes: u32 = caps[1]
            .parse()
            .map_err(|_| ClockError::Overflow(s.to_string()))?;
        let seconds: u32 = caps[2]
            .parse()
            .map_err(|_| ClockError::Malformed(s.to_string()))?;
        if seconds >= 60 {
            return Err(ClockError::SecondsOutOfRange(s.to_string()));
        }

        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .map(Self)
            .ok_or_else(|| ClockError::Overflow(s.to_string()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
