//! Trailing time windows used to scope aggregate queries.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

/// Default trailing window length in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Longest window accepted from callers.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Closed interval `[start, end]` of event timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering `length` up to and including `now`.
    pub fn trailing(length: Duration, now: DateTime<Utc>) -> Self {
        Self {
            start: now - length,
            end: now,
        }
    }

    /// Returns true if `at` falls inside the window, both bounds inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Errors produced when parsing a window length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowParseError {
    #[error("window must look like `7d`, `24h`, `90m` or a number of days, got `{0}`")]
    Malformed(String),

    #[error("window must be between 1 minute and {MAX_WINDOW_DAYS} days")]
    OutOfRange,
}

/// Length of a trailing window as accepted on the wire.
///
/// Parses `<n>d`, `<n>h`, `<n>m`, or a bare integer meaning days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec(Duration);

impl WindowSpec {
    /// Wraps a duration, enforcing the accepted range.
    pub fn new(length: Duration) -> Result<Self, WindowParseError> {
        if length < Duration::minutes(1) || length > Duration::days(MAX_WINDOW_DAYS) {
            return Err(WindowParseError::OutOfRange);
        }
        Ok(Self(length))
    }

    pub fn length(&self) -> Duration {
        self.0
    }

    /// Anchors the window at `now`.
    pub fn ending_at(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::trailing(self.0, now)
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self(Duration::days(DEFAULT_WINDOW_DAYS))
    }
}

impl FromStr for WindowSpec {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || WindowParseError::Malformed(s.to_string());

        let (digits, unit) = match trimmed.char_indices().last() {
            Some((idx, c)) if c.is_ascii_alphabetic() => (&trimmed[..idx], Some(c)),
            Some(_) => (trimmed, None),
            None => return Err(malformed()),
        };

        let amount: i64 = digits.parse().map_err(|_| malformed())?;

        let length = match unit.map(|c| c.to_ascii_lowercase()) {
            None | Some('d') => Duration::try_days(amount),
            Some('h') => Duration::try_hours(amount),
            Some('m') => Duration::try_minutes(amount),
            Some(_) => return Err(malformed()),
        }
        .ok_or(WindowParseError::OutOfRange)?;

        Self::new(length)
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.0.num_minutes();
        if minutes % (24 * 60) == 0 {
            write!(f, "{}d", minutes / (24 * 60))
        } else if minutes % 60 == 0 {
            write!(f, "{}h", minutes / 60)
        } else {
            write!(f, "{}m", minutes)
        }
    }
}
