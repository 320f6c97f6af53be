//! Minute-resolution points in time with a fixed iCalendar-style encoding.
//!
//! The wire form is `YYYYMMDDThhmmssZ`: sixteen ASCII characters, a literal
//! `T` at offset 8 and a literal `Z` at offset 15. Seconds are validated but
//! discarded, and no calendar validation is performed (month 13 parses fine).
//! Values compare lexicographically by (year, month, day, hour, minute).

use crate::error::{Result, SieveError};
use std::fmt;
use std::str::FromStr;

const ENCODED_LEN: usize = 16;

/// A point in time, ordered field by field.
///
/// Field order matters: the derived `Ord` compares year first, then month,
/// day, hour and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Time {
    pub fn new(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// `(year, month, day, hour, minute)`.
    pub fn as_tuple(&self) -> (u32, u32, u32, u32, u32) {
        (self.year, self.month, self.day, self.hour, self.minute)
    }

    /// Parse a `YYYYMMDDThhmmssZ` string.
    ///
    /// # Errors
    /// Returns `SieveError::InvalidTime` if the string has the wrong length,
    /// a numeric slice contains anything but ASCII digits, or either literal
    /// is missing.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != ENCODED_LEN || !s.is_ascii() {
            return Err(invalid(s));
        }
        let bytes = s.as_bytes();
        if bytes[8] != b'T' || bytes[15] != b'Z' {
            return Err(invalid(s));
        }

        let year = digits(s, 0, 4)?;
        let month = digits(s, 4, 6)?;
        let day = digits(s, 6, 8)?;
        let hour = digits(s, 9, 11)?;
        let minute = digits(s, 11, 13)?;
        // Seconds must be present and numeric but are not kept.
        digits(s, 13, 15)?;

        Ok(Self::new(year, month, day, hour, minute))
    }

    /// Canonical `YYYYMMDDThhmmssZ` encoding; seconds are always `00`.
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Human-readable `YYYY/MM/DD hh:mm`.
    pub fn human(&self) -> String {
        format!(
            "{:04}/{:02}/{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

fn invalid(s: &str) -> SieveError {
    SieveError::InvalidTime(format!(
        "'{}' is not in format YYYYMMDDThhmmssZ where 'T' and 'Z' are literals",
        s
    ))
}

/// Parse `s[start..end]` as an unsigned decimal made only of ASCII digits.
fn digits(s: &str, start: usize, end: usize) -> Result<u32> {
    let slice = &s[start..end];
    if !slice.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(s));
    }
    slice.parse().map_err(|_| invalid(s))
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}T{:02}{:02}00Z",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

impl FromStr for Time {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
