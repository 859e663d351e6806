use std::str::FromStr;

use crate::consts::{DATE_SEPARATOR, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR};
use crate::math::days_in_month;
use crate::prelude::*;

/// A concrete calendar date, always normalized.
///
/// The year is a four-digit year (`MIN_YEAR..=MAX_YEAR`), the month is
/// `1..=12` and the day never exceeds the length of its month. Ordering is
/// lexicographic over (year, month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct CalendarDate {
    year:  u16,
    month: u8,
    day:   u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Creates a validated date.
    ///
    /// # Errors
    /// Returns the `DateError` variant naming the first offending component.
    pub const fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(DateError::InvalidYear(year));
        }
        if month == 0 || month > MAX_MONTH {
            return Err(DateError::InvalidMonth(month));
        }
        if day < MIN_DAY || day > days_in_month(year, month) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Today's date in the system time zone.
    pub fn today() -> Self {
        let now = jiff::Zoned::now().date();
        let parts = (
            u16::try_from(now.year()),
            u8::try_from(now.month()),
            u8::try_from(now.day()),
        );
        match parts {
            (Ok(year), Ok(month), Ok(day)) => match Self::new(year, month, day) {
                Ok(date) => date,
                Err(_err) => {
                    warn!("system date {now} is not representable ({_err}), using {}", Self::MIN);
                    Self::MIN
                }
            },
            _ => {
                warn!("system date {now} is not representable, using {}", Self::MIN);
                Self::MIN
            }
        }
    }

    /// The earliest representable date.
    pub const MIN: Self = Self {
        year:  MIN_YEAR,
        month: 1,
        day:   1,
    };

    /// The latest representable date.
    pub const MAX: Self = Self {
        year:  MAX_YEAR,
        month: 12,
        day:   31,
    };

    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the date as a (year, month, day) tuple
    pub const fn to_tuple(&self) -> (u16, u8, u8) {
        (self.year, self.month, self.day)
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = DateError;

    fn try_from((year, month, day): (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(year, month, day)
    }
}

impl From<CalendarDate> for (u16, u8, u8) {
    fn from(date: CalendarDate) -> Self {
        date.to_tuple()
    }
}

/// Parses `YYYY-M-D`, month and day taking one or two digits.
impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let (year, month, day) = split_iso(trimmed).ok_or_else(|| {
            DateError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed}"
            ))
        })?;
        Self::new(year, month, day)
    }
}

/// Parses `s` if it is between `min_len` and `max_len` ASCII digits.
pub(crate) fn parse_digits<T: FromStr>(s: &str, min_len: usize, max_len: usize) -> Option<T> {
    if !(min_len..=max_len).contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Splits `YYYY-M[M]-D[D]` into raw components without validating the date.
pub(crate) fn split_iso(s: &str) -> Option<(u16, u8, u8)> {
    let mut parts = s.split(DATE_SEPARATOR);
    let year = parse_digits(parts.next()?, 4, 4)?;
    let month = parse_digits(parts.next()?, 1, 2)?;
    let day = parse_digits(parts.next()?, 1, 2)?;
    if parts.next().is_some() {
        return None;
    }
    Some((year, month, day))
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
