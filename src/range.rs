use std::fmt;

use crate::consts::{
    DATE_SEPARATOR, DECEMBER, JANUARY, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR, NOW_KEYWORD, RANGE_SEPARATOR,
};
use crate::date::{CalendarDate, parse_digits};
use crate::math::days_in_month;

/// The valid date range of a picker (inclusive on both sides).
///
/// A missing side is unbounded. When both sides are present the minimum is
/// never after the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RangeLimits {
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
}

/// Error type for date range configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Minimum date is after maximum date.
    #[error("Invalid date range: min ({min}) is after max ({max})")]
    InvalidRange { min: CalendarDate, max: CalendarDate },

    /// Bound is neither empty, `now`, nor `YYYY[-MM[-DD]]`.
    #[error("Invalid range bound: {0}")]
    InvalidBound(String),

    /// Bound month outside 1-12.
    #[error("Invalid month {month} in range bound {bound}")]
    InvalidMonth { bound: String, month: u8 },

    /// Bound day outside the month.
    #[error("Invalid day {day} in range bound {bound}")]
    InvalidDay { bound: String, day: u8 },

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Min,
    Max,
}

impl RangeLimits {
    /// No limits at all.
    pub const UNBOUNDED: Self = Self { min: None, max: None };

    /// Creates limits from concrete bounds.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if min > max.
    pub fn new(min: Option<CalendarDate>, max: Option<CalendarDate>) -> Result<Self, RangeError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(RangeError::InvalidRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Parses a `MIN:MAX` range string, repairing whatever is malformed.
    ///
    /// Each side is empty (unbounded), `now` (today) or `YYYY[-MM[-DD]]`.
    /// A malformed side becomes unbounded, bad months and days become 1, and
    /// an inverted range becomes fully unbounded.
    pub fn parse(text: Option<&str>, today: CalendarDate) -> Self {
        let (limits, issues) = Self::resolve(text, today);
        for _issue in &issues {
            warn!("date range {text:?} repaired: {_issue}");
        }
        limits
    }

    /// Parses a `MIN:MAX` range string, failing on anything [`Self::parse`] would repair.
    ///
    /// # Errors
    /// Returns the first `RangeError` found.
    pub fn parse_strict(text: Option<&str>, today: CalendarDate) -> Result<Self, RangeError> {
        let (limits, issues) = Self::resolve(text, today);
        match issues.into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(limits),
        }
    }

    fn resolve(text: Option<&str>, today: CalendarDate) -> (Self, Vec<RangeError>) {
        let mut issues = Vec::new();
        let Some(text) = text.map(str::trim).filter(|s| !s.is_empty()) else {
            return (Self::UNBOUNDED, issues);
        };

        let mut parts = text.split(RANGE_SEPARATOR);
        let min_part = parts.next().unwrap_or_default();
        let max_part = parts.next().unwrap_or_default();
        let extra = parts.count();
        if extra > 0 {
            issues.push(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {}",
                extra + 1
            )));
        }

        let min = Self::resolve_bound(min_part, Side::Min, today, &mut issues);
        let max = Self::resolve_bound(max_part, Side::Max, today, &mut issues);

        match Self::new(min, max) {
            Ok(limits) => (limits, issues),
            Err(err) => {
                issues.push(err);
                (Self::UNBOUNDED, issues)
            },
        }
    }

    fn resolve_bound(
        token: &str,
        side: Side,
        today: CalendarDate,
        issues: &mut Vec<RangeError>,
    ) -> Option<CalendarDate> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if token.eq_ignore_ascii_case(NOW_KEYWORD) {
            return Some(today);
        }

        let Some((year, month, day)) = Self::split_bound(token) else {
            issues.push(RangeError::InvalidBound(token.to_owned()));
            return None;
        };
        if year < MIN_YEAR {
            issues.push(RangeError::InvalidBound(token.to_owned()));
            return None;
        }

        let (month, day) = match month {
            None => (
                match side {
                    Side::Min => JANUARY,
                    Side::Max => DECEMBER,
                },
                day,
            ),
            Some(m) if m == 0 || m > MAX_MONTH => {
                issues.push(RangeError::InvalidMonth {
                    bound: token.to_owned(),
                    month: m,
                });
                (JANUARY, Some(MIN_DAY))
            },
            Some(m) => (m, day),
        };

        let last_day = days_in_month(year, month);
        let day = match day {
            None => match side {
                Side::Min => MIN_DAY,
                Side::Max => last_day,
            },
            Some(d) if d == 0 || d > last_day => {
                issues.push(RangeError::InvalidDay {
                    bound: token.to_owned(),
                    day:   d,
                });
                MIN_DAY
            },
            Some(d) => d,
        };

        CalendarDate::new(year, month, day).ok()
    }

    /// Splits `YYYY[-M[M][-D[D]]]` into its numeric components.
    fn split_bound(token: &str) -> Option<(u16, Option<u8>, Option<u8>)> {
        let parts: Vec<&str> = token.split(DATE_SEPARATOR).collect();
        match parts.as_slice() {
            [y] => Some((parse_digits(y, 4, 4)?, None, None)),
            [y, m] => Some((parse_digits(y, 4, 4)?, Some(parse_digits(m, 1, 2)?), None)),
            [y, m, d] => Some((
                parse_digits(y, 4, 4)?,
                Some(parse_digits(m, 1, 2)?),
                Some(parse_digits(d, 1, 2)?),
            )),
            _ => None,
        }
    }

    /// Returns the lower bound, `None` when unbounded
    pub const fn min(&self) -> Option<CalendarDate> {
        self.min
    }

    /// Returns the upper bound, `None` when unbounded
    pub const fn max(&self) -> Option<CalendarDate> {
        self.max
    }

    pub fn min_year(&self) -> Option<u16> {
        self.min.map(|d| d.year())
    }

    pub fn min_month(&self) -> Option<u8> {
        self.min.map(|d| d.month())
    }

    pub fn min_day(&self) -> Option<u8> {
        self.min.map(|d| d.day())
    }

    pub fn max_year(&self) -> Option<u16> {
        self.max.map(|d| d.year())
    }

    pub fn max_month(&self) -> Option<u8> {
        self.max.map(|d| d.month())
    }

    pub fn max_day(&self) -> Option<u8> {
        self.max.map(|d| d.day())
    }

    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Earliest selectable year
    pub fn year_floor(&self) -> u16 {
        self.min_year().unwrap_or(MIN_YEAR)
    }

    /// Latest selectable year
    pub fn year_ceiling(&self) -> u16 {
        self.max_year().unwrap_or(MAX_YEAR)
    }

    /// Moves a date into the range, to the nearest bound if outside.
    pub fn clamp(&self, candidate: CalendarDate) -> CalendarDate {
        match (self.min, self.max) {
            (_, Some(max)) if candidate > max => max,
            (Some(min), _) if candidate < min => min,
            _ => candidate,
        }
    }

    /// Like [`Self::clamp`] for raw components; an impossible date becomes `today` first.
    pub fn clamp_parts(&self, year: u16, month: u8, day: u8, today: CalendarDate) -> CalendarDate {
        let candidate = CalendarDate::new(year, month, day).unwrap_or_else(|_err| {
            trace!("{year}-{month:02}-{day:02} is not a date ({_err}), falling back to {today}");
            today
        });
        self.clamp(candidate)
    }

    /// Checks if the range contains a given date
    pub fn contains_date(&self, date: CalendarDate) -> bool {
        self.min.is_none_or(|min| min <= date) && self.max.is_none_or(|max| date <= max)
    }

    /// Checks if the range contains the date given by its components.
    /// Impossible dates are never contained.
    pub fn contains(&self, year: u16, month: u8, day: u8) -> bool {
        CalendarDate::new(year, month, day).is_ok_and(|date| self.contains_date(date))
    }

    /// Checks if any day of the month lies within the range
    pub fn contains_month(&self, year: u16, month: u8) -> bool {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || month == 0 || month > MAX_MONTH {
            return false;
        }
        let ym = (year, month);
        self.min.is_none_or(|min| (min.year(), min.month()) <= ym)
            && self.max.is_none_or(|max| ym <= (max.year(), max.month()))
    }

    /// Checks if any day of the year lies within the range
    pub fn contains_year(&self, year: u16) -> bool {
        (self.year_floor()..=self.year_ceiling()).contains(&year)
    }

    /// Whether a month before `(year, month)` is selectable
    pub fn has_month_before(&self, year: u16, month: u8) -> bool {
        let floor = self.min.map_or((MIN_YEAR, JANUARY), |min| (min.year(), min.month()));
        (year, month) > floor
    }

    /// Whether a month after `(year, month)` is selectable
    pub fn has_month_after(&self, year: u16, month: u8) -> bool {
        let ceiling = self.max.map_or((MAX_YEAR, DECEMBER), |max| (max.year(), max.month()));
        (year, month) < ceiling
    }
}

/// Writes the range back in `MIN:MAX` form, leaving unbounded sides empty.
impl fmt::Display for RangeLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(min) = self.min {
            write!(f, "{min}")?;
        }
        write!(f, "{RANGE_SEPARATOR}")?;
        if let Some(max) = self.max {
            write!(f, "{max}")?;
        }
        Ok(())
    }
}

impl serde::Serialize for RangeLimits {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for RangeLimits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse_strict(Some(&s), CalendarDate::today()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: u16, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("test date must be valid")
    }

    fn today() -> CalendarDate {
        date(2013, 5, 20)
    }

    fn limits(text: &str) -> RangeLimits {
        RangeLimits::parse(Some(text), today())
    }

    #[test]
    fn test_parse_cases() {
        struct TestCase {
            text:        &'static str,
            min:         Option<(u16, u8, u8)>,
            max:         Option<(u16, u8, u8)>,
            description: &'static str,
        }

        let cases = [
            TestCase {
                text:        "2020-01-01:2020-12-31",
                min:         Some((2020, 1, 1)),
                max:         Some((2020, 12, 31)),
                description: "full dates on both sides",
            },
            TestCase {
                text:        "1990-08-25:2020-11",
                min:         Some((1990, 8, 25)),
                max:         Some((2020, 11, 30)),
                description: "max month without day ends on the last day",
            },
            TestCase {
                text:        "1990:2020",
                min:         Some((1990, 1, 1)),
                max:         Some((2020, 12, 31)),
                description: "year-only bounds",
            },
            TestCase {
                text:        "2020-2:2024-2",
                min:         Some((2020, 2, 1)),
                max:         Some((2024, 2, 29)),
                description: "single-digit months",
            },
            TestCase {
                text:        ":2020-06-15",
                min:         None,
                max:         Some((2020, 6, 15)),
                description: "empty min side",
            },
            TestCase {
                text:        "2020-06-15:",
                min:         Some((2020, 6, 15)),
                max:         None,
                description: "empty max side",
            },
            TestCase {
                text:        "2000",
                min:         Some((2000, 1, 1)),
                max:         None,
                description: "no separator means min only",
            },
            TestCase {
                text:        "NOW:",
                min:         Some((2013, 5, 20)),
                max:         None,
                description: "now keyword is case-insensitive",
            },
            TestCase {
                text:        "2010:now",
                min:         Some((2010, 1, 1)),
                max:         Some((2013, 5, 20)),
                description: "now on the max side",
            },
            TestCase {
                text:        "garbage:2020",
                min:         None,
                max:         Some((2020, 12, 31)),
                description: "malformed side becomes unbounded",
            },
            TestCase {
                text:        "2020-13-05:2021",
                min:         Some((2020, 1, 1)),
                max:         Some((2021, 12, 31)),
                description: "invalid month resets month and day to 1",
            },
            TestCase {
                text:        "2020-02-30:2021",
                min:         Some((2020, 2, 1)),
                max:         Some((2021, 12, 31)),
                description: "invalid day resets day to 1",
            },
            TestCase {
                text:        "2021:2020",
                min:         None,
                max:         None,
                description: "inverted range collapses to unbounded",
            },
            TestCase {
                text:        "2020-06-15:2020-06-14",
                min:         None,
                max:         None,
                description: "inverted by one day collapses to unbounded",
            },
            TestCase {
                text:        "0999:2020",
                min:         None,
                max:         Some((2020, 12, 31)),
                description: "year below four digits is unbounded",
            },
        ];

        for case in &cases {
            let parsed = limits(case.text);
            assert_eq!(parsed.min().map(|d| d.to_tuple()), case.min, "min for {}", case.description);
            assert_eq!(parsed.max().map(|d| d.to_tuple()), case.max, "max for {}", case.description);
        }
    }

    #[test]
    fn test_parse_none_and_empty_are_unbounded() {
        assert!(RangeLimits::parse(None, today()).is_unbounded());
        assert!(RangeLimits::parse(Some(""), today()).is_unbounded());
        assert!(RangeLimits::parse(Some(":"), today()).is_unbounded());
    }

    #[test]
    fn test_parse_strict_reports_repairs() {
        let ok = RangeLimits::parse_strict(Some("2020-01-01:2020-12-31"), today());
        assert!(ok.is_ok());

        assert!(matches!(
            RangeLimits::parse_strict(Some("garbage:2020"), today()),
            Err(RangeError::InvalidBound(_))
        ));
        assert!(matches!(
            RangeLimits::parse_strict(Some("2020-13:2021"), today()),
            Err(RangeError::InvalidMonth { month: 13, .. })
        ));
        assert!(matches!(
            RangeLimits::parse_strict(Some("2020-02-30:2021"), today()),
            Err(RangeError::InvalidDay { day: 30, .. })
        ));
        assert!(matches!(
            RangeLimits::parse_strict(Some("2021:2020"), today()),
            Err(RangeError::InvalidRange { .. })
        ));

        let err = RangeLimits::parse_strict(Some("2020:2021:2022"), today()).unwrap_err();
        assert!(err.to_string().contains("Too many ':' separators"));
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let result = RangeLimits::new(Some(date(2021, 1, 1)), Some(date(2020, 1, 1)));
        assert!(matches!(result, Err(RangeError::InvalidRange { .. })));

        let result = RangeLimits::new(Some(date(2020, 1, 1)), Some(date(2020, 1, 1)));
        assert!(result.is_ok());
    }

    #[test]
    fn test_component_accessors() {
        let parsed = limits("1990-08-25:2020-11-03");
        assert_eq!(
            (parsed.min_year(), parsed.min_month(), parsed.min_day()),
            (Some(1990), Some(8), Some(25))
        );
        assert_eq!(
            (parsed.max_year(), parsed.max_month(), parsed.max_day()),
            (Some(2020), Some(11), Some(3))
        );

        let open = RangeLimits::UNBOUNDED;
        assert_eq!(open.min_year(), None);
        assert_eq!(open.year_floor(), MIN_YEAR);
        assert_eq!(open.year_ceiling(), MAX_YEAR);
    }

    #[test]
    fn test_clamp_year_range() {
        let parsed = limits("2020-01-01:2020-12-31");
        assert_eq!(parsed.clamp(date(2021, 1, 1)), date(2020, 12, 31));
        assert_eq!(parsed.clamp(date(2019, 1, 1)), date(2020, 1, 1));
        assert_eq!(parsed.clamp(date(2020, 6, 15)), date(2020, 6, 15));
    }

    #[test]
    fn test_clamp_within_boundary_month() {
        let parsed = limits("2020-03-10:2020-09-20");
        assert_eq!(parsed.clamp(date(2020, 3, 5)), date(2020, 3, 10));
        assert_eq!(parsed.clamp(date(2020, 9, 25)), date(2020, 9, 20));
        assert_eq!(parsed.clamp(date(2020, 2, 28)), date(2020, 3, 10));
        assert_eq!(parsed.clamp(date(2020, 10, 1)), date(2020, 9, 20));
    }

    #[test]
    fn test_clamp_min_side_compares_min_year() {
        // A date in the min month of a later year is not below the minimum.
        let parsed = limits("2020-06-10:2022-03-01");
        assert_eq!(parsed.clamp(date(2021, 6, 1)), date(2021, 6, 1));
        assert_eq!(parsed.clamp(date(2021, 2, 1)), date(2021, 2, 1));
        assert_eq!(parsed.clamp(date(2020, 5, 31)), date(2020, 6, 10));
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let ranges = ["2020-01-01:2020-12-31", "2020-03-10:2020-09-20", ":2001-02", "1999-12-31:", ""];
        let candidates = [
            date(1000, 1, 1),
            date(1999, 12, 31),
            date(2000, 2, 29),
            date(2020, 3, 9),
            date(2020, 9, 21),
            date(2021, 1, 1),
            date(9999, 12, 31),
        ];
        for text in ranges {
            let parsed = limits(text);
            for candidate in candidates {
                let once = parsed.clamp(candidate);
                assert_eq!(parsed.clamp(once), once, "clamp({candidate}) for {text:?}");
                assert!(parsed.contains_date(once), "clamp({candidate}) inside {text:?}");
            }
        }
    }

    #[test]
    fn test_clamp_parts_falls_back_to_today() {
        let parsed = limits("2013-01-01:2013-12-31");
        assert_eq!(parsed.clamp_parts(2013, 2, 30, today()), today());
        assert_eq!(parsed.clamp_parts(2013, 13, 1, today()), today());
        assert_eq!(parsed.clamp_parts(2013, 2, 3, today()), date(2013, 2, 3));

        // Today itself is clamped into the range.
        let later = limits("2014-01-01:2014-12-31");
        assert_eq!(later.clamp_parts(2014, 0, 1, today()), date(2014, 1, 1));
    }

    #[test]
    fn test_contains() {
        let parsed = limits("2020-03-10:2020-09-20");
        assert!(parsed.contains(2020, 3, 10));
        assert!(parsed.contains(2020, 9, 20));
        assert!(!parsed.contains(2020, 3, 9));
        assert!(!parsed.contains(2020, 9, 21));
        assert!(!parsed.contains(2020, 2, 30));
        assert!(RangeLimits::UNBOUNDED.contains(1000, 1, 1));
    }

    #[test]
    fn test_contains_month_and_year() {
        let parsed = limits("2020-03-10:2021-09-20");
        assert!(!parsed.contains_month(2020, 2));
        assert!(parsed.contains_month(2020, 3));
        assert!(parsed.contains_month(2021, 9));
        assert!(!parsed.contains_month(2021, 10));
        assert!(!parsed.contains_month(2020, 13));

        assert!(!parsed.contains_year(2019));
        assert!(parsed.contains_year(2020));
        assert!(parsed.contains_year(2021));
        assert!(!parsed.contains_year(2022));
    }

    #[test]
    fn test_month_neighbours() {
        let parsed = limits("2020-03-10:2021-09-20");
        assert!(!parsed.has_month_before(2020, 3));
        assert!(parsed.has_month_before(2020, 4));
        assert!(parsed.has_month_after(2021, 8));
        assert!(!parsed.has_month_after(2021, 9));

        assert!(!RangeLimits::UNBOUNDED.has_month_before(MIN_YEAR, 1));
        assert!(!RangeLimits::UNBOUNDED.has_month_after(MAX_YEAR, 12));
    }

    #[test]
    fn test_display() {
        assert_eq!(limits("2020-1-5:2020-12").to_string(), "2020-01-05:2020-12-31");
        assert_eq!(limits(":2020").to_string(), ":2020-12-31");
        assert_eq!(RangeLimits::UNBOUNDED.to_string(), ":");
    }

    #[test]
    fn test_serde() {
        let parsed = limits("2020-01-01:");
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, r#""2020-01-01:""#);

        let restored: RangeLimits = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, restored);

        let result: Result<RangeLimits, _> = serde_json::from_str(r#""2021:2020""#);
        assert!(result.is_err());
    }
}
