use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DAYS_PER_WEEK, DEFAULT_START_WEEK_DAY, MAX_MONTH, MONTH_NAMES, WEEKDAY_NAMES};
use crate::date::CalendarDate;
use crate::format::{DateFormat, FormatError};
use crate::picker::{DateSet, MonthSelected, YearSelected};
use crate::range::RangeError;

/// Construction options of a [`DatePicker`](crate::DatePicker).
///
/// Every field has a default, so a partial JSON object deserializes into a
/// complete set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// A format alias such as `yyyy-mm-dd` or a raw token pattern such as `d.m.Y`.
    ///
    /// Two-digit years (`yy`, `y`) are read back within 1970-2069, so a
    /// selection outside that window does not survive its own text.
    pub format:         String,
    /// `MIN:MAX` limits; see [`RangeLimits::parse`](crate::RangeLimits::parse).
    pub date_range:     Option<String>,
    /// Reject a malformed `date_range` instead of repairing it.
    pub strict_range:   bool,
    /// First column of the day grid, 0 = Sunday.
    pub start_week_day: u8,
    /// Initial selection as `YYYY-MM-DD`, preferred over `value`.
    pub start_date:     Option<String>,
    /// Initial text, parsed with `format`.
    pub value:          Option<String>,
    pub month_names:    Vec<String>,
    /// Sunday first.
    pub weekday_names:  Vec<String>,
    /// Overrides the system date.
    pub today:          Option<CalendarDate>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format:         DateFormat::default().alias().to_owned(),
            date_range:     None,
            strict_range:   false,
            start_week_day: DEFAULT_START_WEEK_DAY,
            start_date:     None,
            value:          None,
            month_names:    MONTH_NAMES.iter().map(|&name| name.to_owned()).collect(),
            weekday_names:  WEEKDAY_NAMES.iter().map(|&name| name.to_owned()).collect(),
            today:          None,
        }
    }
}

impl Options {
    /// Checks the fields that cannot be repaired.
    ///
    /// # Errors
    /// Returns `ConfigError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_week_day >= DAYS_PER_WEEK {
            return Err(ConfigError::InvalidStartWeekDay(self.start_week_day));
        }
        if self.month_names.len() != usize::from(MAX_MONTH) {
            return Err(ConfigError::MonthNames(self.month_names.len()));
        }
        if self.weekday_names.len() != usize::from(DAYS_PER_WEEK) {
            return Err(ConfigError::WeekdayNames(self.weekday_names.len()));
        }
        Ok(())
    }
}

/// Error type for picker construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid start week day: {0} (must be 0-6)")]
    InvalidStartWeekDay(u8),

    #[error("Expected {max} month names, found {0}", max = MAX_MONTH)]
    MonthNames(usize),

    #[error("Expected {max} weekday names, found {0}", max = DAYS_PER_WEEK)]
    WeekdayNames(usize),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Range(#[from] RangeError),
}

pub type DayPredicate = Box<dyn Fn(CalendarDate) -> bool>;
pub type Listener<E> = Box<dyn FnMut(E)>;

/// Host callbacks of a picker.
#[derive(Default)]
pub struct Hooks {
    pub(crate) valid_day:         Option<DayPredicate>,
    pub(crate) on_month_selected: Option<Listener<MonthSelected>>,
    pub(crate) on_year_selected:  Option<Listener<YearSelected>>,
    pub(crate) on_set_date:       Option<Listener<DateSet>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Days rejected by `predicate` are disabled in the day grid and cannot be picked.
    #[must_use]
    pub fn valid_day(mut self, predicate: impl Fn(CalendarDate) -> bool + 'static) -> Self {
        self.valid_day = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn on_month_selected(mut self, listener: impl FnMut(MonthSelected) + 'static) -> Self {
        self.on_month_selected = Some(Box::new(listener));
        self
    }

    #[must_use]
    pub fn on_year_selected(mut self, listener: impl FnMut(YearSelected) + 'static) -> Self {
        self.on_year_selected = Some(Box::new(listener));
        self
    }

    #[must_use]
    pub fn on_set_date(mut self, listener: impl FnMut(DateSet) + 'static) -> Self {
        self.on_set_date = Some(Box::new(listener));
        self
    }

    /// Whether `date` passes the day predicate, if any.
    pub fn accepts_day(&self, date: CalendarDate) -> bool {
        self.valid_day.as_ref().is_none_or(|predicate| predicate(date))
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("valid_day", &self.valid_day.is_some())
            .field("on_month_selected", &self.on_month_selected.is_some())
            .field("on_year_selected", &self.on_year_selected.is_some())
            .field("on_set_date", &self.on_set_date.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::weekday_of;

    #[test]
    fn test_default_options_are_valid() {
        let options = Options::default();
        assert_eq!(options.format, "yyyy-mm-dd");
        assert_eq!(options.start_week_day, 1);
        assert_eq!(options.month_names.len(), 12);
        assert_eq!(options.weekday_names[0], "Sunday");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        struct TestCase {
            options:  Options,
            expected: ConfigError,
        }

        let test_cases = [
            TestCase {
                options:  Options {
                    start_week_day: 7,
                    ..Options::default()
                },
                expected: ConfigError::InvalidStartWeekDay(7),
            },
            TestCase {
                options:  Options {
                    month_names: vec!["Jan".to_owned()],
                    ..Options::default()
                },
                expected: ConfigError::MonthNames(1),
            },
            TestCase {
                options:  Options {
                    weekday_names: Vec::new(),
                    ..Options::default()
                },
                expected: ConfigError::WeekdayNames(0),
            },
        ];

        for case in test_cases {
            assert_eq!(case.options.validate(), Err(case.expected));
        }
    }

    #[test]
    fn test_deserialize_partial_json() {
        let options: Options = serde_json::from_str(
            r#"{"format": "dd/mm/yyyy", "date_range": "2020-07-10:now", "today": "2021-03-04"}"#,
        )
        .unwrap();
        assert_eq!(options.format, "dd/mm/yyyy");
        assert_eq!(options.date_range.as_deref(), Some("2020-07-10:now"));
        assert_eq!(options.today, CalendarDate::new(2021, 3, 4).ok());
        assert_eq!(options.start_week_day, 1);
        assert!(!options.strict_range);
        assert_eq!(options.month_names[11], "December");
    }

    #[test]
    fn test_deserialize_rejects_bad_today() {
        let result: Result<Options, _> = serde_json::from_str(r#"{"today": "2021-02-30"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hooks_predicate() {
        let weekend = CalendarDate::new(2024, 1, 6).unwrap();
        let weekday = CalendarDate::new(2024, 1, 8).unwrap();

        assert!(Hooks::new().accepts_day(weekend));

        let hooks =
            Hooks::new().valid_day(|date| weekday_of(date.year(), date.month(), date.day()) % 6 != 0);
        assert!(!hooks.accepts_day(weekend));
        assert!(hooks.accepts_day(weekday));
    }

    #[test]
    fn test_hooks_debug_lists_installed() {
        let hooks = Hooks::new().on_set_date(|_| {});
        let debug = format!("{hooks:?}");
        assert!(debug.contains("on_set_date: true"));
        assert!(debug.contains("valid_day: false"));
    }
}
