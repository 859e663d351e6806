//! The date picker engine.
//!
//! A [`DatePicker`] owns its [`CalendarState`], applies [`Command`]s to it,
//! notifies the host through [`Hooks`] and renders the current [`View`]. All
//! operations are synchronous and run in order; every command leaves the state
//! valid against the picker's [`RangeLimits`].

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, Hooks, Options};
use crate::consts::{MAX_MONTH, MIN_DAY, YEARS_PER_PAGE};
use crate::date::{CalendarDate, parse_digits, split_iso};
use crate::format::{Pattern, is_valid_date};
use crate::grid::{View, build_view, can_step_month, page_reachable};
use crate::prelude::*;
use crate::range::RangeLimits;
use crate::state::{CalendarState, Step, ViewMode, decade_of};

/// The cursor left a month, either by arrow navigation or by picking a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthSelected {
    pub year:  u16,
    pub month: u8,
}

/// A year was picked in year view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearSelected {
    pub year: u16,
}

/// A date was adopted as the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateSet {
    pub date: CalendarDate,
}

/// Any host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    MonthSelected(MonthSelected),
    YearSelected(YearSelected),
    DateSet(DateSet),
}

/// A user intent applied through [`DatePicker::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    NavigateMonth { step: Step },
    OpenYearPicker { decade_offset: i32 },
    OpenMonthPicker,
    ShowDayView,
    PickDay { day: u8 },
    PickMonth { month: u8 },
    PickYear { year: u16 },
    SetFromText { text: String },
    SetFromFields { year: String, month: String, day: String },
    SetDate { iso: String },
    Clear,
}

/// What [`DatePicker::set_from_text`] did with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOutcome {
    /// The text matched the pattern; holds the (clamped) date adopted.
    Parsed(CalendarDate),
    /// The text did not parse; holds the fallback date adopted instead.
    Fallback(CalendarDate),
}

/// Heading of the day view, e.g. "October 2013".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[display(fmt = "{} {:04}", month, year)]
pub struct Caption<'a> {
    pub month: &'a str,
    pub year:  u16,
}

#[derive(Debug)]
pub struct DatePicker {
    pattern:        Pattern,
    limits:         RangeLimits,
    start_week_day: u8,
    month_names:    Vec<String>,
    weekday_names:  Vec<String>,
    today:          CalendarDate,
    /// Adopted when text input does not parse.
    fallback:       CalendarDate,
    state:          CalendarState,
    hooks:          Hooks,
}

impl DatePicker {
    /// Builds a picker from its options. No notification fires during construction.
    ///
    /// # Errors
    /// Returns `ConfigError` for an invalid week start, wrongly sized name
    /// tables, an unusable format, or a malformed range under `strict_range`.
    pub fn new(options: Options, hooks: Hooks) -> Result<Self, ConfigError> {
        options.validate()?;
        let pattern = Pattern::from_config(&options.format)?;
        let today = options.today.unwrap_or_else(CalendarDate::today);
        let range = options.date_range.as_deref();
        let limits = if options.strict_range {
            RangeLimits::parse_strict(range, today)?
        } else {
            RangeLimits::parse(range, today)
        };

        let selected = Self::initial_selection(&options, &pattern, &limits, today);
        let fallback = selected.unwrap_or_else(|| limits.clamp(today));
        debug!("new picker: format {pattern}, range {limits}, today {today}, selected {selected:?}");

        Ok(Self {
            pattern,
            limits,
            start_week_day: options.start_week_day,
            month_names: options.month_names,
            weekday_names: options.weekday_names,
            today,
            fallback,
            state: CalendarState::new(fallback, selected),
            hooks,
        })
    }

    fn initial_selection(
        options: &Options,
        pattern: &Pattern,
        limits: &RangeLimits,
        today: CalendarDate,
    ) -> Option<CalendarDate> {
        if let Some(start) = options.start_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match split_iso(start) {
                Some((year, month, day)) => return Some(limits.clamp_parts(year, month, day, today)),
                None => {
                    warn!("ignoring start date {start:?}: expected YYYY-MM-DD");
                },
            }
        }

        let value = options.value.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let parsed = pattern.parse(value).map(|date| limits.clamp(date));
        if parsed.is_none() {
            warn!("ignoring initial value {value:?}: does not match {pattern}");
        }
        parsed
    }

    pub const fn state(&self) -> &CalendarState {
        &self.state
    }

    pub const fn limits(&self) -> &RangeLimits {
        &self.limits
    }

    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub const fn today(&self) -> CalendarDate {
        self.today
    }

    pub const fn start_week_day(&self) -> u8 {
        self.start_week_day
    }

    pub const fn selected(&self) -> Option<CalendarDate> {
        self.state.selected()
    }

    /// The selection rendered with the configured pattern, `None` when empty
    pub fn text(&self) -> Option<String> {
        self.state.selected().map(|date| self.pattern.format(date))
    }

    /// The configured name of `month` (1-12)
    pub fn month_name(&self, month: u8) -> Option<&str> {
        let index = usize::from(month).checked_sub(1)?;
        self.month_names.get(index).map(String::as_str)
    }

    /// The configured name of `weekday` (0 = Sunday)
    pub fn weekday_name(&self, weekday: u8) -> Option<&str> {
        self.weekday_names.get(usize::from(weekday)).map(String::as_str)
    }

    /// Column headings of the day grid in display order.
    pub fn weekday_labels(&self) -> Vec<&str> {
        let days = self.weekday_names.len();
        (0..days)
            .map(|i| self.weekday_names[(i + usize::from(self.start_week_day)) % days].as_str())
            .collect()
    }

    /// Heading for the cursor month.
    pub fn caption(&self) -> Caption<'_> {
        Caption {
            month: self.month_name(self.state.cursor_month()).unwrap_or_default(),
            year:  self.state.cursor_year(),
        }
    }

    /// Whether [`Self::navigate_month`] would move in `step`.
    pub fn can_navigate_month(&self, step: Step) -> bool {
        self.state.view_mode() == ViewMode::Day
            && self.state.neighbour_month(step).is_some()
            && can_step_month(&self.state, &self.limits, step)
    }

    /// The grid for the current view mode.
    pub fn render(&self) -> View {
        build_view(&self.state, &self.limits, self.start_week_day, |date| {
            self.hooks.accepts_day(date)
        })
    }

    /// Applies `command` and renders the resulting view.
    pub fn dispatch(&mut self, command: Command) -> View {
        debug!("dispatch {command:?}");
        match command {
            Command::NavigateMonth { step } => {
                self.navigate_month(step);
            },
            Command::OpenYearPicker { decade_offset } => {
                self.open_year_picker(decade_offset);
            },
            Command::OpenMonthPicker => self.open_month_picker(),
            Command::ShowDayView => self.show_day_view(),
            Command::PickDay { day } => {
                self.pick_day(day);
            },
            Command::PickMonth { month } => {
                self.pick_month(month);
            },
            Command::PickYear { year } => {
                self.pick_year(year);
            },
            Command::SetFromText { text } => {
                self.set_from_text(&text);
            },
            Command::SetFromFields { year, month, day } => {
                self.set_from_fields(&year, &month, &day);
            },
            Command::SetDate { iso } => {
                self.set_date(&iso);
            },
            Command::Clear => self.clear(),
        }
        self.render()
    }

    /// Moves the day view one month back or forward.
    ///
    /// Refused outside day view and when the neighbouring month lies wholly
    /// outside the limits. On success the month being left is reported.
    pub fn navigate_month(&mut self, step: Step) -> bool {
        if !self.can_navigate_month(step) {
            trace!("navigate {step:?} refused at {:04}-{:02}", self.state.cursor_year(), self.state.cursor_month());
            return false;
        }
        let Some((year, month)) = self.state.neighbour_month(step) else {
            return false;
        };
        let left = MonthSelected {
            year:  self.state.cursor_year(),
            month: self.state.cursor_month(),
        };
        self.state.set_cursor(year, month);
        self.notify(left);
        true
    }

    /// Switches to year view, `decade_offset` pages away from the current one.
    ///
    /// Outside year view the current page is the decade of the cursor year.
    /// Paging onto a page without any selectable year is refused.
    pub fn open_year_picker(&mut self, decade_offset: i32) -> bool {
        let base = match self.state.view_mode() {
            ViewMode::Year => self.state.year_page_start(),
            _ => decade_of(self.state.cursor_year()),
        };
        let start = if decade_offset == 0 {
            Some(base)
        } else {
            decade_offset
                .checked_mul(i32::from(YEARS_PER_PAGE))
                .and_then(|shift| shift.checked_add(i32::from(base)))
                .and_then(|start| u16::try_from(start).ok())
                .filter(|&start| page_reachable(start, &self.limits))
        };
        let Some(start) = start else {
            trace!("year page {base} {decade_offset:+} refused");
            return false;
        };
        self.state.set_year_page_start(start);
        self.state.set_view_mode(ViewMode::Year);
        true
    }

    pub fn open_month_picker(&mut self) {
        self.state.set_view_mode(ViewMode::Month);
    }

    pub fn show_day_view(&mut self) {
        self.state.set_view_mode(ViewMode::Day);
    }

    /// Picks a year from year view and continues in month view.
    pub fn pick_year(&mut self, year: u16) -> bool {
        if !self.limits.contains_year(year) {
            trace!("year {year} is outside {}", self.limits);
            return false;
        }
        self.state.set_cursor_year(year);
        self.state.set_year_page_start(decade_of(year));
        self.state.set_view_mode(ViewMode::Month);
        self.notify(YearSelected { year });
        true
    }

    /// Picks a month of the cursor year and continues in day view.
    pub fn pick_month(&mut self, month: u8) -> bool {
        let year = self.state.cursor_year();
        if !self.limits.contains_month(year, month) {
            trace!("month {year:04}-{month:02} is outside {}", self.limits);
            return false;
        }
        self.state.set_cursor_month(month);
        self.state.set_view_mode(ViewMode::Day);
        self.notify(MonthSelected { year, month });
        true
    }

    /// Picks a day of the cursor month.
    ///
    /// Days outside the limits are clamped onto the nearest bound, impossible
    /// days onto today. The pick is refused when the day predicate rejects
    /// the date that would be adopted.
    pub fn pick_day(&mut self, day: u8) -> bool {
        let (year, month) = (self.state.cursor_year(), self.state.cursor_month());
        let date = self.limits.clamp_parts(year, month, day, self.today);
        if !self.hooks.accepts_day(date) {
            trace!("day {date} rejected by predicate");
            return false;
        }
        self.adopt(date);
        true
    }

    /// Adopts typed text.
    ///
    /// Text that does not parse with the configured pattern, empty text
    /// included, adopts the last adopted date, or today clamped into the
    /// limits when nothing was adopted yet. Use [`Self::clear`] to empty the
    /// selection.
    pub fn set_from_text(&mut self, text: &str) -> TextOutcome {
        let text = text.trim();
        match self.pattern.parse(text) {
            Some(date) => {
                let date = self.limits.clamp(date);
                self.adopt(date);
                TextOutcome::Parsed(date)
            },
            None => {
                let date = self.fallback;
                debug!("{text:?} does not match {}, falling back to {date}", self.pattern);
                self.adopt(date);
                TextOutcome::Fallback(date)
            },
        }
    }

    /// Adopts a `YYYY-M[M]-D[D]` date, clamped into the limits.
    ///
    /// An impossible date such as `2023-02-30` is replaced by today. Text of
    /// any other shape is refused.
    pub fn set_date(&mut self, iso: &str) -> bool {
        let Some((year, month, day)) = split_iso(iso.trim()) else {
            trace!("set_date refused {iso:?}");
            return false;
        };
        let date = self.limits.clamp_parts(year, month, day, self.today);
        self.adopt(date);
        true
    }

    /// Adopts a date entered as three separate fields.
    ///
    /// A complete valid date is adopted as by [`Self::set_date`]. A valid year
    /// and month with an unusable day only move the cursor there.
    pub fn set_from_fields(&mut self, year: &str, month: &str, day: &str) -> bool {
        let year = parse_digits::<u16>(year.trim(), 4, 4);
        let month = parse_digits::<u8>(month.trim(), 1, 2).filter(|m| (1..=MAX_MONTH).contains(m));
        let day = parse_digits::<u8>(day.trim(), 1, 2);

        match (year, month, day) {
            (Some(year), Some(month), Some(day)) if is_valid_date(year, month, day) => {
                let date = self.limits.clamp_parts(year, month, day, self.today);
                self.adopt(date);
                true
            },
            (Some(year), Some(month), _) if is_valid_date(year, month, MIN_DAY) => {
                let target = self.limits.clamp_parts(year, month, MIN_DAY, self.today);
                self.state.set_cursor(target.year(), target.month());
                self.state.set_view_mode(ViewMode::Day);
                true
            },
            _ => {
                trace!("set_from_fields refused");
                false
            },
        }
    }

    /// Empties the selection; the cursor stays where it is.
    pub fn clear(&mut self) {
        self.state.clear_selection();
    }

    fn adopt(&mut self, date: CalendarDate) {
        self.state.select(date);
        self.state.set_view_mode(ViewMode::Day);
        self.fallback = date;
        self.notify(DateSet { date });
    }

    fn notify(&mut self, notification: impl Into<Notification>) {
        let notification = notification.into();
        debug!("notify {notification:?}");
        match notification {
            Notification::MonthSelected(event) => {
                if let Some(listener) = self.hooks.on_month_selected.as_mut() {
                    listener(event);
                }
            },
            Notification::YearSelected(event) => {
                if let Some(listener) = self.hooks.on_year_selected.as_mut() {
                    listener(event);
                }
            },
            Notification::DateSet(event) => {
                if let Some(listener) = self.hooks.on_set_date.as_mut() {
                    listener(event);
                }
            },
        }
    }
}
