//! Renderable grids for the three view modes.
//!
//! Every builder is a pure function of the picker state and its limits; the
//! result is rebuilt on each render and never stored.

use serde::Serialize;

use crate::consts::{DAYS_PER_WEEK, MAX_MONTH, MAX_YEAR, MIN_YEAR, YEARS_PER_PAGE};
use crate::date::CalendarDate;
use crate::math::{days_in_month, weekday_of};
use crate::range::RangeLimits;
use crate::state::{CalendarState, Step, ViewMode};

const WEEK: usize = DAYS_PER_WEEK as usize;
const PAGE: usize = YEARS_PER_PAGE as usize;

/// One selectable entry: a day of the month, a month number or a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridCell {
    pub value:    u16,
    pub disabled: bool,
    pub selected: bool,
}

/// One week row; `None` marks padding before the 1st or after the last day.
pub type Week = [Option<GridCell>; WEEK];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGrid {
    pub year:           u16,
    pub month:          u8,
    /// Weekday index (0 = Sunday) of each column
    pub weekdays:       [u8; WEEK],
    pub weeks:          Vec<Week>,
    pub has_prev_month: bool,
    pub has_next_month: bool,
}

impl DayGrid {
    /// All cells row by row, padding included
    pub fn cells(&self) -> impl Iterator<Item = &Option<GridCell>> {
        self.weeks.iter().flatten()
    }

    /// The cell of a given day of the month
    pub fn day(&self, day: u8) -> Option<GridCell> {
        self.cells().flatten().find(|cell| cell.value == u16::from(day)).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year:   u16,
    pub months: [GridCell; MAX_MONTH as usize],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGrid {
    pub years:         [GridCell; PAGE],
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

/// The grid of the active view mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum View {
    Day(DayGrid),
    Month(MonthGrid),
    Year(YearGrid),
}

impl View {
    pub const fn mode(&self) -> ViewMode {
        match self {
            Self::Day(_) => ViewMode::Day,
            Self::Month(_) => ViewMode::Month,
            Self::Year(_) => ViewMode::Year,
        }
    }
}

/// Builds the grid for whatever mode `state` is in.
pub fn build_view<F>(state: &CalendarState, limits: &RangeLimits, start_week_day: u8, valid_day: F) -> View
where
    F: Fn(CalendarDate) -> bool,
{
    match state.view_mode() {
        ViewMode::Day => View::Day(build_day_grid(state, limits, start_week_day, valid_day)),
        ViewMode::Month => View::Month(build_month_grid(state, limits)),
        ViewMode::Year => View::Year(build_year_grid(state, limits)),
    }
}

/// Lays out the cursor month in weeks starting on `start_week_day` (0 = Sunday).
pub fn build_day_grid<F>(state: &CalendarState, limits: &RangeLimits, start_week_day: u8, valid_day: F) -> DayGrid
where
    F: Fn(CalendarDate) -> bool,
{
    debug_assert!(start_week_day < DAYS_PER_WEEK);

    let year = state.cursor_year();
    let month = state.cursor_month();
    let first = weekday_of(year, month, 1);
    let mut column = usize::from((first + DAYS_PER_WEEK - start_week_day) % DAYS_PER_WEEK);

    let mut weeks = Vec::with_capacity(6);
    let mut week: Week = [None; WEEK];
    for day in 1..=days_in_month(year, month) {
        let Ok(date) = CalendarDate::new(year, month, day) else {
            continue;
        };
        week[column] = Some(GridCell {
            value:    u16::from(day),
            disabled: !limits.contains_date(date) || !valid_day(date),
            selected: state.is_selected(date),
        });
        column += 1;
        if column == WEEK {
            weeks.push(week);
            week = [None; WEEK];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }

    let mut weekdays = [0; WEEK];
    for (offset, slot) in (0..DAYS_PER_WEEK).zip(weekdays.iter_mut()) {
        *slot = (start_week_day + offset) % DAYS_PER_WEEK;
    }

    DayGrid {
        year,
        month,
        weekdays,
        weeks,
        has_prev_month: can_step_month(state, limits, Step::Back),
        has_next_month: can_step_month(state, limits, Step::Forward),
    }
}

/// The twelve months of the cursor year.
pub fn build_month_grid(state: &CalendarState, limits: &RangeLimits) -> MonthGrid {
    let year = state.cursor_year();
    let selected = state.selected().map(|d| (d.year(), d.month()));
    let months = std::array::from_fn(|i| {
        // i < 12
        #[allow(clippy::cast_possible_truncation)]
        let month = i as u8 + 1;
        GridCell {
            value:    u16::from(month),
            disabled: !limits.contains_month(year, month),
            selected: selected == Some((year, month)),
        }
    });
    MonthGrid { year, months }
}

/// Ten years starting at the state's page.
pub fn build_year_grid(state: &CalendarState, limits: &RangeLimits) -> YearGrid {
    let start = state.year_page_start();
    let selected = state.selected().map(|d| d.year());
    let years = std::array::from_fn(|i| {
        // i < 10
        #[allow(clippy::cast_possible_truncation)]
        let year = start + i as u16;
        GridCell {
            value:    year,
            disabled: !(MIN_YEAR..=MAX_YEAR).contains(&year) || !limits.contains_year(year),
            selected: selected == Some(year),
        }
    });
    YearGrid {
        years,
        has_prev_page: start.checked_sub(YEARS_PER_PAGE).is_some_and(|prev| page_reachable(prev, limits)),
        has_next_page: start.checked_add(YEARS_PER_PAGE).is_some_and(|next| page_reachable(next, limits)),
    }
}

/// Whether the page starting at `start` holds at least one selectable year.
pub fn page_reachable(start: u16, limits: &RangeLimits) -> bool {
    start <= limits.year_ceiling() && start.saturating_add(YEARS_PER_PAGE - 1) >= limits.year_floor()
}

/// Whether the cursor can move one month in `step` without leaving the limits.
pub fn can_step_month(state: &CalendarState, limits: &RangeLimits, step: Step) -> bool {
    let (year, month) = (state.cursor_year(), state.cursor_month());
    match step {
        Step::Back => limits.has_month_before(year, month),
        Step::Forward => limits.has_month_after(year, month),
    }
}
