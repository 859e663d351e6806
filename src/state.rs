use serde::{Deserialize, Serialize};

use crate::consts::{DECEMBER, JANUARY, MAX_YEAR, MIN_YEAR, YEARS_PER_PAGE};
use crate::date::CalendarDate;
use crate::prelude::*;

/// Which grid the picker presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

/// Direction of a relative move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Back,
    Forward,
}

/// Cursor, selection and view mode of one picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarState {
    cursor_year:     u16,
    cursor_month:    u8,
    selected:        Option<CalendarDate>,
    view_mode:       ViewMode,
    year_page_start: u16,
}

impl CalendarState {
    /// Starts in day view on the month of `cursor`.
    pub const fn new(cursor: CalendarDate, selected: Option<CalendarDate>) -> Self {
        Self {
            cursor_year: cursor.year(),
            cursor_month: cursor.month(),
            selected,
            view_mode: ViewMode::Day,
            year_page_start: decade_of(cursor.year()),
        }
    }

    pub const fn cursor_year(&self) -> u16 {
        self.cursor_year
    }

    pub const fn cursor_month(&self) -> u8 {
        self.cursor_month
    }

    pub const fn selected(&self) -> Option<CalendarDate> {
        self.selected
    }

    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// First year of the page shown in year view
    pub const fn year_page_start(&self) -> u16 {
        self.year_page_start
    }

    /// Whether `date` is the selected date
    pub fn is_selected(&self, date: CalendarDate) -> bool {
        self.selected == Some(date)
    }

    /// The (year, month) one step away from the cursor, `None` past the representable years.
    pub const fn neighbour_month(&self, step: Step) -> Option<(u16, u8)> {
        match (step, self.cursor_month) {
            (Step::Back, JANUARY) if self.cursor_year <= MIN_YEAR => None,
            (Step::Back, JANUARY) => Some((self.cursor_year - 1, DECEMBER)),
            (Step::Back, m) => Some((self.cursor_year, m - 1)),
            (Step::Forward, DECEMBER) if self.cursor_year >= MAX_YEAR => None,
            (Step::Forward, DECEMBER) => Some((self.cursor_year + 1, JANUARY)),
            (Step::Forward, m) => Some((self.cursor_year, m + 1)),
        }
    }

    pub(crate) const fn set_cursor(&mut self, year: u16, month: u8) {
        self.cursor_year = year;
        self.cursor_month = month;
    }

    pub(crate) const fn set_cursor_year(&mut self, year: u16) {
        self.cursor_year = year;
    }

    pub(crate) const fn set_cursor_month(&mut self, month: u8) {
        self.cursor_month = month;
    }

    /// Selects `date` and moves the cursor onto its month.
    pub(crate) const fn select(&mut self, date: CalendarDate) {
        self.selected = Some(date);
        self.set_cursor(date.year(), date.month());
    }

    pub(crate) const fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub(crate) const fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub(crate) const fn set_year_page_start(&mut self, start: u16) {
        self.year_page_start = start;
    }
}

/// First year of the decade page holding `year`.
pub const fn decade_of(year: u16) -> u16 {
    year - year % YEARS_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: u16, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("test date must be valid")
    }

    #[test]
    fn test_new_state() {
        let state = CalendarState::new(date(2013, 5, 20), None);
        assert_eq!(state.cursor_year(), 2013);
        assert_eq!(state.cursor_month(), 5);
        assert_eq!(state.selected(), None);
        assert_eq!(state.view_mode(), ViewMode::Day);
        assert_eq!(state.year_page_start(), 2010);
    }

    #[test]
    fn test_neighbour_month_rolls_year() {
        let state = CalendarState::new(date(2020, 12, 1), None);
        assert_eq!(state.neighbour_month(Step::Forward), Some((2021, 1)));
        assert_eq!(state.neighbour_month(Step::Back), Some((2020, 11)));

        let state = CalendarState::new(date(2020, 1, 1), None);
        assert_eq!(state.neighbour_month(Step::Back), Some((2019, 12)));
    }

    #[test]
    fn test_neighbour_month_at_representable_edges() {
        assert_eq!(CalendarState::new(CalendarDate::MIN, None).neighbour_month(Step::Back), None);
        assert_eq!(CalendarState::new(CalendarDate::MAX, None).neighbour_month(Step::Forward), None);
    }

    #[test]
    fn test_select_moves_cursor() {
        let mut state = CalendarState::new(date(2013, 5, 20), None);
        state.select(date(2014, 2, 3));
        assert!(state.is_selected(date(2014, 2, 3)));
        assert_eq!((state.cursor_year(), state.cursor_month()), (2014, 2));

        state.clear_selection();
        assert_eq!(state.selected(), None);
        assert_eq!((state.cursor_year(), state.cursor_month()), (2014, 2));
    }

    #[test]
    fn test_decade_of() {
        assert_eq!(decade_of(2013), 2010);
        assert_eq!(decade_of(2010), 2010);
        assert_eq!(decade_of(1999), 1990);
        assert_eq!(decade_of(1000), 1000);
    }

    #[test]
    fn test_serialize_snapshot() {
        let state = CalendarState::new(date(2013, 5, 20), Some(date(2013, 5, 20)));
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["cursor_year"], 2013);
        assert_eq!(json["selected"], "2013-05-20");
        assert_eq!(json["view_mode"], "day");
        assert_eq!(json["year_page_start"], 2010);
    }
}
