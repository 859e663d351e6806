#[macro_use]
mod logging;

mod config;
mod consts;
mod date;
mod format;
mod grid;
mod math;
mod picker;
mod prelude;
mod range;
mod state;

pub use config::{ConfigError, DayPredicate, Hooks, Listener, Options};
pub use consts::*;
pub use date::{CalendarDate, DateError};
pub use format::{DateFormat, FormatError, Pattern, format, is_valid_date, parse};
pub use grid::{
    DayGrid, GridCell, MonthGrid, View, Week, YearGrid, build_day_grid, build_month_grid, build_view,
    build_year_grid, can_step_month, page_reachable,
};
pub use math::{days_in_month, is_leap_year, weekday_of};
pub use picker::{
    Caption, Command, DatePicker, DateSet, MonthSelected, Notification, TextOutcome, YearSelected,
};
pub use range::{RangeError, RangeLimits};
pub use state::{CalendarState, Step, ViewMode, decade_of};
