//! Pure Gregorian calendar arithmetic.

use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAYS_PER_WEEK, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_MONTH,
};

/// Month offsets for Sakamoto's weekday method, January first.
const WEEKDAY_MONTH_OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Length of a month, `0` for a month outside 1-12.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    if month == 0 || month > MAX_MONTH {
        0
    } else if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Day of the week for a date, `0` being Sunday.
///
/// The date must be valid and its year non-zero.
pub const fn weekday_of(year: u16, month: u8, day: u8) -> u8 {
    debug_assert!(year != 0 && month != 0 && month <= MAX_MONTH && day != 0);

    // January and February count as months 13 and 14 of the previous year.
    let y = if month < 3 { year - 1 } else { year };
    let sum = y + y / LEAP_YEAR_CYCLE - y / CENTURY_CYCLE
        + y / GREGORIAN_CYCLE
        + WEEKDAY_MONTH_OFFSETS[(month - 1) as usize]
        + day as u16;
    (sum % DAYS_PER_WEEK as u16) as u8
}
