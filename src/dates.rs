//! Day-granularity date arithmetic.
//!
//! Pure, total functions over `NaiveDate`. Time of day is stripped once at
//! the boundary ([`strip_time`], [`strip_time_tz`]) and never carried
//! inside the engine.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::{DateWindow, WorkCalendar};

/// Adds `n` days (negative subtracts), saturating at the representable range.
///
/// ```
/// use chrono::NaiveDate;
/// use u_timeline::dates::add_days;
///
/// let d = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
/// assert_eq!(add_days(d, 2), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// ```
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    Duration::try_days(n)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if n >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Signed number of days from `b` to `a` (`a - b`).
#[inline]
pub fn day_difference(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days()
}

/// Whether `a` falls on an earlier day than `b`.
#[inline]
pub fn is_before(a: NaiveDate, b: NaiveDate) -> bool {
    a < b
}

/// Whether `a` falls on a later day than `b`.
#[inline]
pub fn is_after(a: NaiveDate, b: NaiveDate) -> bool {
    a > b
}

/// Whether `a` and `b` are the same day.
#[inline]
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Drops the time of day.
#[inline]
pub fn strip_time(at: NaiveDateTime) -> NaiveDate {
    at.date()
}

/// Drops the time of day, using the calendar date in the value's own zone.
#[inline]
pub fn strip_time_tz<Tz: TimeZone>(at: &DateTime<Tz>) -> NaiveDate {
    at.date_naive()
}

/// Number of working days in the inclusive range `[start, end]`.
///
/// Returns 0 when `end < start` or when the range holds no working day.
pub fn business_day_duration(start: NaiveDate, end: NaiveDate, calendar: &WorkCalendar) -> i64 {
    if end < start {
        return 0;
    }
    calendar.working_days_in(&DateWindow::new(start, end))
}

/// Earliest `end >= start` whose range `[start, end]` holds exactly `days`
/// working days.
///
/// Returns `start` for `days <= 0`, and also when the calendar has no
/// working days at all.
pub fn end_for_business_duration(start: NaiveDate, days: i64, calendar: &WorkCalendar) -> NaiveDate {
    if days <= 0 || !calendar.has_working_weekdays() {
        return start;
    }
    let mut remaining = days;
    let mut cursor = start;
    loop {
        if calendar.is_working_day(cursor) {
            remaining -= 1;
            if remaining == 0 {
                return cursor;
            }
        }
        let next = add_days(cursor, 1);
        if next == cursor {
            return cursor;
        }
        cursor = next;
    }
}

/// How an item's length is measured when its start moves.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationMode {
    /// Keep `end - start` in calendar days.
    #[default]
    CalendarDays,
    /// Keep the number of working days in `[start, end]`.
    BusinessDays,
}

impl DurationMode {
    /// Computes the end that keeps `[old_start, old_end]`'s length after the
    /// start moves to `new_start`. The result is never before `new_start`.
    pub fn preserve_end(
        self,
        old_start: NaiveDate,
        old_end: NaiveDate,
        new_start: NaiveDate,
        calendar: &WorkCalendar,
    ) -> NaiveDate {
        match self {
            Self::CalendarDays => {
                add_days(new_start, day_difference(old_end, old_start).max(0))
            }
            Self::BusinessDays => {
                let days = business_day_duration(old_start, old_end, calendar);
                end_for_business_duration(new_start, days, calendar)
            }
        }
    }
}
