//! Calendar and date window models.
//!
//! Defines the day-granular windows the layout engine packs into and the
//! working-day calendar business-day durations are counted against.
//!
//! # Time Model
//! All dates are `chrono::NaiveDate`: day-aligned, no time zone. Ranges are
//! inclusive on both ends, so a one-day item has `start == end`.
//!
//! # Precedence
//! Holidays override the weekday pattern. A date is a working day iff:
//! - Its weekday is not one of the calendar's `weekend` days, AND
//! - It is not listed in `holidays`.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, day_difference};

/// An inclusive day range `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateWindow {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a window; the bounds are ordered so `start <= end` always holds.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// The seven-day window containing `date`, beginning on `week_start`.
    ///
    /// ```
    /// use chrono::{NaiveDate, Weekday};
    /// use u_timeline::models::DateWindow;
    ///
    /// // 2024-03-06 is a Wednesday.
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
    /// let week = DateWindow::week_containing(day, Weekday::Mon);
    /// assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    /// assert_eq!(week.len_days(), 7);
    /// ```
    pub fn week_containing(date: NaiveDate, week_start: Weekday) -> Self {
        let back = (7 + date.weekday().num_days_from_monday()
            - week_start.num_days_from_monday())
            % 7;
        let start = add_days(date, -i64::from(back));
        Self::new(start, add_days(start, 6))
    }

    /// Number of days in the window (inclusive, always >= 1).
    #[inline]
    pub fn len_days(&self) -> i64 {
        day_difference(self.end, self.start) + 1
    }

    /// Whether a date falls within the window.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether an inclusive range `[start, end]` shares at least one day
    /// with the window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    /// Clamps `[start, end]` to the window, or `None` without overlap.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        if !self.overlaps(start, end) {
            return None;
        }
        Some((start.max(self.start), end.min(self.end)))
    }

    /// Zero-based day offset of `date` from the window start.
    #[inline]
    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        day_difference(date, self.start)
    }

    /// Iterates over every day in the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.len_days()).map(move |n| add_days(start, n))
    }
}

/// Working-day calendar.
///
/// Combines a weekly pattern of non-working weekdays with individual
/// holidays. An empty calendar (no weekend, no holidays) treats every day
/// as a working day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkCalendar {
    /// Weekdays that are never working days.
    #[serde(default = "default_weekend")]
    pub weekend: Vec<Weekday>,
    /// Individual non-working dates (overrides the weekly pattern).
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            weekend: default_weekend(),
            holidays: BTreeSet::new(),
        }
    }
}

impl WorkCalendar {
    /// Creates a Monday-to-Friday calendar without holidays.
    pub fn new() -> Self {
        Self::default()
    }

    /// A calendar in which every day is a working day.
    pub fn every_day() -> Self {
        Self {
            weekend: Vec::new(),
            holidays: BTreeSet::new(),
        }
    }

    /// Replaces the weekend days.
    pub fn with_weekend(mut self, weekend: Vec<Weekday>) -> Self {
        self.weekend = weekend;
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Whether `date` is a working day.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.holidays.contains(&date) {
            return false;
        }
        !self.weekend.contains(&date.weekday())
    }

    /// Whether at least one weekday of the weekly pattern is a working day.
    pub fn has_working_weekdays(&self) -> bool {
        distinct_weekend_days(&self.weekend) < 7
    }

    /// Counts working days within a window (inclusive).
    pub fn working_days_in(&self, window: &DateWindow) -> i64 {
        if self.holidays.is_empty() {
            return self.weekday_count(window);
        }
        window.days().filter(|d| self.is_working_day(*d)).count() as i64
    }

    /// Working-day count using whole weeks, valid when there are no holidays.
    fn weekday_count(&self, window: &DateWindow) -> i64 {
        let total = window.len_days();
        let working_per_week = 7 - distinct_weekend_days(&self.weekend);
        let full_weeks = total / 7;
        let mut count = full_weeks * working_per_week;
        let tail_start = add_days(window.start, full_weeks * 7);
        for n in 0..(total % 7) {
            if !self.weekend.contains(&add_days(tail_start, n).weekday()) {
                count += 1;
            }
        }
        count
    }
}

fn distinct_weekend_days(weekend: &[Weekday]) -> i64 {
    let mut seen = [false; 7];
    for day in weekend {
        seen[day.num_days_from_monday() as usize] = true;
    }
    seen.iter().filter(|s| **s).count() as i64
}
