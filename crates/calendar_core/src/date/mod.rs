//! Calendar date utilities.
//!
//! # Responsibility
//! - Derive month geometry (day count, first weekday) from a year/month pair.
//! - Produce and validate the canonical `YYYY-MM-DD` date key and `HH:MM` time.
//! - Format values for display (12-hour time, month names, long dates).
//!
//! # Invariants
//! - Every function is pure; none touches the clock or storage.
//! - Month arguments are zero-based (`0 = January`); out-of-range months yield
//!   `None` instead of a value.
//! - Weekday indexes are zero-based from Sunday.

mod layout;

pub use layout::{MonthCell, MonthLayout};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static CANONICAL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static CANONICAL_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Format used for canonical date keys.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a calendar day as its canonical `YYYY-MM-DD` key.
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Formats the UTC calendar day of an instant as a canonical date key.
///
/// Two instants falling on the same UTC day format identically regardless of
/// their time-of-day component or source timezone.
pub fn format_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    format_date(instant.with_timezone(&Utc).date_naive())
}

/// Builds the canonical key for `(year, zero-based month, day)`.
///
/// Returns `None` when the triple does not name a real calendar day.
pub fn date_key(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month.checked_add(1)?, day).map(format_date)
}

/// Parses a canonical `YYYY-MM-DD` key.
///
/// Rejects non-padded forms (`2024-3-5`) and impossible days (`2023-02-29`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !CANONICAL_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, CANONICAL_DATE_FORMAT).ok()
}

/// Returns whether `value` is a canonical date key of a real day.
pub fn is_canonical_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Returns whether `value` is a canonical 24-hour `HH:MM` time.
pub fn is_canonical_time(value: &str) -> bool {
    CANONICAL_TIME_RE.is_match(value)
}

/// Converts a canonical `HH:MM` time into a 12-hour display string.
///
/// `"09:00"` becomes `"9:00 AM"`, `"00:15"` becomes `"12:15 AM"`.
/// Non-canonical input is returned unchanged.
pub fn format_time(time: &str) -> String {
    if !is_canonical_time(time) {
        return time.to_string();
    }
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(parsed) => parsed.format("%-I:%M %p").to_string(),
        Err(_) => time.to_string(),
    }
}

/// Returns the English name of a zero-based month.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(usize::try_from(month).ok()?).copied()
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days (28-31) in a zero-based month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 if is_leap_year(year) => 29,
        1 => 28,
        _ => return None,
    };
    Some(days)
}

/// Returns the weekday index (0 = Sunday) of the first day of a zero-based month.
pub fn first_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month.checked_add(1)?, 1)?;
    Some(first.weekday().num_days_from_sunday())
}

/// Short English weekday name (`Sun`..`Sat`) of a calendar day.
pub fn weekday_short_name(date: NaiveDate) -> &'static str {
    let index = date.weekday().num_days_from_sunday() as usize;
    WEEKDAY_SHORT_NAMES[index % WEEKDAY_SHORT_NAMES.len()]
}

/// Short weekday names in grid column order.
pub fn weekday_short_names() -> [&'static str; 7] {
    WEEKDAY_SHORT_NAMES
}

/// Long display form of a day, e.g. `March 15, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Moves a `(year, zero-based month)` pair by `delta` months, carrying years.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let absolute = i64::from(year) * 12 + i64::from(month.min(11)) + i64::from(delta);
    let shifted_year = absolute.div_euclid(12);
    let shifted_month = absolute.rem_euclid(12);
    (
        i32::try_from(shifted_year).unwrap_or(year),
        u32::try_from(shifted_month).unwrap_or(month),
    )
}

/// Returns `(year, zero-based month)` of a calendar day.
pub fn year_month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month0())
}
