//! Calendar math for week navigation and date display.
//!
//! All week handling is Monday-anchored: the key identifying a week is the
//! Monday that starts it, and a Sunday belongs to the week that began six
//! days earlier. Everything here is pure and total; unparseable input comes
//! back as `None` or an empty string, never a panic.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shared::WeekKey;

/// Lowercase day-name keys of the meal-plan structure, Monday first.
pub const DAY_KEYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// A date argument: either an already-parsed date or a `YYYY-MM-DD` string.
/// Callers pass either shape to the functions below without converting first.
#[derive(Debug, Clone, Copy)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    Iso(&'a str),
}

impl DateInput<'_> {
    pub fn resolve(self) -> Option<NaiveDate> {
        match self {
            DateInput::Date(date) => Some(date),
            DateInput::Iso(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok(),
        }
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(raw: &'a str) -> Self {
        DateInput::Iso(raw)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(raw: &'a String) -> Self {
        DateInput::Iso(raw)
    }
}

impl From<&WeekKey> for DateInput<'_> {
    fn from(key: &WeekKey) -> Self {
        DateInput::Date(key.monday())
    }
}

/// The Monday on/before the given date.
pub fn week_start<'a>(date: impl Into<DateInput<'a>>) -> Option<NaiveDate> {
    date.into().resolve().map(|d| WeekKey::for_date(d).monday())
}

/// The week key (`YYYY-MM-DD` Monday) of the week containing the given date.
pub fn week_key<'a>(date: impl Into<DateInput<'a>>) -> Option<WeekKey> {
    date.into().resolve().map(WeekKey::for_date)
}

/// The seven dates of the week, Monday through Sunday.
pub fn week_dates(week: &WeekKey) -> Vec<NaiveDate> {
    (0..7).map(|i| week.monday() + Duration::days(i)).collect()
}

/// The key exactly seven days earlier.
pub fn previous_week(week: &WeekKey) -> WeekKey {
    WeekKey::for_date(week.monday() - Duration::days(7))
}

/// The key exactly seven days later.
pub fn next_week(week: &WeekKey) -> WeekKey {
    WeekKey::for_date(week.monday() + Duration::days(7))
}

/// Date of a weekday within the week, using the 0=Sunday..6=Saturday
/// numbering the front-end grid uses; Sunday lands at the end of the
/// Monday-start week.
pub fn date_for_weekday(week: &WeekKey, day_of_week: u32) -> NaiveDate {
    let offset = if day_of_week == 0 { 6 } else { i64::from(day_of_week) - 1 };
    week.monday() + Duration::days(offset)
}

/// Lowercase day-name key for the meal-plan structure (`"monday"`..`"sunday"`).
pub fn day_name_key(date: NaiveDate) -> &'static str {
    DAY_KEYS[date.weekday().num_days_from_monday() as usize]
}

/// English day name, e.g. `"Monday"`.
pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Short English day name, e.g. `"Mon"`.
pub fn short_day_name(date: NaiveDate) -> &'static str {
    &day_name(date)[..3]
}

/// `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Options for [`format_date_display`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    /// Prefix the day name ("Monday, January 15, 2024")
    pub include_day_name: bool,
    /// Use the short month name ("Jan 15, 2024")
    pub short_month: bool,
}

/// Human-readable date, e.g. `"January 15, 2024"`. Unparseable input renders
/// as the empty string.
pub fn format_date_display<'a>(date: impl Into<DateInput<'a>>, options: DisplayOptions) -> String {
    let Some(date) = date.into().resolve() else {
        return String::new();
    };
    let month = if options.short_month {
        short_month_name(date.month())
    } else {
        month_name(date.month())
    };
    let base = format!("{} {}, {}", month, date.day(), date.year());
    if options.include_day_name {
        format!("{}, {}", day_name(date), base)
    } else {
        base
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "January",
    }
}

fn short_month_name(month: u32) -> &'static str {
    &month_name(month)[..3]
}
