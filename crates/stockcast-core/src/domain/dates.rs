//! Calendar-date helpers shared by CSV exports, JSON reports and the model.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

/// `YYYY-MM-DD`, the only date layout stockcast reads or writes.
pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

// Serde adapter writing `Date` values as `YYYY-MM-DD`.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

const UNIX_EPOCH_JULIAN_DAY: i32 = 2_440_588;

pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), ISO_DATE).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

pub fn format_date(date: Date) -> String {
    date.format(ISO_DATE)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Whole days since 1970-01-01; negative before the epoch.
pub fn days_since_epoch(date: Date) -> i64 {
    i64::from(date.to_julian_day() - UNIX_EPOCH_JULIAN_DAY)
}

pub fn date_from_epoch_days(days: i64) -> Option<Date> {
    let julian = i32::try_from(days + i64::from(UNIX_EPOCH_JULIAN_DAY)).ok()?;
    Date::from_julian_day(julian).ok()
}

/// Midnight UTC of `date` as a unix timestamp.
pub fn unix_midnight(date: Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp()
}
