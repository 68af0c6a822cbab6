//! Axis coordinates and tick labels.
//!
//! Dates are plotted as `f64` days since the unix epoch so every chart can
//! share plain numeric ranges.

use std::ops::Range;

use stockcast_core::domain::dates::{date_from_epoch_days, days_since_epoch, format_date};
use time::Date;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Profiles are anchored on 2017-01-01.
const PROFILE_ANCHOR_DAY: i64 = 17_167;

pub(crate) fn x(date: Date) -> f64 {
    days_since_epoch(date) as f64
}

pub(crate) fn date_label(value: &f64) -> String {
    date_from_epoch_days(value.round() as i64)
        .map(format_date)
        .unwrap_or_default()
}

pub(crate) fn weekday_label(offset: &f64) -> String {
    let index = (offset.round() as i64).rem_euclid(7) as usize;
    WEEKDAYS[index].to_owned()
}

pub(crate) fn month_label(offset: &f64) -> String {
    date_from_epoch_days(PROFILE_ANCHOR_DAY + offset.round() as i64)
        .map(|date| date.month().to_string().chars().take(3).collect())
        .unwrap_or_default()
}

pub(crate) fn hour_label(offset: &f64) -> String {
    let hour = (offset * 24.0).round() as i64;
    format!("{:02}:00", hour.rem_euclid(24))
}

/// Tick formatter for a seasonal profile, chosen by its period in days.
pub(crate) fn profile_label(period: f64) -> fn(&f64) -> String {
    if period <= 1.0 {
        hour_label
    } else if period <= 7.0 {
        weekday_label
    } else {
        month_label
    }
}

/// Range spanning `values` with 5% headroom on both sides.
///
/// A flat or empty input still yields a drawable non-empty range.
pub(crate) fn padded<I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(value), hi.max(value))
        });

    if min > max {
        return 0.0..1.0;
    }
    let pad = if max > min {
        (max - min) * 0.05
    } else {
        min.abs().max(1.0) * 0.05
    };
    (min - pad)..(max + pad)
}
