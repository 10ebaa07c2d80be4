//! Whole-day calendar arithmetic.
//!
//! Schedules never carry a time of day, so everything here works on
//! `NaiveDate` and signed day counts.

use chrono::{Duration, Local, NaiveDate};

/// Shift `date` by `days` (negative moves backwards).
///
/// Saturates at the edges of the representable calendar instead of panicking.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let Some(delta) = Duration::try_days(days) else {
        return if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX };
    };
    date.checked_add_signed(delta).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Signed number of days from `from` to `to`.
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
