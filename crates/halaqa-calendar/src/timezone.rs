//! Academy timezone resolution and local-time anchoring.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SpecViolation;

/// Error while anchoring a wall-clock time in a timezone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// ## Summary
/// Resolves an IANA timezone identifier such as `Asia/Riyadh`.
///
/// Surrounding whitespace is ignored; the identifier is otherwise matched
/// exactly against the bundled timezone database.
///
/// ## Errors
/// Returns `SpecViolation::UnknownTimezone` if the identifier is not known.
pub fn resolve_timezone(tzid: &str) -> Result<Tz, SpecViolation> {
    Tz::from_str(tzid.trim()).map_err(|_e| SpecViolation::UnknownTimezone(tzid.to_string()))
}

/// ## Summary
/// Anchors a local calendar date and wall-clock time in `tz`.
///
/// A time that occurs twice (DST fold) resolves to the first occurrence.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` when the wall-clock time is
/// skipped by a DST transition on that date.
pub fn anchor_local(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
) -> Result<DateTime<Tz>, ConversionError> {
    let local = NaiveDateTime::new(date, time);

    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest),
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local} in timezone {}",
            tz.name()
        ))),
    }
}

/// ## Summary
/// Converts an anchored instant to the timezone the persistence layer uses.
#[must_use]
pub fn to_storage<T: TimeZone>(instant: &DateTime<T>, storage: Tz) -> DateTime<Tz> {
    instant.with_timezone(&storage)
}

/// ## Summary
/// Converts an anchored instant to UTC.
#[must_use]
pub fn to_utc<T: TimeZone>(instant: &DateTime<T>) -> DateTime<Utc> {
    instant.with_timezone(&Utc)
}
