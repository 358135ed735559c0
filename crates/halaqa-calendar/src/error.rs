use thiserror::Error;

/// Ways a weekly schedule can be malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecViolation {
    #[error("invalid time of day {0:?}, expected 24-hour HH:MM")]
    InvalidTimeOfDay(String),

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),

    #[error("schedule has no occurrences: {0}")]
    NoOccurrences(&'static str),
}

/// Calendar expansion errors
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid schedule spec: {0}")]
    InvalidScheduleSpec(#[from] SpecViolation),

    #[error("Recurrence rule error: {0}")]
    RRule(String),

    #[error(transparent)]
    CoreError(#[from] halaqa_core::error::CoreError),
}

pub type CalendarResult<T> = std::result::Result<T, CalendarError>;
