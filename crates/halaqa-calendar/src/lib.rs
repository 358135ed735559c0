//! Weekly schedule expansion for academy sessions.
//!
//! Turns "every selected weekday at a fixed time" into concrete, timezone
//! anchored session instants, bounded by [`halaqa_core::config::GenerationLimits`].

pub mod clock;
pub mod error;
pub mod export;
pub mod recurrence;
pub mod time_of_day;
pub mod timezone;
pub mod weekday;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CalendarError, CalendarResult, SpecViolation};
pub use recurrence::{
    GenerationReport, RecurringScheduleGenerator, SessionInstant, WeeklyScheduleSpec,
};
pub use time_of_day::TimeOfDay;
pub use weekday::{DayLocale, DayNameTable, DayResolution, WeekdaySet};
