pub use halaqa_core::config::*;

use halaqa_calendar::{Clock, DayNameTable, RecurringScheduleGenerator};

use crate::error::AppResult;

/// ## Summary
/// Builds the generator described by `settings`: configured limits and the
/// default day-name table extended with `scheduling.day_aliases`.
///
/// ## Errors
/// Returns an error if a day alias does not map to an English weekday name.
pub fn build_generator<C: Clock>(
    settings: &Settings,
    clock: C,
) -> AppResult<RecurringScheduleGenerator<C>> {
    let day_names = DayNameTable::from_aliases(&settings.scheduling.day_aliases)?;

    tracing::debug!(
        aliases = settings.scheduling.day_aliases.len(),
        max_ahead_days = settings.limits.max_ahead_days,
        max_sessions_per_batch = settings.limits.max_sessions_per_batch,
        "Building schedule generator"
    );

    Ok(RecurringScheduleGenerator::with_clock(clock, settings.limits).with_day_names(day_names))
}
