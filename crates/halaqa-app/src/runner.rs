//! One batch run as configured: read inputs, expand, report.

use halaqa_calendar::{Clock, RecurringScheduleGenerator};
use halaqa_service::batch::{BatchReport, ScheduleBatch};

use crate::config::Settings;
use crate::error::AppResult;
use crate::input::{read_existing, read_tenants};

/// ## Summary
/// Runs every tenant schedule in `batch.input_path` through `generator`,
/// skipping sessions listed in `batch.existing_path`.
///
/// Failures of individual tenants are reported in the returned
/// `BatchReport`, not as an error.
///
/// ## Errors
/// Returns an error if an input file cannot be read or parsed, or if a
/// configured timezone is unknown.
#[tracing::instrument(skip_all, fields(input = %settings.batch.input_path))]
pub fn run_batch<C: Clock>(
    settings: &Settings,
    generator: &RecurringScheduleGenerator<C>,
) -> AppResult<BatchReport> {
    let tenants = read_tenants(&settings.batch.input_path)?;
    let existing = read_existing(settings.batch.existing_path.as_deref())?;

    let batch = ScheduleBatch::new(
        generator,
        &settings.scheduling.default_timezone,
        &settings.scheduling.storage_timezone,
    )?;

    Ok(batch.run(&tenants, &existing))
}
