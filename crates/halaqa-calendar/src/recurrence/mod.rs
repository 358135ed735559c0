//! Expansion of weekly schedules into concrete session instants.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, SecondsFormat, Utc, Weekday};
use chrono_tz::Tz;
use halaqa_core::config::GenerationLimits;
use serde::{Serialize, Serializer};

use crate::clock::{Clock, SystemClock};
use crate::error::CalendarResult;
use crate::time_of_day::TimeOfDay;
use crate::timezone::{ConversionError, anchor_local, resolve_timezone};
use crate::weekday::DayNameTable;

/// A weekly schedule as stored by an academy: "every selected weekday at a
/// fixed time", starting on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyScheduleSpec {
    /// Day names, English or Arabic; duplicates are ignored.
    pub days: Vec<String>,
    /// 24-hour `HH:MM`.
    pub time_of_day: String,
    /// First calendar day examined, inclusive.
    pub start_date: NaiveDate,
    /// Requested number of instants, clamped by the batch cap.
    pub count: u32,
    /// IANA identifier of the academy timezone.
    pub timezone: String,
    /// Discard instants earlier than "now" in `timezone`.
    pub skip_past_dates: bool,
}

impl WeeklyScheduleSpec {
    /// Builds a spec that skips past dates.
    #[must_use]
    pub fn new<I, S>(
        days: I,
        time_of_day: impl Into<String>,
        start_date: NaiveDate,
        count: u32,
        timezone: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            days: days.into_iter().map(Into::into).collect(),
            time_of_day: time_of_day.into(),
            start_date,
            count,
            timezone: timezone.into(),
            skip_past_dates: true,
        }
    }

    #[must_use]
    pub fn with_skip_past_dates(mut self, skip: bool) -> Self {
        self.skip_past_dates = skip;
        self
    }
}

/// One occurrence of a weekly schedule, anchored in the academy timezone.
///
/// The instant is never converted for storage here; callers use
/// [`SessionInstant::to_utc`] or [`SessionInstant::in_timezone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionInstant(DateTime<Tz>);

impl SessionInstant {
    #[must_use]
    pub fn new(local: DateTime<Tz>) -> Self {
        Self(local)
    }

    /// The instant in the academy timezone.
    #[must_use]
    pub fn local(&self) -> DateTime<Tz> {
        self.0
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.0.timezone()
    }

    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    #[must_use]
    pub fn in_timezone(&self, tz: Tz) -> DateTime<Tz> {
        self.0.with_timezone(&tz)
    }

    /// Calendar date in the academy timezone.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Wall-clock time in the academy timezone.
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl fmt::Display for SessionInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl Serialize for SessionInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Detailed result of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationReport {
    /// Strictly ascending, duplicate-free.
    pub instants: Vec<SessionInstant>,
    /// Day names that mapped to no weekday and were dropped.
    pub unresolved_days: Vec<String>,
    /// Generation stopped at the safety horizon before reaching the count.
    pub horizon_reached: bool,
    /// Candidates discarded for being earlier than "now".
    pub skipped_past: u32,
    /// Candidates discarded because the local time falls in a DST gap.
    pub skipped_nonexistent: u32,
}

/// Walks calendar days from a start date, emitting one instant per matching
/// weekday until the requested count or the safety horizon is reached.
///
/// Holds no mutable state; a single generator can be shared across threads.
#[derive(Debug, Clone)]
pub struct RecurringScheduleGenerator<C = SystemClock> {
    clock: C,
    limits: GenerationLimits,
    day_names: DayNameTable,
}

impl RecurringScheduleGenerator<SystemClock> {
    /// Generator reading the host clock, with the default day-name table.
    #[must_use]
    pub fn new(limits: GenerationLimits) -> Self {
        Self::with_clock(SystemClock, limits)
    }
}

impl<C: Clock> RecurringScheduleGenerator<C> {
    #[must_use]
    pub fn with_clock(clock: C, limits: GenerationLimits) -> Self {
        Self {
            clock,
            limits,
            day_names: DayNameTable::default(),
        }
    }

    /// Replaces the day-name table.
    #[must_use]
    pub fn with_day_names(mut self, day_names: DayNameTable) -> Self {
        self.day_names = day_names;
        self
    }

    #[must_use]
    pub fn limits(&self) -> GenerationLimits {
        self.limits
    }

    #[must_use]
    pub fn day_names(&self) -> &DayNameTable {
        &self.day_names
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// ## Summary
    /// Returns the instants at which `spec` fires, ascending.
    ///
    /// ## Errors
    /// Returns `CalendarError::InvalidScheduleSpec` if the time of day is
    /// malformed or the timezone is unknown.
    pub fn generate(&self, spec: &WeeklyScheduleSpec) -> CalendarResult<Vec<SessionInstant>> {
        self.generate_report(spec).map(|report| report.instants)
    }

    /// ## Summary
    /// Expands `spec` and reports what was dropped along the way.
    ///
    /// Unrecognized day names are not an error: they are listed in the
    /// report and logged at `warn`. When no day name resolves, the report
    /// carries no instants.
    ///
    /// ## Errors
    /// Returns `CalendarError::InvalidScheduleSpec` if the time of day is
    /// malformed or the timezone is unknown.
    ///
    /// ## Side Effects
    /// Reads the clock once when `spec.skip_past_dates` is set.
    pub fn generate_report(&self, spec: &WeeklyScheduleSpec) -> CalendarResult<GenerationReport> {
        let time: TimeOfDay = spec.time_of_day.parse()?;
        let tz = resolve_timezone(&spec.timezone)?;

        let resolution = self.day_names.resolve(&spec.days);
        for day in &resolution.unresolved {
            tracing::warn!(
                day = %day,
                timezone = %tz.name(),
                "Dropping unrecognized day name from schedule"
            );
        }

        let mut report = GenerationReport {
            unresolved_days: resolution.unresolved,
            ..GenerationReport::default()
        };

        if resolution.weekdays.is_empty() {
            tracing::debug!("No weekday resolved, nothing to generate");
            return Ok(report);
        }

        let wanted = usize::try_from(self.limits.clamp_count(spec.count)).unwrap_or(usize::MAX);
        if wanted == 0 {
            return Ok(report);
        }
        if spec.count > self.limits.max_sessions_per_batch {
            tracing::debug!(
                requested = spec.count,
                cap = self.limits.max_sessions_per_batch,
                "Clamped requested session count"
            );
        }

        let now = spec.skip_past_dates.then(|| self.clock.now(tz));

        for offset in 0..=self.limits.max_ahead_days {
            let Some(date) = spec.start_date.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            if !resolution.weekdays.contains(date.weekday()) {
                continue;
            }

            let candidate = match anchor_local(date, time.as_naive(), tz) {
                Ok(candidate) => candidate,
                Err(ConversionError::NonExistentTime(local)) => {
                    tracing::warn!(local = %local, "Skipping session inside DST gap");
                    report.skipped_nonexistent += 1;
                    continue;
                }
            };

            if now.is_some_and(|now| candidate < now) {
                tracing::trace!(candidate = %candidate, "Skipping past session date");
                report.skipped_past += 1;
                continue;
            }

            report.instants.push(SessionInstant::new(candidate));
            if report.instants.len() == wanted {
                break;
            }
        }

        report.horizon_reached = report.instants.len() < wanted;

        tracing::debug!(
            generated = report.instants.len(),
            wanted,
            horizon_reached = report.horizon_reached,
            skipped_past = report.skipped_past,
            "Generated session dates"
        );

        Ok(report)
    }
}
