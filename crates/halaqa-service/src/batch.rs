//! Multi-tenant generation run: one weekly schedule per academy course,
//! expanded, de-duplicated against persisted sessions and converted to the
//! storage timezone.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use halaqa_calendar::error::CalendarError;
use halaqa_calendar::timezone::resolve_timezone;
use halaqa_calendar::{Clock, RecurringScheduleGenerator, SessionInstant, WeeklyScheduleSpec};
use halaqa_core::constants::DEFAULT_SESSION_DURATION_MINUTES;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conflict::minutes;
use crate::error::{ServiceError, ServiceResult};

const fn default_true() -> bool {
    true
}

/// A stored weekly schedule, as handed over by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSchedule {
    pub schedule_id: Uuid,
    /// Tenant (academy) the schedule belongs to.
    pub academy: String,
    pub days: Vec<String>,
    pub time_of_day: String,
    pub start_date: NaiveDate,
    pub count: u32,
    /// Falls back to the configured default academy timezone.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_true")]
    pub skip_past_dates: bool,
    #[serde(default)]
    pub session_duration_minutes: Option<u32>,
}

/// Key of a session that is already persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingSession {
    pub schedule_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
}

/// A session ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Start in the storage timezone.
    pub scheduled_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
    /// Start in the academy timezone.
    pub local: SessionInstant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Generated,
    Failed,
}

/// Result for one tenant schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub schedule_id: Uuid,
    pub academy: String,
    pub status: OutcomeStatus,
    pub sessions: Vec<StoredSession>,
    pub duplicates_skipped: u32,
    pub unresolved_days: Vec<String>,
    pub horizon_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScheduleOutcome {
    fn failed(tenant: &TenantSchedule, error: &ServiceError) -> Self {
        Self {
            schedule_id: tenant.schedule_id,
            academy: tenant.academy.clone(),
            status: OutcomeStatus::Failed,
            sessions: Vec::new(),
            duplicates_skipped: 0,
            unresolved_days: Vec::new(),
            horizon_reached: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<ScheduleOutcome>,
}

impl BatchReport {
    /// Sessions created across all tenants.
    #[must_use]
    pub fn created(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.sessions.len()).sum()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == OutcomeStatus::Failed)
            .count()
    }
}

/// Runs many tenant schedules through one shared generator.
#[derive(Debug)]
pub struct ScheduleBatch<'a, C: Clock> {
    generator: &'a RecurringScheduleGenerator<C>,
    default_timezone: String,
    storage_timezone: Tz,
}

impl<'a, C: Clock> ScheduleBatch<'a, C> {
    /// ## Summary
    /// Creates a batch runner.
    ///
    /// ## Errors
    /// Returns `ServiceError::CalendarError` if either timezone is unknown.
    pub fn new(
        generator: &'a RecurringScheduleGenerator<C>,
        default_timezone: &str,
        storage_timezone: &str,
    ) -> ServiceResult<Self> {
        resolve_timezone(default_timezone).map_err(CalendarError::from)?;
        let storage_timezone = resolve_timezone(storage_timezone).map_err(CalendarError::from)?;

        Ok(Self {
            generator,
            default_timezone: default_timezone.trim().to_string(),
            storage_timezone,
        })
    }

    /// ## Summary
    /// Expands every tenant schedule, skipping sessions already present in
    /// `existing`.
    ///
    /// A tenant whose schedule is invalid yields a failed outcome; the other
    /// tenants are still processed.
    #[must_use]
    #[tracing::instrument(skip_all, fields(tenants = tenants.len(), existing = existing.len()))]
    pub fn run(&self, tenants: &[TenantSchedule], existing: &[ExistingSession]) -> BatchReport {
        let existing: HashSet<ExistingSession> = existing.iter().copied().collect();

        let outcomes = tenants
            .iter()
            .map(|tenant| {
                let span = tracing::info_span!(
                    "tenant",
                    academy = %tenant.academy,
                    schedule_id = %tenant.schedule_id
                );
                let _guard = span.enter();

                self.run_tenant(tenant, &existing).unwrap_or_else(|err| {
                    tracing::error!(error = %err, "Schedule generation failed");
                    ScheduleOutcome::failed(tenant, &err)
                })
            })
            .collect();

        let report = BatchReport { outcomes };
        tracing::info!(
            created = report.created(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }

    fn run_tenant(
        &self,
        tenant: &TenantSchedule,
        existing: &HashSet<ExistingSession>,
    ) -> ServiceResult<ScheduleOutcome> {
        let duration = tenant
            .session_duration_minutes
            .unwrap_or(DEFAULT_SESSION_DURATION_MINUTES);
        if duration == 0 {
            return Err(ServiceError::ValidationError(
                "session duration must be positive".to_string(),
            ));
        }

        let spec = WeeklyScheduleSpec::new(
            tenant.days.iter().map(String::as_str),
            tenant.time_of_day.as_str(),
            tenant.start_date,
            tenant.count,
            tenant
                .timezone
                .as_deref()
                .unwrap_or(self.default_timezone.as_str()),
        )
        .with_skip_past_dates(tenant.skip_past_dates);

        let report = self.generator.generate_report(&spec)?;

        let mut duplicates_skipped = 0;
        let mut sessions = Vec::with_capacity(report.instants.len());
        for instant in report.instants {
            let key = ExistingSession {
                schedule_id: tenant.schedule_id,
                scheduled_at: instant.to_utc(),
            };
            if existing.contains(&key) {
                tracing::trace!(instant = %instant, "Session already persisted");
                duplicates_skipped += 1;
                continue;
            }

            let scheduled_at = instant.in_timezone(self.storage_timezone).fixed_offset();
            sessions.push(StoredSession {
                scheduled_at,
                ends_at: scheduled_at + minutes(duration),
                local: instant,
            });
        }

        tracing::debug!(
            created = sessions.len(),
            duplicates_skipped,
            "Tenant schedule expanded"
        );

        Ok(ScheduleOutcome {
            schedule_id: tenant.schedule_id,
            academy: tenant.academy.clone(),
            status: OutcomeStatus::Generated,
            sessions,
            duplicates_skipped,
            unresolved_days: report.unresolved_days,
            horizon_reached: report.horizon_reached,
            error: None,
        })
    }
}
