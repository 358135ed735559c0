//! Turns generated instants into bookable sessions, dropping those that clash
//! with the academy calendar.

use chrono::{DateTime, Utc};
use halaqa_calendar::SessionInstant;
use serde::Serialize;
use uuid::Uuid;

use crate::conflict::{BookedSession, BusyCalendar, intervals_overlap, minutes};
use crate::error::{ServiceError, ServiceResult};

/// An instant accepted for booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSession {
    pub local: SessionInstant,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// An instant rejected because it overlaps existing sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedInstant {
    pub local: SessionInstant,
    /// Keys of the booked sessions it overlaps. Empty when it only clashes
    /// with an earlier instant of the same plan.
    pub conflicts_with: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Plan {
    pub planned: Vec<PlannedSession>,
    pub skipped: Vec<SkippedInstant>,
}

/// ## Summary
/// Checks each instant, as a session of `duration_minutes`, against
/// `calendar` and against the sessions already planned in this call.
///
/// `exclude` names a booked session to ignore, used when moving an existing
/// session to new times.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if `duration_minutes` is zero, and
/// `ServiceError::AllTimesConflict` if every instant was skipped.
#[tracing::instrument(skip(instants, calendar), fields(instants = instants.len()))]
pub fn plan_sessions<B: BusyCalendar>(
    instants: &[SessionInstant],
    duration_minutes: u32,
    calendar: &B,
    exclude: Option<Uuid>,
) -> ServiceResult<Plan> {
    if duration_minutes == 0 {
        return Err(ServiceError::ValidationError(
            "session duration must be positive".to_string(),
        ));
    }

    let length = minutes(duration_minutes);
    let mut plan = Plan::default();

    for instant in instants {
        let starts_at = instant.to_utc();
        let ends_at = starts_at + length;

        let booked: Vec<BookedSession> = calendar.conflicts(starts_at, ends_at, exclude);
        let clashes_with_plan = plan
            .planned
            .iter()
            .any(|p| intervals_overlap(p.starts_at, p.ends_at, starts_at, ends_at));

        if booked.is_empty() && !clashes_with_plan {
            plan.planned.push(PlannedSession {
                local: *instant,
                starts_at,
                ends_at,
            });
            continue;
        }

        tracing::info!(
            instant = %instant,
            conflicts = booked.len(),
            "Skipping session that conflicts with the calendar"
        );
        plan.skipped.push(SkippedInstant {
            local: *instant,
            conflicts_with: booked.into_iter().map(|session| session.key).collect(),
        });
    }

    if plan.planned.is_empty() && !plan.skipped.is_empty() {
        return Err(ServiceError::AllTimesConflict(plan.skipped.len()));
    }

    tracing::debug!(
        planned = plan.planned.len(),
        skipped = plan.skipped.len(),
        "Planned sessions"
    );

    Ok(plan)
}
