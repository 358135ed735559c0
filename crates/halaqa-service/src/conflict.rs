//! Overlap checks between candidate sessions and sessions already booked.
//!
//! Intervals are half-open: a session ending at 10:00 does not conflict with
//! one starting at 10:00.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ## Summary
/// Returns `true` when `[a_start, a_end)` and `[b_start, b_end)` share any
/// instant.
#[must_use]
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// ## Summary
/// Converts a positive minute count into a `TimeDelta`.
#[must_use]
pub fn minutes(duration_minutes: u32) -> TimeDelta {
    TimeDelta::minutes(i64::from(duration_minutes))
}

/// A session that already occupies a time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSession {
    pub key: Uuid,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl BookedSession {
    #[must_use]
    pub fn new(key: Uuid, starts_at: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            key,
            starts_at,
            duration_minutes,
        }
    }

    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + minutes(self.duration_minutes)
    }

    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        intervals_overlap(self.starts_at, self.ends_at(), start, end)
    }
}

/// Read access to the sessions an academy has already booked.
pub trait BusyCalendar {
    /// ## Summary
    /// Returns the booked sessions overlapping `[start, end)`, ignoring the
    /// session keyed `exclude` (the one being rescheduled, if any).
    fn conflicts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Vec<BookedSession>;
}

/// Calendar backed by a plain list of bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryCalendar {
    sessions: Vec<BookedSession>,
}

impl InMemoryCalendar {
    #[must_use]
    pub fn new(sessions: Vec<BookedSession>) -> Self {
        Self { sessions }
    }

    pub fn book(&mut self, session: BookedSession) {
        self.sessions.push(session);
    }

    #[must_use]
    pub fn sessions(&self) -> &[BookedSession] {
        &self.sessions
    }
}

impl BusyCalendar for InMemoryCalendar {
    fn conflicts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Vec<BookedSession> {
        self.sessions
            .iter()
            .filter(|session| Some(session.key) != exclude)
            .filter(|session| session.overlaps(start, end))
            .cloned()
            .collect()
    }
}

impl<B: BusyCalendar + ?Sized> BusyCalendar for &B {
    fn conflicts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Vec<BookedSession> {
        (**self).conflicts(start, end, exclude)
    }
}
