//! Free-slot search within an academy's working hours.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use halaqa_calendar::TimeOfDay;
use halaqa_calendar::error::CalendarError;
use halaqa_calendar::timezone::{anchor_local, resolve_timezone};
use halaqa_core::constants::{DEFAULT_WORKING_HOURS, SLOT_STEP_MINUTES};
use serde::Serialize;

use crate::conflict::{BusyCalendar, minutes};
use crate::error::{ServiceError, ServiceResult};

/// Daily opening window, in the academy timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl WorkingHours {
    /// ## Summary
    /// Parses a `HH:MM`..`HH:MM` window.
    ///
    /// ## Errors
    /// Returns `ServiceError::CalendarError` if either bound is malformed and
    /// `ServiceError::ValidationError` if the end is not after the start.
    pub fn parse(start: &str, end: &str) -> ServiceResult<Self> {
        let start: TimeOfDay = start.parse().map_err(CalendarError::from)?;
        let end: TimeOfDay = end.parse().map_err(CalendarError::from)?;

        if end <= start {
            return Err(ServiceError::ValidationError(format!(
                "working hours end {end} is not after start {start}"
            )));
        }

        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> TimeOfDay {
        self.end
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        let (start, end) = DEFAULT_WORKING_HOURS;
        Self {
            start: TimeOfDay::on_the_hour(start),
            end: TimeOfDay::on_the_hour(end),
        }
    }
}

/// A bookable range with no conflicting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// `HH:MM` in the academy timezone.
    pub local_start: String,
}

/// ## Summary
/// Lists the free `duration_minutes` slots on `date`, stepping through the
/// working hours every thirty minutes of local wall-clock time.
///
/// Grid times skipped by a DST transition are left out; a repeated local
/// time is offered once, at its first occurrence.
///
/// A slot must end no later than the end of the working hours.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if the duration is zero or a
/// working-hours bound does not exist on `date` (DST gap), and
/// `ServiceError::CalendarError` if the timezone is unknown.
#[tracing::instrument(skip(calendar))]
pub fn available_slots<B: BusyCalendar>(
    date: NaiveDate,
    duration_minutes: u32,
    hours: WorkingHours,
    timezone: &str,
    calendar: &B,
) -> ServiceResult<Vec<AvailableSlot>> {
    if duration_minutes == 0 {
        return Err(ServiceError::ValidationError(
            "slot duration must be positive".to_string(),
        ));
    }

    let tz: Tz = resolve_timezone(timezone).map_err(CalendarError::from)?;
    anchor_local(date, hours.start().as_naive(), tz)
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?;
    let day_end = anchor_local(date, hours.end().as_naive(), tz)
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

    let length = minutes(duration_minutes);
    let step = minutes(SLOT_STEP_MINUTES);
    let day_end = day_end.with_timezone(&Utc);
    let mut slots = Vec::new();
    let mut local = hours.start().as_naive();

    // Candidates sit on the wall-clock grid; each one is anchored on its own
    loop {
        match anchor_local(date, local, tz) {
            Ok(candidate) => {
                let starts_at = candidate.with_timezone(&Utc);
                let ends_at = starts_at + length;
                if ends_at > day_end {
                    break;
                }

                if calendar.conflicts(starts_at, ends_at, None).is_empty() {
                    slots.push(AvailableSlot {
                        starts_at,
                        ends_at,
                        local_start: candidate.format("%H:%M").to_string(),
                    });
                }
            }
            Err(err) => tracing::trace!(error = %err, "Skipping slot inside DST gap"),
        }

        let (next, wrapped) = local.overflowing_add_signed(step);
        if wrapped != 0 || next >= hours.end().as_naive() {
            break;
        }
        local = next;
    }

    tracing::debug!(slots = slots.len(), "Computed available slots");

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{BookedSession, InMemoryCalendar};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn june_2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
    }

    fn local_starts(slots: &[AvailableSlot]) -> Vec<&str> {
        slots.iter().map(|slot| slot.local_start.as_str()).collect()
    }

    #[test]
    fn test_default_working_hours() {
        let hours = WorkingHours::default();
        assert_eq!(hours.start().to_string(), "09:00");
        assert_eq!(hours.end().to_string(), "17:00");
    }

    #[test]
    fn test_working_hours_validation() {
        assert!(WorkingHours::parse("16:00", "18:30").is_ok());
        assert!(matches!(
            WorkingHours::parse("17:00", "09:00"),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            WorkingHours::parse("9am", "17:00"),
            Err(ServiceError::CalendarError(_))
        ));
    }

    #[test_log::test]
    fn test_empty_calendar_offers_every_step() {
        let hours = WorkingHours::parse("16:00", "18:00").unwrap();
        let slots =
            available_slots(june_2(), 60, hours, "Asia/Riyadh", &InMemoryCalendar::default())
                .expect("valid input");

        assert_eq!(local_starts(&slots), vec!["16:00", "16:30", "17:00"]);
        // Riyadh is UTC+3
        assert_eq!(
            slots[0].starts_at,
            Utc.with_ymd_and_hms(2024, 6, 2, 13, 0, 0).unwrap()
        );
    }

    #[test_log::test]
    fn test_booked_session_blocks_overlapping_slots() {
        let booked = BookedSession::new(
            Uuid::new_v4(),
            Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap(),
            60,
        );
        let calendar = InMemoryCalendar::new(vec![booked]);

        let slots = available_slots(june_2(), 60, WorkingHours::default(), "UTC", &calendar)
            .expect("valid input");
        let starts = local_starts(&slots);

        assert_eq!(starts.first(), Some(&"09:00"));
        assert!(!starts.contains(&"09:30"));
        assert!(!starts.contains(&"10:00"));
        assert!(!starts.contains(&"10:30"));
        assert!(starts.contains(&"11:00"));
        assert_eq!(starts.last(), Some(&"16:00"));
    }

    #[test]
    fn test_slot_longer_than_working_day() {
        let slots = available_slots(
            june_2(),
            9 * 60,
            WorkingHours::default(),
            "UTC",
            &InMemoryCalendar::default(),
        )
        .expect("valid input");

        assert!(slots.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        let calendar = InMemoryCalendar::default();

        assert!(matches!(
            available_slots(june_2(), 0, WorkingHours::default(), "UTC", &calendar),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            available_slots(june_2(), 30, WorkingHours::default(), "Nowhere/City", &calendar),
            Err(ServiceError::CalendarError(_))
        ));
    }

    #[test_log::test]
    fn test_slots_stay_on_local_grid_across_fall_back() {
        // 2024-11-03 01:00-02:00 happens twice in New York
        let hours = WorkingHours::parse("00:00", "03:00").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();

        let slots = available_slots(
            date,
            30,
            hours,
            "America/New_York",
            &InMemoryCalendar::default(),
        )
        .expect("valid input");

        assert_eq!(
            local_starts(&slots),
            vec!["00:00", "00:30", "01:00", "01:30", "02:00", "02:30"]
        );
        // 02:00 is after the transition, on EST
        assert_eq!(
            slots[4].starts_at,
            Utc.with_ymd_and_hms(2024, 11, 3, 7, 0, 0).unwrap()
        );
    }

    #[test_log::test]
    fn test_slots_skip_spring_forward_gap() {
        // 2024-03-10 02:00-03:00 does not exist in New York
        let hours = WorkingHours::parse("01:00", "04:00").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let slots = available_slots(
            date,
            30,
            hours,
            "America/New_York",
            &InMemoryCalendar::default(),
        )
        .expect("valid input");

        assert_eq!(local_starts(&slots), vec!["01:00", "01:30", "03:00", "03:30"]);
    }
}
