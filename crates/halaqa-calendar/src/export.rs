//! Export of weekly schedules as RFC 5545 recurrence rules, for syncing with
//! external calendars.

use chrono::{DateTime, Datelike, Days, Weekday};
use chrono_tz::Tz;
use rrule::{RRule, RRuleSet, Unvalidated};

use crate::clock::Clock;
use crate::error::{CalendarError, CalendarResult, SpecViolation};
use crate::recurrence::{RecurringScheduleGenerator, WeeklyScheduleSpec};
use crate::time_of_day::TimeOfDay;
use crate::timezone::{anchor_local, resolve_timezone};
use crate::weekday::WeekdaySet;

fn byday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// ## Summary
/// Renders the `RRULE` value for a weekly rule on `days`.
#[must_use]
pub fn weekly_rule_text(days: WeekdaySet, count: u32) -> String {
    let byday: Vec<&str> = days.iter().map(byday_code).collect();
    format!("FREQ=WEEKLY;COUNT={count};BYDAY={}", byday.join(","))
}

/// Anchor and rule parts shared by the structured and text exports.
struct WeeklyRule {
    dt_start: DateTime<Tz>,
    days: WeekdaySet,
    count: u32,
}

impl WeeklyRule {
    fn rule_text(&self) -> String {
        weekly_rule_text(self.days, self.count)
    }

    fn dtstart_line(&self) -> String {
        let local = self.dt_start.format("%Y%m%dT%H%M%S");
        if self.dt_start.timezone() == Tz::UTC {
            format!("DTSTART:{local}Z")
        } else {
            format!("DTSTART;TZID={}:{local}", self.dt_start.timezone().name())
        }
    }
}

impl<C: Clock> RecurringScheduleGenerator<C> {
    fn weekly_rule(&self, spec: &WeeklyScheduleSpec) -> CalendarResult<WeeklyRule> {
        let time: TimeOfDay = spec.time_of_day.parse()?;
        let tz = resolve_timezone(&spec.timezone)?;

        let days = self.day_names().resolve(&spec.days).weekdays;
        if days.is_empty() {
            return Err(SpecViolation::NoOccurrences("no recognized weekday").into());
        }
        let count = self.limits().clamp_count(spec.count);
        if count == 0 {
            return Err(SpecViolation::NoOccurrences("count is zero").into());
        }

        let first_date = (0..7)
            .filter_map(|offset| spec.start_date.checked_add_days(Days::new(offset)))
            .find(|date| days.contains(date.weekday()))
            .ok_or_else(|| CalendarError::RRule("start date out of range".to_string()))?;
        let dt_start = anchor_local(first_date, time.as_naive(), tz)
            .map_err(|err| CalendarError::RRule(err.to_string()))?;

        Ok(WeeklyRule {
            dt_start,
            days,
            count,
        })
    }

    /// ## Summary
    /// Builds the recurrence rule set equivalent to `spec`.
    ///
    /// `DTSTART` is the first selected weekday on or after the start date, at
    /// the schedule's time in its timezone; `COUNT` is the clamped count.
    /// The safety horizon and past-date skipping have no RRULE counterpart
    /// and are not applied.
    ///
    /// ## Errors
    /// Returns `CalendarError::InvalidScheduleSpec` if the time of day or
    /// timezone is invalid, or if no day resolves or the clamped count is
    /// zero. Returns `CalendarError::RRule` if the rule fails validation.
    pub fn export_rrule(&self, spec: &WeeklyScheduleSpec) -> CalendarResult<RRuleSet> {
        let rule = self.weekly_rule(spec)?;
        let rule_text = rule.rule_text();
        tracing::trace!(rrule = %rule_text, dtstart = %rule.dt_start, "Built weekly RRULE");

        let rrule = rule_text
            .parse::<RRule<Unvalidated>>()
            .map_err(|err| CalendarError::RRule(err.to_string()))?;

        rrule
            .build(rule.dt_start.with_timezone(&rrule::Tz::Tz(rule.dt_start.timezone())))
            .map_err(|err| CalendarError::RRule(err.to_string()))
    }

    /// ## Summary
    /// Renders `spec` as iCalendar text: a `DTSTART` line in the schedule's
    /// timezone and an `RRULE:FREQ=WEEKLY;COUNT=n;BYDAY=...` line with days
    /// in Sunday-first order.
    ///
    /// ## Errors
    /// Same as [`Self::export_rrule`].
    pub fn export_rrule_text(&self, spec: &WeeklyScheduleSpec) -> CalendarResult<String> {
        let rule = self.weekly_rule(spec)?;
        Ok(format!("{}\nRRULE:{}", rule.dtstart_line(), rule.rule_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDate, TimeZone, Utc};
    use halaqa_core::config::GenerationLimits;

    fn generator() -> RecurringScheduleGenerator<FixedClock> {
        RecurringScheduleGenerator::with_clock(
            FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            GenerationLimits::default(),
        )
    }

    #[test]
    fn test_weekly_rule_text_orders_days_sunday_first() {
        let days: WeekdaySet = [Weekday::Wed, Weekday::Sun].into_iter().collect();
        assert_eq!(weekly_rule_text(days, 4), "FREQ=WEEKLY;COUNT=4;BYDAY=SU,WE");
    }

    #[test]
    fn test_export_starts_on_first_matching_weekday() {
        // 2024-06-03 is a Monday; first Wednesday is 2024-06-05
        let spec = WeeklyScheduleSpec::new(
            ["wednesday", "الأحد"],
            "17:30",
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            4,
            "Asia/Riyadh",
        );

        let set = generator().export_rrule(&spec).expect("valid rule");
        let dates = set.all(10).dates;

        assert_eq!(dates.len(), 4);
        assert_eq!(
            dates[0].with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 6, 5, 14, 30, 0).unwrap()
        );
        assert_eq!(
            dates[1].with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 6, 9, 14, 30, 0).unwrap()
        );

        let text = generator().export_rrule_text(&spec).expect("valid rule");
        assert_eq!(
            text,
            "DTSTART;TZID=Asia/Riyadh:20240605T173000\nRRULE:FREQ=WEEKLY;COUNT=4;BYDAY=SU,WE"
        );
    }

    #[test]
    fn test_export_text_expands_like_rule_set() {
        let spec = WeeklyScheduleSpec::new(
            ["monday", "thursday"],
            "08:15",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            6,
            "UTC",
        );

        let text = generator().export_rrule_text(&spec).expect("valid rule");
        assert_eq!(
            text,
            "DTSTART:20240304T081500Z\nRRULE:FREQ=WEEKLY;COUNT=6;BYDAY=MO,TH"
        );

        let parsed: RRuleSet = text.parse().expect("text is valid iCalendar");
        let built = generator().export_rrule(&spec).expect("valid rule");
        assert_eq!(parsed.all(10).dates, built.all(10).dates);
    }

    #[test]
    fn test_export_clamps_count() {
        let spec = WeeklyScheduleSpec::new(
            ["monday"],
            "08:00",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            1000,
            "UTC",
        );

        let set = generator().export_rrule(&spec).expect("valid rule");
        assert_eq!(set.all(u16::MAX).dates.len(), 100);
    }

    #[test]
    fn test_export_rejects_schedules_without_occurrences() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let no_days = WeeklyScheduleSpec::new(["someday"], "08:00", start, 3, "UTC");
        assert!(matches!(
            generator().export_rrule(&no_days),
            Err(CalendarError::InvalidScheduleSpec(SpecViolation::NoOccurrences(_)))
        ));

        let no_count = WeeklyScheduleSpec::new(["monday"], "08:00", start, 0, "UTC");
        assert!(matches!(
            generator().export_rrule(&no_count),
            Err(CalendarError::InvalidScheduleSpec(SpecViolation::NoOccurrences(_)))
        ));
    }
}
