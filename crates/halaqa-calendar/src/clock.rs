//! Source of "now" for past-date skipping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Reads the current instant, expressed in a given timezone.
///
/// Generation reads the clock once per call, so a fixed clock makes
/// past-date skipping fully deterministic.
pub trait Clock: Send + Sync {
    fn now(&self, tz: Tz) -> DateTime<Tz>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        Utc::now().with_timezone(&tz)
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}

impl<T: chrono::TimeZone> From<DateTime<T>> for FixedClock {
    fn from(value: DateTime<T>) -> Self {
        Self::new(value.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        self.instant.with_timezone(&tz)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        (**self).now(tz)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        (**self).now(tz)
    }
}
