//! Wall-clock source
//!
//! The report timestamp and the time-of-day recommendation read the local
//! clock through this trait so tests can pin the hour.

use chrono::{Local, NaiveDateTime};

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_fixed_clock() {
        let instant = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 15, 0))
            .unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now().hour(), 7);
        assert_eq!(clock.now(), clock.now());
    }
}
