//! Clock abstraction for "accessed" stamps.
//!
//! Moving a `url` or `howpublished` value into `note` embeds the month and
//! year of normalization. That wall-clock dependency is isolated behind
//! [`Clock`] so tests (and reproducible builds of a bibliography) can pin
//! the stamp with [`FixedClock`].

use chrono::{Datelike, Local, Month};

/// A source for the current month and year.
pub trait Clock {
    /// The month and year to embed in "accessed" stamps.
    fn month_year(&self) -> (Month, i32);
}

/// The real wall clock, in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn month_year(&self) -> (Month, i32) {
        let now = Local::now();
        let month = Month::try_from(now.month() as u8).expect("calendar months are 1-12");
        (month, now.year())
    }
}

/// A clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub month: Month,
    pub year: i32,
}

impl Clock for FixedClock {
    fn month_year(&self) -> (Month, i32) {
        (self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_deterministic() {
        let clock = FixedClock {
            month: Month::June,
            year: 2014,
        };
        assert_eq!(clock.month_year(), (Month::June, 2014));
        assert_eq!(clock.month_year().0.name(), "June");
    }

    #[test]
    fn test_system_clock_yields_plausible_year() {
        let (_, year) = SystemClock.month_year();
        assert!(year >= 2024);
    }
}
