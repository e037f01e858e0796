//! Epochs at which time-varying frame relationships are evaluated.
//!
//! An [`Epoch`] is a point on a uniform time scale, stored as seconds past
//! J2000.0 (2000-01-01 12:00:00). Which physical time standard the seconds
//! belong to is decided by whoever builds the epochs; the frame graph only ever
//! orders epochs and takes differences between them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uom::si::f64::Time;
use uom::si::time::{day, second};

/// Julian date of the J2000.0 reference epoch.
pub const J2000_JULIAN_DATE: f64 = 2_451_545.0;

/// Length of a Julian year in days.
pub const JULIAN_YEAR_DAYS: f64 = 365.25;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Epoch {
    seconds_since_j2000: f64,
}

impl Epoch {
    pub const J2000: Epoch = Epoch {
        seconds_since_j2000: 0.0,
    };

    pub fn from_seconds_since_j2000(seconds: f64) -> Self {
        Self {
            seconds_since_j2000: seconds,
        }
    }

    pub fn from_julian_date(julian_date: f64) -> Self {
        let elapsed = Time::new::<day>(julian_date - J2000_JULIAN_DATE);
        Self::from_seconds_since_j2000(elapsed.get::<second>())
    }

    pub fn seconds_since_j2000(&self) -> f64 {
        self.seconds_since_j2000
    }

    pub fn julian_date(&self) -> f64 {
        J2000_JULIAN_DATE + Time::new::<second>(self.seconds_since_j2000).get::<day>()
    }

    /// Signed time elapsed from `other` to `self`.
    pub fn relative_to(&self, other: &Epoch) -> Time {
        Time::new::<second>(self.seconds_since_j2000 - other.seconds_since_j2000)
    }

    /// Shorthand for `relative_to(other)` in seconds.
    pub fn seconds_since(&self, other: &Epoch) -> f64 {
        self.relative_to(other).get::<second>()
    }

    pub fn add(&self, offset: Time) -> Epoch {
        Self::from_seconds_since_j2000(self.seconds_since_j2000 + offset.get::<second>())
    }
}

impl PartialEq for Epoch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Epoch {}

impl PartialOrd for Epoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Epoch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds_since_j2000.total_cmp(&other.seconds_since_j2000)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J2000{:+}s", self.seconds_since_j2000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_julian_date_round_trip() {
        let epoch = Epoch::from_julian_date(J2000_JULIAN_DATE + 1.5);
        assert_relative_eq!(epoch.seconds_since_j2000(), 1.5 * 86_400.0);
        assert_relative_eq!(epoch.julian_date(), J2000_JULIAN_DATE + 1.5);
    }

    #[test]
    fn test_ordering_and_difference() {
        let early = Epoch::from_seconds_since_j2000(-10.0);
        let late = Epoch::from_seconds_since_j2000(20.0);
        assert!(early < late);
        assert_eq!(early.max(late), late);
        assert_relative_eq!(late.seconds_since(&early), 30.0);
        assert_relative_eq!(early.seconds_since(&late), -30.0);
        assert_eq!(early.add(Time::new::<second>(30.0)), late);
    }

    #[test]
    fn test_j2000_is_default() {
        assert_eq!(Epoch::default(), Epoch::J2000);
        assert_relative_eq!(Epoch::J2000.julian_date(), J2000_JULIAN_DATE);
    }
}
