use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::Serialize;

use crate::shared::geo::Distance;

/// Whole minutes. Every estimate in the engine is rounded to a minute
/// before it is added to anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Rounds fractional minutes to the nearest whole minute, half up.
    pub fn from_fractional_minutes(minutes: f64) -> Self {
        Self((minutes + 0.5).floor().max(0.0) as u32)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, duration| acc + duration)
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} min", self.0))
    }
}

/// Exact walking minutes for a distance at `meters_per_minute`.
pub fn walking_minutes(distance: Distance, meters_per_minute: f64) -> f64 {
    distance.as_meters() / meters_per_minute
}

/// Walking time rounded to whole minutes.
pub fn walking_time(distance: Distance, meters_per_minute: f64) -> Duration {
    Duration::from_fractional_minutes(walking_minutes(distance, meters_per_minute))
}

/// Coarse in-vehicle estimate: a fixed number of minutes per stop travelled.
/// This is not derived from any timetable. Saturates at `u32::MAX` minutes.
pub const fn bus_time(stops: u32, minutes_per_stop: u32) -> Duration {
    Duration::from_minutes(stops.saturating_mul(minutes_per_stop))
}

#[test]
fn rounding_half_up_test() {
    assert_eq!(Duration::from_fractional_minutes(1.5), Duration::from_minutes(2));
    assert_eq!(Duration::from_fractional_minutes(2.5), Duration::from_minutes(3));
    assert_eq!(Duration::from_fractional_minutes(2.49), Duration::from_minutes(2));
    assert_eq!(Duration::from_fractional_minutes(0.0), Duration::from_minutes(0));
}

#[test]
fn walking_time_test() {
    let time = walking_time(Distance::from_meters(400.0), 80.0);
    assert_eq!(time.as_minutes(), 5);
    let time = walking_time(Distance::from_meters(120.0), 80.0);
    assert_eq!(time.as_minutes(), 2);
}

#[test]
fn bus_time_test() {
    assert_eq!(bus_time(0, 3), Duration::from_minutes(0));
    assert_eq!(bus_time(7, 3), Duration::from_minutes(21));
    assert_eq!(bus_time(4, 3_000_000_000), Duration::from_minutes(u32::MAX));
}

#[test]
fn add_saturates_test() {
    let mut total = Duration::from_minutes(u32::MAX - 1) + Duration::from_minutes(5);
    assert_eq!(total.as_minutes(), u32::MAX);
    total += Duration::from_minutes(1);
    assert_eq!(total.as_minutes(), u32::MAX);
}

#[test]
fn sum_test() {
    let total: Duration = [1, 2, 3].into_iter().map(Duration::from_minutes).sum();
    assert_eq!(total.as_minutes(), 6);
}
