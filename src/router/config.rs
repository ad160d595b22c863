//! Tuning parameters for the route search.

use thiserror::Error;

use crate::shared::{
    geo::Distance,
    time::{self, Duration},
};

pub const MAX_WALKING_DISTANCE_KEY: &str = "MAX_WALKING_DISTANCE";
pub const WALKING_SPEED_KEY: &str = "WALKING_SPEED";
pub const MINUTES_PER_STOP_KEY: &str = "MINUTES_PER_STOP";
pub const MIN_STOPS_AHEAD_KEY: &str = "MIN_STOPS_AHEAD";
pub const LOOKAHEAD_STOPS_KEY: &str = "TRANSFER_LOOKAHEAD_STOPS";
pub const OVER_COLLECTION_KEY: &str = "TRANSFER_OVER_COLLECTION";

/// Largest accepted `MINUTES_PER_STOP`.
pub const MAX_MINUTES_PER_STOP: u32 = 60;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} could not be parsed from {value:?}")]
    Unparsable { key: &'static str, value: String },
    #[error("{key} must be {expected}, got {value}")]
    OutOfRange {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Configuration for direct and transfer searches.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Furthest a traveller is asked to walk for any single walking leg.
    pub max_walking_distance: Distance,

    /// Walking speed in meters per minute.
    pub walking_speed: f64,

    /// In-vehicle minutes charged for every stop travelled.
    pub minutes_per_stop: u32,

    /// Stops that must remain on a route after the boarding stop for the
    /// route to be used as a leg of a transfer itinerary.
    pub min_stops_ahead: u32,

    /// How far past the boarding stop the second leg is scanned for a stop
    /// near the destination.
    pub lookahead_stops: u32,

    /// The transfer search stops once it has accepted
    /// `max_results * over_collection_factor` itineraries.
    pub over_collection_factor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_walking_distance: Distance::from_meters(500.0),
            walking_speed: 80.0,
            minutes_per_stop: 3,
            min_stops_ahead: 5,
            lookahead_stops: 20,
            over_collection_factor: 5,
        }
    }
}

impl SearchConfig {
    /// Reads overrides from the process environment. Unset keys keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SearchConfig::from_env`] with a custom source of values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(MAX_WALKING_DISTANCE_KEY) {
            let meters: f64 = parse(MAX_WALKING_DISTANCE_KEY, &value)?;
            if !meters.is_finite() || meters < 0.0 {
                return Err(out_of_range(MAX_WALKING_DISTANCE_KEY, "a non negative number", value));
            }
            config.max_walking_distance = Distance::from_meters(meters);
        }
        if let Some(value) = lookup(WALKING_SPEED_KEY) {
            let speed: f64 = parse(WALKING_SPEED_KEY, &value)?;
            if !speed.is_finite() || speed <= 0.0 {
                return Err(out_of_range(WALKING_SPEED_KEY, "greater than zero", value));
            }
            config.walking_speed = speed;
        }
        if let Some(value) = lookup(MINUTES_PER_STOP_KEY) {
            let minutes: u32 = parse(MINUTES_PER_STOP_KEY, &value)?;
            if !(1..=MAX_MINUTES_PER_STOP).contains(&minutes) {
                return Err(out_of_range(MINUTES_PER_STOP_KEY, "between 1 and 60", value));
            }
            config.minutes_per_stop = minutes;
        }
        if let Some(value) = lookup(MIN_STOPS_AHEAD_KEY) {
            config.min_stops_ahead = parse(MIN_STOPS_AHEAD_KEY, &value)?;
        }
        if let Some(value) = lookup(LOOKAHEAD_STOPS_KEY) {
            config.lookahead_stops = parse(LOOKAHEAD_STOPS_KEY, &value)?;
        }
        if let Some(value) = lookup(OVER_COLLECTION_KEY) {
            let factor: usize = parse(OVER_COLLECTION_KEY, &value)?;
            if factor == 0 {
                return Err(out_of_range(OVER_COLLECTION_KEY, "at least 1", value));
            }
            config.over_collection_factor = factor;
        }
        Ok(config)
    }

    pub fn with_max_walking_distance(mut self, distance: Distance) -> Self {
        self.max_walking_distance = distance;
        self
    }

    pub fn with_min_stops_ahead(mut self, stops: u32) -> Self {
        self.min_stops_ahead = stops;
        self
    }

    pub fn with_lookahead_stops(mut self, stops: u32) -> Self {
        self.lookahead_stops = stops;
        self
    }

    pub fn with_over_collection_factor(mut self, factor: usize) -> Self {
        self.over_collection_factor = factor;
        self
    }

    /// Walking time for a distance, rounded to whole minutes.
    pub fn walking_time(&self, distance: Distance) -> Duration {
        time::walking_time(distance, self.walking_speed)
    }

    pub fn bus_time(&self, stops: u32) -> Duration {
        time::bus_time(stops, self.minutes_per_stop)
    }

    /// Number of itineraries the transfer search may accept before it stops.
    pub fn transfer_quota(&self, max_results: usize) -> usize {
        max_results.saturating_mul(self.over_collection_factor)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Unparsable {
        key,
        value: value.to_string(),
    })
}

fn out_of_range(key: &'static str, expected: &'static str, value: String) -> ConfigError {
    ConfigError::OutOfRange {
        key,
        expected,
        value,
    }
}
