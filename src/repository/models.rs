use std::{fmt::Display, sync::Arc};

use serde::Serialize;

use crate::{
    network::{NetworkDirection, NetworkStop},
    shared::geo::Coordinate,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outbound,
    Return,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Outbound => f.write_str("outbound"),
            Direction::Return => f.write_str("return"),
        }
    }
}

impl From<NetworkDirection> for Direction {
    fn from(value: NetworkDirection) -> Self {
        match value {
            NetworkDirection::Aller => Self::Outbound,
            NetworkDirection::Retour => Self::Return,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Stop {
    /// Position along the route, strictly increasing in the direction of travel.
    pub number: u32,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
}

impl From<NetworkStop> for Stop {
    fn from(value: NetworkStop) -> Self {
        Self {
            number: value.stop_number,
            name: value.stop_name.into(),
            coordinate: Coordinate::new(value.latitude, value.longitude),
        }
    }
}

/// One direction of a bus line. The outbound and return directions of the
/// same line are two distinct routes sharing a `name`.
#[derive(Debug, Default, Clone)]
pub struct Route {
    /// Dense position of the route in dataset order.
    pub index: u32,
    pub id: Arc<str>,
    /// The line name, e.g. `"34"` or `"43 B"`.
    pub name: Arc<str>,
    pub direction: Direction,
    pub stops: Box<[Stop]>,
}

impl Route {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Stops left on the route from `stop`, counted the way the boarding
    /// filter counts them: total stops minus the stop number.
    pub fn stops_ahead(&self, stop: &Stop) -> u32 {
        (self.stops.len() as u32).saturating_sub(stop.number)
    }

    /// Stops strictly after `stop_number`, in travel order.
    pub fn stops_after(&self, stop_number: u32) -> impl Iterator<Item = &Stop> {
        self.stops
            .iter()
            .filter(move |stop| stop.number > stop_number)
    }
}
