use std::fmt::Display;

use serde::Serialize;

use crate::{
    repository::{Direction, Route, Stop},
    shared::{geo::Coordinate, time::Duration},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRef {
    pub id: String,
    pub line: String,
    pub direction: Direction,
}

impl From<&Route> for RouteRef {
    fn from(value: &Route) -> Self {
        Self {
            id: value.id.to_string(),
            line: value.name.to_string(),
            direction: value.direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRef {
    pub name: String,
    pub number: u32,
    pub coordinate: Coordinate,
}

impl From<&Stop> for StopRef {
    fn from(value: &Stop) -> Self {
        Self {
            name: value.name.to_string(),
            number: value.number,
            coordinate: value.coordinate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    SameStop,
    Backwards,
}

impl Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::SameStop => f.write_str("Start and end are the same stop"),
            InvalidReason::Backwards => {
                f.write_str("Would require traveling backwards (try opposite direction)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Validation {
    Valid { stops_count: u32, bus_time: Duration },
    Invalid { reason: InvalidReason },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Walking {
    pub to_board_meters: u32,
    pub to_board: Duration,
    pub from_alight_meters: u32,
    pub from_alight: Duration,
}

/// A single route considered as a direct connection. Invalid candidates are
/// kept so callers can tell a traveller to try the opposite direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectItinerary {
    pub route: RouteRef,
    pub board: StopRef,
    pub alight: StopRef,
    pub walking: Walking,
    pub validation: Validation,
    /// None when the candidate is invalid.
    pub total_time: Option<Duration>,
}

impl DirectItinerary {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waypoint {
    Origin { coordinate: Coordinate },
    Stop(StopRef),
    Destination { coordinate: Coordinate },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkSegment {
    pub from: Waypoint,
    pub to: Waypoint,
    pub distance_meters: u32,
    pub duration: Duration,
}

impl WalkSegment {
    pub fn is_transfer(&self) -> bool {
        matches!(
            (&self.from, &self.to),
            (Waypoint::Stop(_), Waypoint::Stop(_))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusSegment {
    pub route: RouteRef,
    pub board: StopRef,
    pub alight: StopRef,
    pub stops_count: u32,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Walk(WalkSegment),
    Bus(BusSegment),
}

impl Segment {
    pub fn duration(&self) -> Duration {
        match self {
            Segment::Walk(walk) => walk.duration,
            Segment::Bus(bus) => bus.duration,
        }
    }

    /// Walking meters of the segment, zero for bus segments.
    pub fn walking_meters(&self) -> u32 {
        match self {
            Segment::Walk(walk) => walk.distance_meters,
            Segment::Bus(_) => 0,
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, Segment::Walk(_))
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Walk(walk) => match &walk.to {
                Waypoint::Stop(stop) if walk.is_transfer() => {
                    f.write_fmt(format_args!("Walk to {} for transfer", stop.name))
                }
                Waypoint::Stop(stop) => f.write_fmt(format_args!("Walk to {}", stop.name)),
                Waypoint::Destination { .. } => f.write_str("Walk to destination"),
                Waypoint::Origin { .. } => f.write_str("Walk to origin"),
            },
            Segment::Bus(bus) => f.write_fmt(format_args!(
                "Take Bus {} ({})",
                bus.route.line, bus.route.direction
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub description: String,
    /// Sum of the rounded meters of the three walking segments.
    pub total_walking_meters: u32,
    pub total_bus_stops: u32,
    pub total_transfers: u32,
    pub lines: [String; 2],
}

/// Walk, bus, walk, bus, walk. Only ever built complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferItinerary {
    pub first: RouteRef,
    pub second: RouteRef,
    /// Where the first bus is left.
    pub transfer_from: StopRef,
    /// Where the second bus is boarded.
    pub transfer_to: StopRef,
    pub segments: [Segment; 5],
    pub total_time: Duration,
    pub summary: Summary,
}

impl TransferItinerary {
    pub(crate) fn new(segments: [Segment; 5]) -> Option<Self> {
        let [
            Segment::Walk(_),
            Segment::Bus(first),
            Segment::Walk(_),
            Segment::Bus(second),
            Segment::Walk(_),
        ] = &segments
        else {
            return None;
        };

        let total_time = segments.iter().map(Segment::duration).sum();
        let summary = Summary {
            description: format!(
                "Take Bus {}, transfer to Bus {}",
                first.route.line, second.route.line
            ),
            total_walking_meters: segments.iter().map(Segment::walking_meters).sum(),
            total_bus_stops: first.stops_count + second.stops_count,
            total_transfers: 1,
            lines: [first.route.line.clone(), second.route.line.clone()],
        };
        Some(Self {
            first: first.route.clone(),
            second: second.route.clone(),
            transfer_from: first.alight.clone(),
            transfer_to: second.board.clone(),
            total_time,
            summary,
            segments,
        })
    }

    pub fn instructions(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| segment.to_string())
            .collect()
    }
}
