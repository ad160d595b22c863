use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::{
    repository::{Route, Stop},
    router::{
        Router,
        itinerary::{BusSegment, Segment, TransferItinerary, WalkSegment, Waypoint},
        locator::BoardingCandidate,
    },
    shared::geo::{Coordinate, Distance},
};

/// Identifies one evaluation of the second leg: the first route, where it is
/// left, the second route and where it is boarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombinationKey {
    pub first_route: u32,
    pub transfer_stop: u32,
    pub second_route: u32,
    pub boarding_stop: u32,
}

impl CombinationKey {
    pub fn new(first_route: &Route, transfer: &Stop, second_route: &Route, boarding: &Stop) -> Self {
        Self {
            first_route: first_route.index,
            transfer_stop: transfer.number,
            second_route: second_route.index,
            boarding_stop: boarding.number,
        }
    }
}

/// Upper bound on the number of itineraries a single transfer search builds.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    limit: usize,
    used: usize,
}

impl Quota {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }

    fn consume(&mut self) {
        self.used += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Routes boardable near the origin.
    pub first_leg_candidates: usize,
    /// Stops of first-leg routes where a transfer was looked for.
    pub transfer_points: usize,
    /// Distinct combinations whose second leg was scanned.
    pub combinations_evaluated: usize,
    /// Combinations skipped because they were already scanned.
    pub duplicate_combinations: usize,
    pub itineraries_built: usize,
    pub quota: usize,
    pub quota_reached: bool,
}

#[derive(Debug, Clone)]
pub struct TransferSearch {
    /// Best itineraries first, at most the requested number.
    pub itineraries: Vec<TransferItinerary>,
    pub stats: SearchStats,
}

/// Accepted itineraries and evaluated combinations of one query.
/// Append only, owned by the thread driving the search.
#[derive(Debug)]
struct Collector {
    quota: Quota,
    evaluated: HashSet<CombinationKey>,
    accepted: Vec<TransferItinerary>,
    stats: SearchStats,
}

impl Collector {
    fn new(quota: Quota) -> Self {
        Self {
            quota,
            evaluated: HashSet::new(),
            accepted: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    fn is_full(&self) -> bool {
        self.quota.is_exhausted()
    }

    /// Returns false if the combination was already evaluated.
    fn mark_evaluated(&mut self, key: CombinationKey) -> bool {
        if self.evaluated.insert(key) {
            self.stats.combinations_evaluated += 1;
            true
        } else {
            self.stats.duplicate_combinations += 1;
            false
        }
    }

    fn accept(&mut self, itinerary: TransferItinerary) {
        self.quota.consume();
        self.accepted.push(itinerary);
    }

    fn finish(mut self, max_results: usize) -> TransferSearch {
        self.stats.itineraries_built = self.accepted.len();
        self.stats.quota = self.quota.limit;
        self.stats.quota_reached = self.quota.is_exhausted();
        self.accepted.par_sort_by_key(|itinerary| itinerary.total_time);
        self.accepted.truncate(max_results);
        TransferSearch {
            itineraries: self.accepted,
            stats: self.stats,
        }
    }
}

/// Everything needed to build one itinerary.
struct Legs<'a, 'b> {
    from: Coordinate,
    to: Coordinate,
    first: &'b BoardingCandidate<'a>,
    transfer: &'a Stop,
    second: &'b BoardingCandidate<'a>,
    alight: &'a Stop,
    to_destination: Distance,
}

impl<'a> Router<'a> {
    /// One-transfer itineraries from `from` to `to`, fastest first.
    pub fn transfer_routes(
        &self,
        from: Coordinate,
        to: Coordinate,
        max_results: usize,
    ) -> Vec<TransferItinerary> {
        self.transfer_search(from, to, max_results).itineraries
    }

    /// Same as [`Router::transfer_routes`], also reporting how much work the
    /// search did.
    ///
    /// The search is bounded and will miss itineraries that need more than
    /// `lookahead_stops` stops on the second bus, or that would only be found
    /// after `max_results * over_collection_factor` itineraries were accepted.
    pub fn transfer_search(
        &self,
        from: Coordinate,
        to: Coordinate,
        max_results: usize,
    ) -> TransferSearch {
        let locator = self.locator();
        let min_stops_ahead = self.config.min_stops_ahead;
        let mut collector = Collector::new(Quota::new(self.config.transfer_quota(max_results)));

        let first_legs = locator.boardable_routes(&from, min_stops_ahead, None);
        collector.stats.first_leg_candidates = first_legs.len();
        debug!("Got {} usable routes near origin", first_legs.len());

        for first in first_legs.iter() {
            if collector.is_full() {
                break;
            }
            debug!(
                "Checking {} ({}) from stop #{} with {} stops ahead",
                first.route.name, first.route.direction, first.stop.number, first.stops_ahead
            );

            for transfer in first.route.stops_after(first.stop.number) {
                if collector.is_full() {
                    break;
                }
                collector.stats.transfer_points += 1;

                let second_legs = locator.boardable_routes(
                    &transfer.coordinate,
                    min_stops_ahead,
                    Some(&first.route.name),
                );
                for second in second_legs.iter() {
                    if collector.is_full() {
                        break;
                    }
                    let key = CombinationKey::new(first.route, transfer, second.route, second.stop);
                    if !collector.mark_evaluated(key) {
                        continue;
                    }

                    for (alight, to_destination) in self.destination_stops(second, &to) {
                        if collector.is_full() {
                            break;
                        }
                        let legs = Legs {
                            from,
                            to,
                            first,
                            transfer,
                            second,
                            alight,
                            to_destination,
                        };
                        if let Some(itinerary) = self.transfer_itinerary(&legs) {
                            trace!(
                                "Found {} -> {} in {}",
                                first.route.name, second.route.name, itinerary.total_time
                            );
                            collector.accept(itinerary);
                        }
                    }
                }
            }
        }

        let search = collector.finish(max_results);
        debug!(
            "Transfer search built {} itineraries, returning {}",
            search.stats.itineraries_built,
            search.itineraries.len()
        );
        search
    }

    /// Stops of the second route, after boarding and no further than the
    /// lookahead, within walking range of the destination.
    fn destination_stops<'b>(
        &'b self,
        second: &'b BoardingCandidate<'a>,
        to: &'b Coordinate,
    ) -> impl Iterator<Item = (&'a Stop, Distance)> + 'b {
        let boarding = second.stop.number;
        let lookahead = self.config.lookahead_stops;
        let max_distance = self.config.max_walking_distance;
        second
            .route
            .stops_after(boarding)
            .take_while(move |stop| stop.number - boarding <= lookahead)
            .map(move |stop| (stop, stop.coordinate.distance(to)))
            .filter(move |(_, distance)| *distance <= max_distance)
    }

    /// Builds the five segments, or nothing if the transfer walk is too long.
    fn transfer_itinerary(&self, legs: &Legs<'a, '_>) -> Option<TransferItinerary> {
        let transfer_distance = legs
            .transfer
            .coordinate
            .distance(&legs.second.stop.coordinate);
        if transfer_distance > self.config.max_walking_distance {
            return None;
        }

        let first_walk_meters = legs.first.walking_meters();
        let first_stops = legs.transfer.number - legs.first.stop.number;
        let second_stops = legs.alight.number - legs.second.stop.number;

        TransferItinerary::new([
            Segment::Walk(WalkSegment {
                from: Waypoint::Origin {
                    coordinate: legs.from,
                },
                to: Waypoint::Stop(legs.first.stop.into()),
                distance_meters: first_walk_meters,
                duration: self
                    .config
                    .walking_time(Distance::from_meters(first_walk_meters.into())),
            }),
            Segment::Bus(BusSegment {
                route: legs.first.route.into(),
                board: legs.first.stop.into(),
                alight: legs.transfer.into(),
                stops_count: first_stops,
                duration: self.config.bus_time(first_stops),
            }),
            Segment::Walk(WalkSegment {
                from: Waypoint::Stop(legs.transfer.into()),
                to: Waypoint::Stop(legs.second.stop.into()),
                distance_meters: transfer_distance.rounded_meters(),
                duration: self.config.walking_time(transfer_distance),
            }),
            Segment::Bus(BusSegment {
                route: legs.second.route.into(),
                board: legs.second.stop.into(),
                alight: legs.alight.into(),
                stops_count: second_stops,
                duration: self.config.bus_time(second_stops),
            }),
            Segment::Walk(WalkSegment {
                from: Waypoint::Stop(legs.alight.into()),
                to: Waypoint::Destination {
                    coordinate: legs.to,
                },
                distance_meters: legs.to_destination.rounded_meters(),
                duration: self.config.walking_time(legs.to_destination),
            }),
        ])
    }
}
