use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

use crate::{
    router::{
        Router,
        itinerary::{DirectItinerary, InvalidReason, Validation, Walking},
        locator::BoardingCandidate,
    },
    shared::geo::{Coordinate, Distance},
};

impl<'a> Router<'a> {
    /// Every route as a single leg from `from` to `to`.
    ///
    /// A route contributes one itinerary when it has a stop within walking
    /// range of both points, valid or not. Valid itineraries come first,
    /// then everything is ordered by total time, ties in dataset order.
    pub fn direct_routes(&self, from: Coordinate, to: Coordinate) -> Vec<DirectItinerary> {
        let locator = self.locator();
        let mut itineraries: Vec<DirectItinerary> = self
            .repository
            .routes()
            .par_iter()
            .filter_map(|route| {
                let board = locator.nearest_stop(route, &from, 0)?;
                let alight = locator.nearest_stop(route, &to, 0)?;
                Some(self.direct_itinerary(&board, &alight))
            })
            .collect();
        itineraries.par_sort_by(compare_direct);
        debug!(
            "Direct search found {} candidates, {} valid",
            itineraries.len(),
            itineraries.iter().filter(|i| i.is_valid()).count()
        );
        itineraries
    }

    fn direct_itinerary(
        &self,
        board: &BoardingCandidate<'_>,
        alight: &BoardingCandidate<'_>,
    ) -> DirectItinerary {
        let validation = self.validate(board.stop.number, alight.stop.number);

        let to_board_meters = board.walking_meters();
        let from_alight_meters = alight.walking_meters();
        let walking = Walking {
            to_board_meters,
            to_board: self
                .config
                .walking_time(Distance::from_meters(to_board_meters.into())),
            from_alight_meters,
            from_alight: self
                .config
                .walking_time(Distance::from_meters(from_alight_meters.into())),
        };

        let total_time = match validation {
            Validation::Valid { bus_time, .. } => {
                Some(walking.to_board + bus_time + walking.from_alight)
            }
            Validation::Invalid { .. } => None,
        };

        DirectItinerary {
            route: board.route.into(),
            board: board.stop.into(),
            alight: alight.stop.into(),
            walking,
            validation,
            total_time,
        }
    }

    /// Travel is only possible forward, towards higher stop numbers.
    fn validate(&self, board: u32, alight: u32) -> Validation {
        if board == alight {
            Validation::Invalid {
                reason: InvalidReason::SameStop,
            }
        } else if alight < board {
            Validation::Invalid {
                reason: InvalidReason::Backwards,
            }
        } else {
            let stops_count = alight - board;
            Validation::Valid {
                stops_count,
                bus_time: self.config.bus_time(stops_count),
            }
        }
    }
}

fn compare_direct(a: &DirectItinerary, b: &DirectItinerary) -> Ordering {
    b.is_valid()
        .cmp(&a.is_valid())
        .then_with(|| match (a.total_time, b.total_time) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
