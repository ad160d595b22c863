use rayon::prelude::*;

use crate::{
    repository::{Route, Stop},
    shared::geo::{Coordinate, Distance},
};

/// The best stop on a route for a given point.
#[derive(Debug, Clone, Copy)]
pub struct BoardingCandidate<'a> {
    pub route: &'a Route,
    pub stop: &'a Stop,
    pub distance: Distance,
    pub stops_ahead: u32,
}

impl BoardingCandidate<'_> {
    /// Walking distance in whole meters. Walking legs to and from a located
    /// stop are timed from this value.
    pub fn walking_meters(&self) -> u32 {
        self.distance.rounded_meters()
    }
}

/// Finds boarding and alighting stops within walking range of a point.
#[derive(Debug, Clone, Copy)]
pub struct Locator<'a> {
    routes: &'a [Route],
    max_distance: Distance,
}

impl<'a> Locator<'a> {
    pub fn new(routes: &'a [Route], max_distance: Distance) -> Self {
        Self {
            routes,
            max_distance,
        }
    }

    /// Closest stop on `route` within walking range of `point`.
    ///
    /// With `min_stops_ahead > 0` stops too close to the end of the route are
    /// skipped. On equal distance the earliest stop of the route wins.
    pub fn nearest_stop(
        &self,
        route: &'a Route,
        point: &Coordinate,
        min_stops_ahead: u32,
    ) -> Option<BoardingCandidate<'a>> {
        let mut best: Option<BoardingCandidate<'a>> = None;
        for stop in route.stops.iter() {
            let distance = point.distance(&stop.coordinate);
            if distance > self.max_distance {
                continue;
            }
            let stops_ahead = route.stops_ahead(stop);
            if min_stops_ahead > 0 && stops_ahead < min_stops_ahead {
                continue;
            }
            if best.is_none_or(|best| distance < best.distance) {
                best = Some(BoardingCandidate {
                    route,
                    stop,
                    distance,
                    stops_ahead,
                });
            }
        }
        best
    }

    /// Runs [`Locator::nearest_stop`] over every route, skipping routes whose
    /// line name is `excluded_line`.
    ///
    /// Sorted by most stops ahead first, then by shortest walk.
    /// Remaining ties keep dataset order.
    pub fn boardable_routes(
        &self,
        point: &Coordinate,
        min_stops_ahead: u32,
        excluded_line: Option<&str>,
    ) -> Vec<BoardingCandidate<'a>> {
        let mut candidates: Vec<BoardingCandidate<'a>> = self
            .routes
            .par_iter()
            .filter(|route| excluded_line.is_none_or(|line| route.name.as_ref() != line))
            .filter_map(|route| self.nearest_stop(route, point, min_stops_ahead))
            .collect();
        candidates.par_sort_by(|a, b| {
            b.stops_ahead
                .cmp(&a.stops_ahead)
                .then_with(|| a.walking_meters().cmp(&b.walking_meters()))
        });
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::{Network, NetworkDirection, NetworkRoute, NetworkStop},
        repository::Repository,
    };

    // Roughly 111 m per 0.001 degree of latitude.
    fn route(id: &str, name: &str, latitudes: &[f64]) -> NetworkRoute {
        NetworkRoute {
            id: id.into(),
            bus_name: name.into(),
            route_type: None,
            direction: NetworkDirection::Aller,
            stops: latitudes
                .iter()
                .enumerate()
                .map(|(i, latitude)| NetworkStop {
                    stop_number: i as u32 + 1,
                    stop_name: format!("{id} #{}", i + 1),
                    latitude: *latitude,
                    longitude: 10.0,
                })
                .collect(),
        }
    }

    fn repository(routes: Vec<NetworkRoute>) -> Repository {
        Repository::new()
            .load_network(Network::new().with_routes(routes))
            .unwrap()
    }

    #[test]
    fn picks_closest_stop_within_radius() {
        let repository = repository(vec![route("a", "1", &[36.000, 36.003, 36.010])]);
        let locator = Locator::new(repository.routes(), Distance::from_meters(500.0));
        let point = Coordinate::new(36.0035, 10.0);

        let found = locator
            .nearest_stop(&repository.routes()[0], &point, 0)
            .unwrap();
        assert_eq!(found.stop.number, 2);
        assert_eq!(found.walking_meters(), 56);
        assert_eq!(found.stops_ahead, 1);
    }

    #[test]
    fn nothing_in_radius() {
        let repository = repository(vec![route("a", "1", &[36.000, 36.010])]);
        let locator = Locator::new(repository.routes(), Distance::from_meters(500.0));
        let point = Coordinate::new(36.05, 10.0);

        assert!(locator.nearest_stop(&repository.routes()[0], &point, 0).is_none());
        assert!(locator.boardable_routes(&point, 0, None).is_empty());
    }

    #[test]
    fn radius_is_inclusive() {
        let repository = repository(vec![route("a", "1", &[36.000])]);
        let point = Coordinate::new(36.001, 10.0);
        let exact = point.distance(&repository.routes()[0].stops[0].coordinate);
        let locator = Locator::new(repository.routes(), exact);

        assert!(locator.nearest_stop(&repository.routes()[0], &point, 0).is_some());
    }

    #[test]
    fn ties_go_to_the_earliest_stop() {
        // Stops 1 and 3 are both at the same distance of the point.
        let repository = repository(vec![route("a", "1", &[36.000, 36.010, 36.000])]);
        let locator = Locator::new(repository.routes(), Distance::from_meters(500.0));
        let point = Coordinate::new(36.001, 10.0);

        let found = locator
            .nearest_stop(&repository.routes()[0], &point, 0)
            .unwrap();
        assert_eq!(found.stop.number, 1);
    }

    #[test]
    fn min_stops_ahead_skips_the_end_of_the_route() {
        // Eight stops, the point sits on stop 6 which only has 2 stops ahead.
        let latitudes: Vec<f64> = (0..8).map(|i| 36.0 + i as f64 * 0.01).collect();
        let repository = repository(vec![route("a", "1", &latitudes)]);
        let locator = Locator::new(repository.routes(), Distance::from_meters(2000.0));
        let point = Coordinate::new(36.05, 10.0);

        let any = locator
            .nearest_stop(&repository.routes()[0], &point, 0)
            .unwrap();
        assert_eq!(any.stop.number, 6);

        // Stop 5 is 1.1 km away but still has 3 stops ahead.
        let boarding = locator
            .nearest_stop(&repository.routes()[0], &point, 3)
            .unwrap();
        assert_eq!(boarding.stop.number, 5);
        assert_eq!(boarding.stops_ahead, 3);

        assert!(locator
            .nearest_stop(&repository.routes()[0], &point, 5)
            .is_none());
    }

    #[test]
    fn boardable_routes_ordering_and_exclusion() {
        let repository = repository(vec![
            route("short", "1", &[36.000, 36.020, 36.030]),
            route("long_far", "2", &[36.003, 36.02, 36.03, 36.04, 36.05]),
            route("long_near", "3", &[36.001, 36.02, 36.03, 36.04, 36.05]),
            route("long_near_too", "3", &[36.001, 36.02, 36.03, 36.04, 36.05]),
        ]);
        let locator = Locator::new(repository.routes(), Distance::from_meters(500.0));
        let point = Coordinate::new(36.0, 10.0);

        let ids: Vec<&str> = locator
            .boardable_routes(&point, 0, None)
            .iter()
            .map(|candidate| candidate.route.id.as_ref())
            .collect();
        assert_eq!(ids, ["long_near", "long_near_too", "long_far", "short"]);

        let ids: Vec<&str> = locator
            .boardable_routes(&point, 0, Some("3"))
            .iter()
            .map(|candidate| candidate.route.id.as_ref())
            .collect();
        assert_eq!(ids, ["long_far", "short"]);
    }
}
