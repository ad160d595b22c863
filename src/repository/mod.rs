use std::{collections::HashMap, sync::Arc};

mod models;
pub use models::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    network::Network,
    router::{Router, SearchConfig},
};

type IdToIndex = HashMap<Arc<str>, usize>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("The network does not contain any routes")]
    EmptyNetwork,
    #[error("Route at position {0} has an empty id")]
    MissingRouteId(usize),
    #[error("Route {0} has an empty line name")]
    MissingLineName(String),
    #[error("Route id {0} appears more than once")]
    DuplicateRoute(String),
    #[error("Route {0} has no stops")]
    EmptyRoute(String),
    #[error("Route {route}: stop number {number} appears more than once")]
    DuplicateStop { route: String, number: u32 },
    #[error("Route {route}: stop {stop} has coordinates out of range")]
    InvalidCoordinate { route: String, stop: u32 },
}

/// The immutable bus network every search reads from.
/// Build it once with [`Repository::load_network`] and share it by reference.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    routes: Box<[Route]>,
    route_lookup: Arc<IdToIndex>,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    /// Converts and validates a raw network.
    /// Fails on the first malformed route; a partially loaded repository is never returned.
    pub fn load_network(mut self, network: Network) -> Result<Self, self::Error> {
        if network.routes.is_empty() {
            return Err(Error::EmptyNetwork);
        }

        info!("Loading {} routes...", network.routes.len());
        let mut route_lookup: IdToIndex = HashMap::new();
        let mut routes: Vec<Route> = Vec::with_capacity(network.routes.len());
        for (i, route) in network.routes.into_iter().enumerate() {
            let id = route.id.trim();
            if id.is_empty() {
                return Err(Error::MissingRouteId(i));
            }
            if route.bus_name.trim().is_empty() {
                return Err(Error::MissingLineName(id.to_string()));
            }
            if route.stops.is_empty() {
                return Err(Error::EmptyRoute(id.to_string()));
            }
            if route_lookup.contains_key(id) {
                return Err(Error::DuplicateRoute(id.to_string()));
            }

            let mut stops: Vec<Stop> = route.stops.into_iter().map(Stop::from).collect();
            if !stops.is_sorted_by_key(|stop| stop.number) {
                debug!("Reordering stops of {id} by stop number");
                stops.sort_by_key(|stop| stop.number);
            }
            validate_stops(id, &stops)?;

            let value = Route {
                index: i as u32,
                id: id.into(),
                name: route.bus_name.trim().into(),
                direction: route.direction.into(),
                stops: stops.into(),
            };
            route_lookup.insert(value.id.clone(), i);
            routes.push(value);
        }
        self.routes = routes.into();
        self.route_lookup = route_lookup.into();
        info!(
            "Loaded {} routes with {} stops",
            self.routes.len(),
            self.stop_count()
        );
        Ok(self)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Get a route with the given id.
    /// If no route is found with the given id None is returned.
    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        Some(&self.routes[*index])
    }

    pub fn route_by_index(&self, index: u32) -> Option<&Route> {
        self.routes.get(index as usize)
    }

    pub fn stop_count(&self) -> usize {
        self.routes.iter().map(Route::stop_count).sum()
    }

    /// A router using the default search configuration.
    pub fn router(&'_ self) -> Router<'_> {
        Router::new(self)
    }

    pub fn router_with(&'_ self, config: SearchConfig) -> Router<'_> {
        Router::new(self).with_config(config)
    }
}

/// Expects `stops` sorted by number.
fn validate_stops(route_id: &str, stops: &[Stop]) -> Result<(), self::Error> {
    let mut previous: Option<u32> = None;
    for stop in stops {
        if !stop.coordinate.is_in_range() {
            return Err(Error::InvalidCoordinate {
                route: route_id.to_string(),
                stop: stop.number,
            });
        }
        if previous == Some(stop.number) {
            return Err(Error::DuplicateStop {
                route: route_id.to_string(),
                number: stop.number,
            });
        }
        previous = Some(stop.number);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::{NetworkDirection, NetworkRoute, NetworkStop},
        shared::geo::Coordinate,
    };

    fn stop(number: u32, latitude: f64, longitude: f64) -> NetworkStop {
        NetworkStop {
            stop_number: number,
            stop_name: format!("Stop {number}"),
            latitude,
            longitude,
        }
    }

    fn route(id: &str, name: &str, stops: Vec<NetworkStop>) -> NetworkRoute {
        NetworkRoute {
            id: id.into(),
            bus_name: name.into(),
            route_type: Some("bus".into()),
            direction: NetworkDirection::Aller,
            stops,
        }
    }

    #[test]
    fn loads_valid_network() {
        let network = Network::new().with_routes(vec![
            route("bus_1_aller", "1", vec![stop(1, 36.80, 10.18), stop(2, 36.81, 10.19)]),
            route("bus_2_aller", "2", vec![stop(1, 36.70, 10.08)]),
        ]);
        let repository = Repository::new().load_network(network).unwrap();
        assert_eq!(repository.routes().len(), 2);
        assert_eq!(repository.stop_count(), 3);

        let route = repository.route_by_id("bus_2_aller").unwrap();
        assert_eq!(route.index, 1);
        assert_eq!(route.name.as_ref(), "2");
        assert_eq!(route.direction, Direction::Outbound);
        assert!(repository.route_by_id("bus_3_aller").is_none());
        assert_eq!(repository.route_by_index(0).unwrap().id.as_ref(), "bus_1_aller");
    }

    #[test]
    fn rejects_empty_network() {
        let result = Repository::new().load_network(Network::new());
        assert_eq!(result.unwrap_err(), Error::EmptyNetwork);
    }

    #[test]
    fn rejects_route_without_stops() {
        let network = Network::new().with_routes(vec![route("bus_1_aller", "1", vec![])]);
        let result = Repository::new().load_network(network);
        assert_eq!(result.unwrap_err(), Error::EmptyRoute("bus_1_aller".into()));
    }

    #[test]
    fn rejects_blank_id_and_name() {
        let network = Network::new().with_routes(vec![route(" ", "1", vec![stop(1, 0.0, 0.0)])]);
        assert_eq!(
            Repository::new().load_network(network).unwrap_err(),
            Error::MissingRouteId(0)
        );

        let network = Network::new().with_routes(vec![route("a", "", vec![stop(1, 0.0, 0.0)])]);
        assert_eq!(
            Repository::new().load_network(network).unwrap_err(),
            Error::MissingLineName("a".into())
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let network = Network::new().with_routes(vec![
            route("a", "1", vec![stop(1, 0.0, 0.0)]),
            route("a", "2", vec![stop(1, 0.0, 0.0)]),
        ]);
        assert_eq!(
            Repository::new().load_network(network).unwrap_err(),
            Error::DuplicateRoute("a".into())
        );
    }

    #[test]
    fn rejects_duplicate_stop_numbers() {
        let network = Network::new().with_routes(vec![route(
            "a",
            "1",
            vec![stop(3, 0.0, 0.0), stop(1, 0.0, 0.0), stop(3, 0.0, 0.0)],
        )]);
        assert_eq!(
            Repository::new().load_network(network).unwrap_err(),
            Error::DuplicateStop {
                route: "a".into(),
                number: 3
            }
        );
    }

    #[test]
    fn orders_stops_by_number() {
        let network = Network::new().with_routes(vec![
            route("a", "1", vec![stop(2, 36.01, 10.0), stop(1, 36.00, 10.0), stop(3, 36.02, 10.0)]),
            route("b", "2", vec![stop(1, 36.00, 10.1), stop(2, 36.01, 10.1)]),
        ]);
        let repository = Repository::new().load_network(network).unwrap();

        let route = repository.route_by_id("a").unwrap();
        let numbers: Vec<u32> = route.stops.iter().map(|stop| stop.number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(route.stops[0].coordinate, Coordinate::new(36.00, 10.0));
        assert_eq!(route.stops_ahead(&route.stops[0]), 2);
        assert_eq!(repository.routes().len(), 2);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let network =
            Network::new().with_routes(vec![route("a", "1", vec![stop(7, 91.0, 10.0)])]);
        assert_eq!(
            Repository::new().load_network(network).unwrap_err(),
            Error::InvalidCoordinate {
                route: "a".into(),
                stop: 7
            }
        );
    }

    #[test]
    fn stops_ahead_counts_from_stop_number() {
        let network = Network::new().with_routes(vec![route(
            "a",
            "1",
            (1..=8).map(|n| stop(n, 36.0, 10.0)).collect(),
        )]);
        let repository = Repository::new().load_network(network).unwrap();
        let route = &repository.routes()[0];
        assert_eq!(route.stops_ahead(&route.stops[0]), 7);
        assert_eq!(route.stops_ahead(&route.stops[7]), 0);
        assert_eq!(route.stops_after(6).count(), 2);
    }
}
