#![allow(dead_code)]

use transtu::{
    network::{Network, NetworkDirection, NetworkRoute, NetworkStop},
    prelude::*,
};

pub const ORIGIN: (f64, f64) = (36.552_811_694_053_5, 9.902_629_718_053_5);
pub const DESTINATION: (f64, f64) = (36.8008, 10.1865);

pub fn route(
    id: &str,
    line: &str,
    direction: NetworkDirection,
    points: &[(f64, f64)],
) -> NetworkRoute {
    NetworkRoute {
        id: id.into(),
        bus_name: line.into(),
        route_type: Some("bus".into()),
        direction,
        stops: points
            .iter()
            .enumerate()
            .map(|(i, (latitude, longitude))| NetworkStop {
                stop_number: i as u32 + 1,
                stop_name: format!("{line} stop {}", i + 1),
                latitude: *latitude,
                longitude: *longitude,
            })
            .collect(),
    }
}

/// `count` points evenly spaced from `from` to `to`, both included.
pub fn line_between(from: (f64, f64), to: (f64, f64), count: usize) -> Vec<(f64, f64)> {
    let steps = (count - 1) as f64;
    (0..count)
        .map(|i| {
            let t = i as f64 / steps;
            (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
        })
        .collect()
}

pub fn repository(routes: Vec<NetworkRoute>) -> Repository {
    Repository::new()
        .load_network(Network::new().with_routes(routes))
        .expect("Failed to build repository")
}

/// Two lines meeting around (36.653, 9.903), the only way from [`ORIGIN`]
/// to [`DESTINATION`] being line 34 for five stops then line 43 B for ten.
pub fn transfer_network() -> Repository {
    let mut line_34 = vec![(36.5540, 9.9026)];
    line_34.extend((1..10).map(|i| (36.5528 + i as f64 * 0.02, 9.9026)));

    let mut line_43b = vec![(36.6528, 9.8826)];
    line_43b.extend(line_between((36.6538, 9.9026), (36.7998, 10.1860), 11));

    repository(vec![
        route("bus_34_retour", "34", NetworkDirection::Retour, &line_34),
        route("bus_43B_aller", "43 B", NetworkDirection::Aller, &line_43b),
    ])
}

/// Lines A and B side by side, 50 meters apart, 30 stops every 300 meters.
pub fn parallel_network() -> Repository {
    let line_a: Vec<(f64, f64)> = (0..30).map(|i| (36.80 + i as f64 * 0.0027, 10.10)).collect();
    let line_b: Vec<(f64, f64)> = line_a
        .iter()
        .map(|(latitude, longitude)| (*latitude, longitude + 0.000_56))
        .collect();

    repository(vec![
        route("bus_A_aller", "A", NetworkDirection::Aller, &line_a),
        route("bus_B_aller", "B", NetworkDirection::Aller, &line_b),
    ])
}

pub fn coordinate(point: (f64, f64)) -> Coordinate {
    Coordinate::from(point)
}
