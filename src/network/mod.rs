use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};
use thiserror::Error;
use tracing::{info, warn};

pub mod models;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The raw bus network as written by the offline converter.
/// Nothing is validated here, that happens when it is loaded into a
/// [`Repository`](crate::repository::Repository).
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub routes: Vec<NetworkRoute>,
    pub metadata: Option<NetworkMetadata>,
}

impl Network {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_routes(mut self, routes: Vec<NetworkRoute>) -> Self {
        self.routes = routes;
        self
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, self::Error> {
        let path = path.as_ref();
        info!("Reading network from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, self::Error> {
        let file: NetworkFile = serde_json::from_reader(reader)?;
        Ok(file.into())
    }

    pub fn from_json_str(json: &str) -> Result<Self, self::Error> {
        let file: NetworkFile = serde_json::from_str(json)?;
        Ok(file.into())
    }

    pub fn stop_count(&self) -> usize {
        self.routes.iter().map(|route| route.stops.len()).sum()
    }
}

impl From<NetworkFile> for Network {
    fn from(value: NetworkFile) -> Self {
        let network = Self {
            routes: value.routes,
            metadata: value.metadata,
        };
        if let Some(metadata) = &network.metadata {
            if let Some(total) = metadata.total_routes
                && total != network.routes.len()
            {
                warn!(
                    "Metadata claims {total} routes but {} were read",
                    network.routes.len()
                );
            }
            if let Some(total) = metadata.total_stops
                && total != network.stop_count()
            {
                warn!(
                    "Metadata claims {total} stops but {} were read",
                    network.stop_count()
                );
            }
        }
        network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "bus",
        "routes": [
            {
                "id": "bus_34_retour",
                "bus_name": "34",
                "type": "bus",
                "direction": "retour",
                "stops": [
                    { "stop_number": 1, "stop_name": "EPICIER LAGRAA", "longitude": 9.9026, "latitude": 36.5528 },
                    { "stop_number": 2, "stop_name": "MOSQUEE", "longitude": 9.9030, "latitude": 36.5700 }
                ]
            },
            {
                "id": "bus_43 B_aller",
                "bus_name": "43 B",
                "direction": "outbound",
                "stops": []
            }
        ],
        "metadata": { "total_routes": 2, "total_stops": 2, "source": "lignes-bus.xlsx" }
    }"#;

    #[test]
    fn parses_converter_output() {
        let network = Network::from_json_str(SAMPLE).unwrap();
        assert_eq!(network.routes.len(), 2);
        assert_eq!(network.stop_count(), 2);

        let route = &network.routes[0];
        assert_eq!(route.id, "bus_34_retour");
        assert_eq!(route.bus_name, "34");
        assert_eq!(route.direction, NetworkDirection::Retour);
        assert_eq!(route.stops[1].stop_name, "MOSQUEE");
        assert_eq!(network.routes[1].direction, NetworkDirection::Aller);
        assert_eq!(
            network.metadata.unwrap().source.as_deref(),
            Some("lignes-bus.xlsx")
        );
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r#"{ "routes": [ { "id": "x", "direction": "aller", "stops": [] } ] }"#;
        assert!(matches!(
            Network::from_json_str(json),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn unknown_direction_is_an_error() {
        let json = r#"{ "routes": [ { "id": "x", "bus_name": "1", "direction": "sideways", "stops": [] } ] }"#;
        assert!(Network::from_json_str(json).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Network::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
