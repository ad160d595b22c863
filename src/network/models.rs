use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkFile {
    #[serde(rename = "type", default)]
    pub network_type: Option<String>,
    pub routes: Vec<NetworkRoute>,
    #[serde(default)]
    pub metadata: Option<NetworkMetadata>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct NetworkRoute {
    pub id: String,
    pub bus_name: String,
    #[serde(rename = "type", default)]
    pub route_type: Option<String>,
    pub direction: NetworkDirection,
    pub stops: Vec<NetworkStop>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkDirection {
    #[serde(rename = "aller", alias = "outbound")]
    Aller,
    #[serde(rename = "retour", alias = "return")]
    Retour,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct NetworkStop {
    pub stop_number: u32,
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NetworkMetadata {
    pub total_routes: Option<usize>,
    pub total_stops: Option<usize>,
    pub source: Option<String>,
}
