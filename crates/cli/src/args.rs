use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use transtu::shared::Coordinate;

#[derive(Parser, Debug)]
#[command(name = "transtu", version, about = "Find bus itineraries between two points")]
pub struct Cli {
    /// Bus network JSON produced by the spreadsheet converter
    #[arg(long, env = "BUS_DATA_PATH", default_value = "data/bus_routes.json")]
    pub network: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Single-bus itineraries, including the ones going the wrong way
    Direct {
        #[command(flatten)]
        trip: Trip,

        /// Drop invalid candidates from the output
        #[arg(long)]
        valid_only: bool,
    },
    /// Itineraries with exactly one change of bus
    Transfer {
        #[command(flatten)]
        trip: Trip,

        #[arg(long, default_value_t = 10)]
        max_results: usize,
    },
}

#[derive(Args, Debug)]
pub struct Trip {
    /// Origin as "latitude,longitude"
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub from: Coordinate,

    /// Destination as "latitude,longitude"
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub to: Coordinate,
}

pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (latitude, longitude) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"latitude,longitude\", got {value:?}"))?;
    let latitude: f64 = latitude
        .trim()
        .parse()
        .map_err(|err| format!("invalid latitude: {err}"))?;
    let longitude: f64 = longitude
        .trim()
        .parse()
        .map_err(|err| format!("invalid longitude: {err}"))?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90".into());
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180".into());
    }
    Ok(Coordinate::new(latitude, longitude))
}
