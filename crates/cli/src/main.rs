mod args;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::{io::Write, time::Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use transtu::{
    prelude::*,
    router::{SearchStats, TransferItinerary},
};

use crate::args::{Cli, Command};

#[derive(Serialize)]
struct DirectResponse {
    start_location: Coordinate,
    end_location: Coordinate,
    routes_found: usize,
    routes: Vec<DirectItinerary>,
}

#[derive(Serialize)]
struct TransferResponse {
    start_location: Coordinate,
    end_location: Coordinate,
    routes_found: usize,
    routes: Vec<TransferItinerary>,
    stats: SearchStats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SearchConfig::from_env().context("Invalid search configuration")?;

    info!("Loading data...");
    let now = Instant::now();
    let network = Network::from_json_file(&cli.network)
        .with_context(|| format!("Failed to read {}", cli.network.display()))?;
    let repository = Repository::new()
        .load_network(network)
        .context("Failed to load bus network")?;
    info!("Loading data took {:?}", now.elapsed());

    let router = repository.router_with(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Direct { trip, valid_only } => {
            let now = Instant::now();
            let mut routes = router.direct_routes(trip.from, trip.to);
            info!("Direct search took {:?}", now.elapsed());
            let routes_found = routes.iter().filter(|route| route.is_valid()).count();
            if valid_only {
                routes.retain(DirectItinerary::is_valid);
            }
            let response = DirectResponse {
                start_location: trip.from,
                end_location: trip.to,
                routes_found,
                routes,
            };
            serde_json::to_writer_pretty(&mut out, &response)?;
        }
        Command::Transfer { trip, max_results } => {
            let now = Instant::now();
            let search = router.transfer_search(trip.from, trip.to, max_results);
            info!("Transfer search took {:?}", now.elapsed());
            for (i, itinerary) in search.itineraries.iter().enumerate() {
                info!(
                    "Route {}: {} ({})",
                    i + 1,
                    itinerary.summary.description,
                    itinerary.total_time
                );
            }
            let response = TransferResponse {
                start_location: trip.from,
                end_location: trip.to,
                routes_found: search.itineraries.len(),
                routes: search.itineraries,
                stats: search.stats,
            };
            serde_json::to_writer_pretty(&mut out, &response)?;
        }
    }
    writeln!(out)?;
    Ok(())
}
