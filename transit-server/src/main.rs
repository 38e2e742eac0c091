use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use transit_server::graph::{MutatorConfig, Network, Snapshot, sample_network};
use transit_server::planner::SearchConfig;
use transit_server::web::{AppState, create_router};

/// Environment variable naming a snapshot file to load instead of the
/// built-in sample network.
const SNAPSHOT_ENV: &str = "TRANSIT_SNAPSHOT";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load the network (fail fast if the snapshot is unusable)
    let snapshot = match std::env::var(SNAPSHOT_ENV) {
        Ok(path) => {
            println!("Loading network snapshot from {path}...");
            Snapshot::from_file(&path).expect("Failed to load snapshot")
        }
        Err(_) => sample_network(),
    };
    let network = Network::from_snapshot(&snapshot).expect("Snapshot violates graph invariants");
    tracing::info!(
        stations = network.graph.station_count(),
        lines = snapshot.lines.len(),
        "network loaded"
    );

    // Build app state
    let state = AppState::new(network, SearchConfig::default(), MutatorConfig::default());

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Transit route planner listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health            - Health check");
    println!("  GET  /stations          - List stations and their lines");
    println!("  GET  /network           - Current network snapshot");
    println!("  POST /query             - Plan a route (time or transfers)");
    println!("  POST /network/stations  - Insert a station");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
