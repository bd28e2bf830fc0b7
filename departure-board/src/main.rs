use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use departure_board::domain::{StopDescriptor, load_stops, reference_stops};
use departure_board::poller::{Aggregator, DepartureSource, PollerConfig};
use departure_board::upstream::{BoardClient, BoardConfig, MockBoardClient};
use departure_board::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = PollerConfig::default();
    if let Ok(secs) = std::env::var("BOARD_POLL_SECS") {
        match secs.parse::<u64>() {
            Ok(secs) => config.interval = Duration::from_secs(secs),
            Err(e) => warn!(value = %secs, error = %e, "ignoring invalid BOARD_POLL_SECS"),
        }
    }

    let stops = match std::env::var("BOARD_STOPS_FILE") {
        Ok(path) => load_stops(&path, config.default_limit).expect("Failed to load stops file"),
        Err(_) => reference_stops(config.default_limit),
    };
    info!(stops = stops.len(), "loaded stop list");

    let addr: SocketAddr = std::env::var("BOARD_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_string())
        .parse()
        .expect("Invalid BOARD_BIND address");

    match std::env::var("BOARD_MOCK_DIR") {
        Ok(dir) => {
            let mock = MockBoardClient::new(&dir).expect("Failed to load mock boards");
            info!(dir = %dir, stops = ?mock.available_stops(), "using mock departure boards");
            serve(mock, stops, &config, addr).await;
        }
        Err(_) => {
            let token = std::env::var("GOLEMIO_ACCESS_TOKEN").unwrap_or_else(|_| {
                warn!("GOLEMIO_ACCESS_TOKEN not set. API calls will fail.");
                String::new()
            });
            let mut board_config = BoardConfig::new(token);
            if let Ok(url) = std::env::var("BOARD_API_URL") {
                board_config = board_config.with_base_url(url);
            }
            let client = BoardClient::new(board_config).expect("Failed to create board client");
            serve(client, stops, &config, addr).await;
        }
    }
}

/// Poll every stop and serve the boards until Ctrl-C.
async fn serve<S: DepartureSource>(
    source: S,
    stops: Vec<StopDescriptor>,
    config: &PollerConfig,
    addr: SocketAddr,
) {
    let boards = Arc::new(Aggregator::start(stops, Arc::new(source), config));
    let app = create_router(AppState::new(Arc::clone(&boards)));

    info!(%addr, "listening");
    info!("  GET /health");
    info!("  GET /api/boards");
    info!("  GET /api/boards/:index");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    Aggregator::shutdown_shared(boards).await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
