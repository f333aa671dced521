//! API server for Taskboard
//!
//! Serves the task REST API on the configured port.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_server::app;
use api_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=debug,tb_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine configuration from the environment
    let data_dir = std::env::var("TB_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".tb-data"));
    let port: u16 = std::env::var("TB_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let dev_mode = std::env::var("TB_ENV")
        .map(|v| v == "development")
        .unwrap_or(false);

    tracing::info!("Using data directory: {:?}", data_dir);

    let state = AppState::new(data_dir, dev_mode)
        .await
        .expect("Failed to initialize application state");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("REST API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
