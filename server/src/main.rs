//! Process bootstrap for the arena shooter server. The tick loop, entity
//! systems, and WebSocket gateway live in the `server` library crate so that
//! `tests/scenarios.rs` can drive `Room` directly.

use axum::routing::get;
use axum::Router;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::session::{health_handler, ws_handler, AppState};
use server::{actor, config, hub};

const WORKER_CHANNEL_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env()?;
    info!(port = config.port, "loaded configuration");

    let hub = hub::HubClient::new(config.hub_base_url.clone(), config.hosted_game_key.clone());

    let (worker_tx, worker_rx) = mpsc::channel(WORKER_CHANNEL_CAPACITY);
    let self_tx = worker_tx.clone();
    tokio::spawn(actor::run(worker_rx, hub, config.admin_password.clone(), self_tx));

    let state = AppState {
        worker_tx,
        user_count: std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0)),
    };

    let cors = if config.client_url == "*" {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(config.client_url.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
