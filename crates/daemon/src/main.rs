use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod clips;
mod config;
mod error;
mod pexels;
mod shotstack;
#[cfg(test)]
mod test_support;

use config::AppConfig;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn app(state: api::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api::router(state))
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.pexels_api_key.is_none() {
        warn!("PEXELS_API_KEY is not set, clip searches will fail");
    }
    if config.shotstack_api_key.is_none() {
        warn!("SHOTSTACK_API_KEY is not set, render submissions will fail");
    }

    let state = api::AppState::from_config(&config)?;
    let router = app(state);

    info!("Starting daemon server on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
