//! HTTP API for the classroom backend.
//!
//! Serves score submission, leaderboards and account deletion over JSON.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use accounts::SystemClock;
use database::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        addr = %config.addr,
        week_start = %config.windows.week_start,
        zone = %config.windows.zone,
        "Starting API server"
    );

    let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
    db.migrate().await?;

    let state = AppState::new(
        db.clone(),
        Arc::new(SystemClock),
        config.windows,
        TokenVerifier::new(&config.jwt_secret),
        config.default_limit,
    );
    let app = routes::app(state);

    info!(addr = %config.addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    db.close().await;
    Ok(())
}
