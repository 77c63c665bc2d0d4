mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use routes::ErrorCode;
use services::attendance::RecordStore;
use services::memory::MemoryStore;
use services::postgres::PgStore;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => match db::init_pool(url, config.db_max_connections).await {
            Ok(pool) => {
                tracing::info!(max_connections = config.db_max_connections, "postgres record store ready");
                Arc::new(PgStore::new(pool))
            }
            Err(e) => {
                tracing::error!(error = %e, "database init failed");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not configured; records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let port = config.port;
    let app = routes::app(state::AppState::new(store, config));
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%port, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, "kehadiran listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
