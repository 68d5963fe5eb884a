mod api_doc;
mod config;
mod error;
mod handlers;
mod memory;
mod models;
mod routes;
mod service;
mod spanner;
mod state;
mod store;

use anyhow::Context;
use config::{Config, StoreBackend};
use memory::MemoryStore;
use service::SettingsService;
use spanner::SpannerStore;
use state::AppState;
use std::sync::Arc;
use store::RecordStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("settings-share starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn RecordStore> = match (config.store_backend, &config.spanner) {
        (StoreBackend::Spanner, Some(spanner_config)) => {
            Arc::new(SpannerStore::from_config(spanner_config).await?)
        }
        (StoreBackend::Spanner, None) => anyhow::bail!("Spanner backend selected without Spanner configuration"),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory record store; records are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        settings: SettingsService::new(store, config.ttl()),
    };
    let app = routes::router(state);

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("settings-share stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
