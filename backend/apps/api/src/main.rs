//! API Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors go through
//! `kernel::error::AppError`.

mod app;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use platform::rate_limit::FixedWindowRateLimiter;
use school::MemoryStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

const DEFAULT_LOG_FILTER: &str = "api=info,auth=info,school=info,platform=info,tower_http=info";
const DEBUG_LOG_FILTER: &str = "api=debug,auth=debug,school=debug,platform=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.debug {
        DEBUG_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.dev_secret {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    let execs = MemoryStore::new();
    if let Some(bootstrap) = &config.bootstrap_exec {
        let exec = app::seed_bootstrap_exec(&execs, bootstrap).await?;
        tracing::info!(username = %exec.username, id = exec.id, "Bootstrap exec created");
    }

    let limiter = Arc::new(FixedWindowRateLimiter::new(config.rate_limit.clone()));
    limiter.start();

    let auth = Arc::new(config.auth);
    let pipeline = app::build_pipeline(Arc::clone(&limiter), config.cors, Arc::clone(&auth));
    let app = app::build_app(pipeline, auth, execs).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    limiter.stop();
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
