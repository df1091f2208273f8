mod chart;
mod config;
mod errors;
mod metrics;
mod model;
mod registry;
mod rest;
mod validate;

use anyhow::Context;
use axum::{http::StatusCode, routing::get, Router};
use chrono::Utc;
use clap::Parser;
use config::Config;
use registry::Registry;
use rest::AppState;
use std::future::IntoFuture;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting sensor dashboard");
    info!("HTTP server: {}", config.http_addr);
    info!(
        "Readings per series: default {}, max {}",
        config.default_readings, config.max_readings
    );

    metrics::init_metrics().context("failed to register metrics")?;

    let registry = Arc::new(
        Registry::new(registry::fixture_devices(Utc::now()))
            .context("invalid device fixtures")?,
    );
    let state = AppState {
        registry,
        default_readings: config.default_readings,
        max_readings: config.max_readings,
    };

    // Build HTTP app with REST API and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(state));

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.http_addr))?;

    info!("HTTP server listening on {}", config.http_addr);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
    Ok(())
}

async fn metrics_handler() -> (StatusCode, String) {
    match metrics::gather_metrics() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
