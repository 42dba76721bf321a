//! Karios service entry point.
//!
//! Serves the account pages, the glossary API and the CoinGecko price proxy.
//! Glossary and user stores are flat JSON files created on first run.

use anyhow::Result;
use karios_service::{create_router, AppState, ServiceConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Karios service...");

    let config = ServiceConfig::from_env();

    // Initialize Prometheus metrics
    if config.metrics_port > 0 {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], config.metrics_port))
            .install()?;

        info!(
            "Prometheus metrics available at http://0.0.0.0:{}/metrics",
            config.metrics_port
        );
    } else {
        info!("Metrics exporter disabled (METRICS_PORT=0)");
    }

    // A corrupt store file is fatal here.
    let state = AppState::from_config(&config)?;
    info!(
        "Glossary: {} terms from {}",
        state.glossary.len(),
        config.brain_file.display()
    );
    info!(
        "Users: {} accounts from {}",
        state.auth.user_count(),
        config.user_file.display()
    );
    if state.glossary.is_empty() {
        warn!("Glossary is empty, every lookup will miss");
    }
    warn!("Passwords are stored and compared in plaintext");
    info!("Price proxy upstream: {}", state.coingecko.base_url());

    let router = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port)).await?;
    info!("HTTP server listening on http://0.0.0.0:{}", config.http_port);
    info!("Available endpoints:");
    info!("  GET      /                 - Landing page");
    info!("  GET,POST /register         - Create account");
    info!("  GET,POST /login            - Start session");
    info!("  GET      /dashboard        - Logged-in page");
    info!("  GET      /logout           - End session");
    info!("  GET      /term/{{word}}      - Glossary lookup");
    info!("  GET      /all_terms        - All glossary terms");
    info!("  POST     /add_term         - Add glossary term");
    info!("  GET      /crypto/{{coin}}    - Coin price");
    info!("  GET      /top_coins        - Top coins by market cap");
    info!("  GET      /health           - Health check");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Karios service stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");
}
