//! Request Shield - cached listings and rate-limited endpoints for the
//! training-center admin API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use request_shield::api::create_router;
use request_shield::{spawn_cache_sweep, spawn_limiter_sweep, AppState, Config, SweepHandle};

/// Entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache, the per-policy limiters and the catalog
/// 4. Start the cache and limiter sweeps
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_shield=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Request Shield");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, port={}, sweep_interval={}s, stale_after={}s, trust_proxy={}",
        config.default_ttl,
        config.server_port,
        config.sweep_interval,
        config.stale_after,
        config.trust_proxy
    );

    let state = AppState::from_config(&config);

    let sweeps = vec![
        spawn_cache_sweep(state.cache.clone(), config.sweep_interval()),
        spawn_limiter_sweep(
            state.limiters.clone(),
            config.sweep_interval(),
            config.stale_after(),
        ),
    ];
    info!(count = sweeps.len(), "Background sweeps started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Peer addresses feed the rate-limit identifier
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(sweeps))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeps.
async fn shutdown_signal(sweeps: Vec<SweepHandle>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for sweep in &sweeps {
        sweep.abort();
        warn!(sweep = sweep.name(), "Sweep aborted");
    }
}
