//! Application builder: wires router, middleware and state into an Axum
//! app, and runs the server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use reslib_core::config::AppConfig;
use reslib_core::error::AppError;
use reslib_database::Stores;
use reslib_lease::signing_key::load_or_create_signing_key;
use reslib_worker::CronExpiryScheduler;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = state.config.server.clone();
    build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(build_cors_layer(&server.cors))
        .layer(TraceLayer::new_for_http())
}

/// Runs the reslib server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting reslib server...");

    // ── Step 1: Connect document stores ──────────────────────────
    tracing::info!(backend = %config.database.backend, "Connecting document stores...");
    let stores = Stores::connect(&config.database).await?;

    // ── Step 2: Load or create the credential signing key ────────
    let signing_key = load_or_create_signing_key(stores.settings.as_ref(), &config.auth).await?;

    // ── Step 3: Start the expiry scheduler ───────────────────────
    let scheduler = CronExpiryScheduler::new().await?;
    scheduler.start().await?;

    // ── Step 4: Build application state ──────────────────────────
    let state = AppState::new(
        config.clone(),
        stores.clone(),
        Arc::new(scheduler.clone()),
        &signing_key,
    );

    // ── Step 5: Recover expiry jobs for persisted sessions ───────
    let recovered = state.lease.recover_all().await?;
    tracing::info!(
        recovered,
        policy = ?config.session.recovery_policy,
        "Session recovery complete"
    );

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("reslib server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    });
    let mut server = tokio::spawn(async move { server.await });

    let served = tokio::select! {
        joined = &mut server => Some(joined),
        _ = shutdown_signal() => {
            let _ = shutdown_tx.send(true);
            let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(joined) => Some(joined),
                Err(_) => {
                    tracing::warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
                    server.abort();
                    None
                }
            }
        }
    };

    // ── Step 7: Tear down ────────────────────────────────────────
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Failed to shut down expiry scheduler");
    }
    stores.close().await;

    if let Some(joined) = served {
        joined
            .map_err(|e| AppError::internal(format!("Server task failed: {}", e)))?
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
    }

    tracing::info!("reslib server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
