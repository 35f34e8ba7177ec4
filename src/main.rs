use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use portal_db::{init_db_pool, run_migrations};
use portal_observability::{init_metrics, init_tracing, metrics_app, shutdown_tracer};
use studentportal::config::AppConfig;
use studentportal::router::init_router;
use studentportal::state::{AppState, Stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing()?;

    let config = AppConfig::from_env()?;

    let pool = init_db_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("database migrations applied");
    }

    let state = AppState::new(pool.clone(), Stores::postgres(&pool), &config)?;
    tracing::info!(gate = ?state.gate, "feature access gate configured");

    let mut app = init_router(state);
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
    }

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Scalar UI available at http://{}/scalar", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    pool.close().await;
    tracing::info!("database pool closed");
    shutdown_tracer().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received, draining connections");
}
