// Main entry point for the launch monitor server

use std::sync::Arc;

use anyhow::{Context, Result};
use launch_monitor::{
    kernel::{start_scheduler, ServerDeps},
    server::{build_app, AppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,launch_monitor=debug,extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Launch Monitor");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        environment = config.environment.as_str(),
        source = %config.source_url,
        "Configuration loaded"
    );

    let deps = Arc::new(ServerDeps::from_config(&config).context("Failed to build dependencies")?);

    // A bad token should not keep the server down; runs will log send failures
    match deps.notifier.verify().await {
        Ok(name) => tracing::info!("Bot connected: {}", name),
        Err(e) => tracing::warn!(error = %e, "Bot connection check failed"),
    }

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = if config.scheduler_enabled {
        Some(
            start_scheduler(deps.clone(), &config.cron_schedule)
                .await
                .context("Failed to start scheduler")?,
        )
    } else {
        tracing::info!("Scheduler disabled (SCHEDULER_ENABLED=false)");
        None
    };

    let app = build_app(AppState::from_config(&config, deps));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Status: http://localhost:{}/api/status", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
