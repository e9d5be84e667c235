//! Hypothesis Lab API server

use anyhow::Result;
use hypothesis_lab_api_rest::{create_app, AppState};
use hypothesis_lab_common::{init_from_config, AppConfig};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_from_config(&config.telemetry)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        address = %addr,
        database = %config.database.url,
        "Starting Hypothesis Lab API"
    );

    let state = AppState::from_config(config).await?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
