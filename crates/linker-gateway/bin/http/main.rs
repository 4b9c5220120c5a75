mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use linker_core::MessageCatalog;
use linker_gateway::{App, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    linker_telemetry::init(config.environment).context("failed to initialize tracing")?;

    let linker = config
        .service
        .build_linker()
        .await
        .context("failed to build linker service")?;
    let state = AppState::new(linker, Arc::new(MessageCatalog::api()));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(
        listen_addr = %listener.local_addr()?,
        environment = %config.environment,
        storage_backend = %config.service.storage,
        "starting gateway server"
    );

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server terminated")?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
