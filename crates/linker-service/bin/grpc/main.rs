mod cli;
mod error;
mod server;

use crate::cli::CLI;
use crate::server::LinkerGrpcServer;
use anyhow::Context;
use clap::Parser;
use linker_core::MessageCatalog;
use linker_proto_schema::v1::linker_service_server::LinkerServiceServer;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    linker_telemetry::init(config.environment).context("failed to initialize tracing")?;

    info!(
        listen_addr = %config.listen_addr,
        environment = %config.environment,
        storage_backend = %config.service.storage,
        "starting linker gRPC server"
    );

    let linker = config
        .service
        .build_linker()
        .await
        .context("failed to build linker service")?;
    let service = LinkerGrpcServer::new(linker, Arc::new(MessageCatalog::api()));

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<LinkerServiceServer<LinkerGrpcServer>>()
        .await;

    Server::builder()
        .timeout(config.service.request_timeout())
        .add_service(health_service)
        .add_service(LinkerServiceServer::new(service))
        .serve_with_shutdown(config.listen_addr, shutdown_signal())
        .await
        .context("gRPC server terminated")?;

    info!("linker gRPC server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
