//! hash-notarizer entry point.

mod cli;

use clap::Parser;
use cli::Cli;
use hash_notarizer::api::{create_router, serve, DEFAULT_SHUTDOWN_GRACE};
use hash_notarizer::NotarizerBuilder;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, info_span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let log_json = cli.log_json;
    let config = cli.into_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let (plain, json) = if log_json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();

    info!("hash-notarizer v{}", env!("CARGO_PKG_VERSION"));

    let notarizer = NotarizerBuilder::from_config(&config)?
        .span(info_span!("notarizer"))
        .build();
    let router = create_router(
        Arc::new(notarizer),
        config.rest_api.debug_request_logger_enabled,
    );

    let listener = TcpListener::bind(&config.rest_api.bind_address).await?;
    info!("Serving REST API on {}", listener.local_addr()?);
    info!("Using node at {}", config.node.url);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });
    serve(listener, router, shutdown_rx, DEFAULT_SHUTDOWN_GRACE).await?;

    info!("Goodbye!");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
