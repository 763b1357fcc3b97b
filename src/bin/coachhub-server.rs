// ABOUTME: HTTP server binary for the Coachhub API
// ABOUTME: Loads configuration, opens the database and serves the router until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

//! # Coachhub Server
//!
//! ```bash
//! cargo run --bin coachhub-server
//! cargo run --bin coachhub-server -- --port 9000 --database-url sqlite:./data/dev.db
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use coachhub::config::ServerConfig;
use coachhub::database::Database;
use coachhub::logging::init_logging;
use coachhub::resources::ServerResources;
use coachhub::routes::build_router;

#[derive(Parser)]
#[command(
    name = "coachhub-server",
    about = "Coachhub API server",
    long_about = "Serve the coach marketplace API with weekly coaching-request aggregation"
)]
struct ServerArgs {
    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    init_logging(&config)?;
    info!(
        port = config.http_port,
        database_url = %config.database_url,
        week_start = config.week_start.as_str(),
        "starting coachhub server"
    );

    let database = Database::new(&config.database_url).await?;
    let resources = Arc::new(ServerResources::new(database, &config));
    let app = build_router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            error!(error = %err, "server exited");
            err
        })?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
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
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
