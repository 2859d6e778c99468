//! metadexd — the Metadex daemon.
//!
//! Serves the metric metadata console over HTTP.
//!
//! # Usage
//!
//! ```text
//! metadexd serve --config metadex.toml --port 8480
//! metadexd serve --fixture metadata.json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use metadex_core::MetadexConfig;

#[derive(Parser)]
#[command(name = "metadexd", about = "Metadex metric metadata console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the console.
    Serve {
        /// Path to metadex.toml. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides `server.port`).
        #[arg(long)]
        port: Option<u16>,

        /// Serve metadata from a JSON fixture instead of the remote API.
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,metadexd=debug,metadex=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            fixture,
        } => serve(config, port, fixture).await,
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    fixture: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = match &config_path {
        Some(path) => MetadexConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MetadexConfig::default(),
    };
    if let Some(port) = port {
        config.server.port = port;
    }
    info!(
        config = ?config_path,
        datasources = config.datasources.len(),
        "Metadex daemon starting"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let state = metadexd::build_state(config, fixture.as_deref()).await?;
    let router = metadex_dashboard::build_router(state);

    info!(%addr, "console listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    info!("Metadex daemon stopped");
    Ok(())
}
