//! Binary entry point for the Sirens Fortune deposit daemon.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sirens_depositd::config::Settings;
use sirens_depositd::routes::build_router;
use sirens_depositd::state::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Sirens Fortune deposit daemon")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let settings = Settings::new(args.config)?;

    let state = AppState::from_settings(&settings);
    if state.speed.is_none() && state.helio.is_none() {
        tracing::warn!("No payment backend configured; deposit routes will answer with errors");
    }

    let addr = format!(
        "{}:{}",
        settings.server.listen_host, settings.server.listen_port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
}
