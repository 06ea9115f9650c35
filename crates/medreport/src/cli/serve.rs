//! The `medreport serve` command.

use crate::server::{self, AppState};
use clap::Args;
use medreport_core::{Config, ReportProcessor};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Run the HTTP service until Ctrl-C.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let processor = ReportProcessor::from_config(&config.llm)?;

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let state = AppState {
        processor,
        models: config.models.clone(),
    };
    let app = server::router(state, &config.server, config.static_dir());

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {host}:{port}: {e}"))?;
    let addr = listener.local_addr()?;

    tracing::info!(
        %addr,
        text_model = %config.models.text,
        image_model = %config.models.image,
        "Medical Report Simplifier API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
