//cargo run --package shape_detector --bin shape_detector_server -- --port 8080
use std::path::PathBuf;

use clap::Parser;
use shape_detector::{PipelineBuilder, ServerConfig, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Zone brightness detection over HTTP", long_about = None)]
struct Cli {
    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,
    /// Address to bind (overrides the config file)
    #[arg(long)]
    bind: Option<String>,
    /// Path to a TOML or JSON server configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug"))
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let pipeline = PipelineBuilder::from_config(&config)?.build()?;
    let app = server::router(server::AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Started server");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {:?}", e);
            }
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        })
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}
