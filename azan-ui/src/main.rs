//! azan-ui - Azan Voice web front end
//!
//! Serves the browser UI and the generation API on a single port.
//! Generated audio is held in memory (one live artifact) and never
//! persisted.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use azan_common::config::{self, CliOverrides};
use azan_ui::services::tts_client::TtsClient;
use azan_ui::{build_router, AppState};

#[derive(Parser)]
#[command(name = "azan-ui")]
#[command(about = "Web front end for azan voice generation", long_about = None)]
struct Cli {
    /// TTS API key (also AZAN_API_KEY env or config.toml)
    #[arg(long)]
    api_key: Option<String>,

    /// TTS endpoint URL override
    #[arg(long)]
    endpoint: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Azan Voice UI (azan-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let overrides = CliOverrides {
        api_key: cli.api_key,
        endpoint: cli.endpoint,
        port: cli.port,
        config_file: cli.config,
    };
    let service_config = config::resolve(&overrides)?;

    info!("TTS endpoint: {}", service_config.endpoint);
    info!("Default voice: {}", service_config.default_voice);

    let tts = TtsClient::new(service_config.endpoint, service_config.api_key)?;
    let state = AppState::new(tts, service_config.default_voice);
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", service_config.port)).await?;
    info!("azan-ui listening on http://127.0.0.1:{}", service_config.port);
    info!(
        "Health check: http://127.0.0.1:{}/health",
        service_config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
