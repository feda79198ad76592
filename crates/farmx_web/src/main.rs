use anyhow::{Context, Result};
use clap::Parser;
use farmx_core::ModelStore;
use farmx_web::{telemetry, AppState, ConfigManager};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "farmx-web")]
#[command(about = "FarmX yield and soil nutrient advisory server")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/<FARMX_ENV>.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the model artifacts
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Directory served under /assets
    #[arg(long)]
    assets_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::load(cli.config.as_deref()).context("failed to load config")?;
    let environment = manager.get_environment();
    let source = manager.source().map(|path| path.display().to_string());
    let mut config = manager.into_config();

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.models_dir {
        config.models.dir = dir;
    }
    if let Some(dir) = cli.assets_dir {
        config.assets.dir = dir;
    }

    telemetry::init_logging(&config.logging)?;
    info!(
        ?environment,
        config = source.as_deref().unwrap_or("defaults"),
        "Starting FarmX v{}",
        farmx_web::VERSION
    );

    let store = ModelStore::load_dir(&config.models.dir).with_context(|| {
        format!(
            "failed to load model artifacts from {}",
            config.models.dir.display()
        )
    })?;
    for artifact in store.artifact_hashes()? {
        info!(file = %artifact.file, hash = %artifact.hash, "artifact loaded");
    }

    let state = AppState::new(Arc::new(store), config.ui.default_theme)
        .with_assets_dir(config.assets.dir.clone());
    farmx_web::start_server(state, &config.bind_addr()).await?;

    info!("FarmX shutdown complete");
    Ok(())
}
