//! Entry point: loads the engine configuration, bootstraps the renderer's
//! GLB asset, and serves the realtime mission API.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use mission_config::EngineConfig;
use mission_ephemeris::Ephemeris;

#[derive(Parser, Debug)]
#[command(author, version, about = "Earth-Mars round-trip mission trajectory engine")]
struct Cli {
    /// TCP port the HTTP/WebSocket server listens on.
    #[arg(long, default_value_t = 8712)]
    port: u16,

    /// Path to a TOML engine configuration file (defaults are used if omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to serve static frontend assets from, if any.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Directory the glTF/GLB model bootstrap writes into.
    #[arg(long, default_value = "assets/models")]
    models_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::defaults(),
    };

    let model_present = bootstrap_assets(&cli.models_dir).await;

    let ephemeris = Ephemeris::new();
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));

    mission_server::serve(addr, ephemeris, config, cli.static_dir, model_present).await?;
    Ok(())
}

/// Ensure the renderer's GLB model is present. Failures here (offline,
/// firewall, NASA host unreachable) never block startup: the frontend
/// falls back to a procedural model when the file is missing. Returns
/// whether a validated GLB ended up on disk.
async fn bootstrap_assets(models_dir: &std::path::Path) -> bool {
    let models_dir = models_dir.to_path_buf();
    let result = tokio::task::spawn_blocking(move || mission_assets::ensure_gateway_core_glb(&models_dir))
        .await;

    match result {
        Ok(Ok(mission_assets::AssetStatus::AlreadyPresent(path))) => {
            tracing::info!(path = %path.display(), "gateway model already present");
            true
        }
        Ok(Ok(mission_assets::AssetStatus::Downloaded(path))) => {
            tracing::info!(path = %path.display(), "downloaded gateway model");
            true
        }
        Ok(Err(error)) => {
            tracing::warn!(%error, "failed to ensure gateway model; frontend will use a procedural fallback");
            false
        }
        Err(join_error) => {
            tracing::warn!(%join_error, "asset bootstrap task panicked");
            false
        }
    }
}
