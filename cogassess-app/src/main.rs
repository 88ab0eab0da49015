use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cogassess_app::{AppState, run_server};
use cogassess_experiment::SessionConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cogassess",
    version,
    about = "Serve the multi-stage cognitive assessment (consent, instructions, math, Stroop, mental rotation)"
)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "COGASSESS_ADDR", default_value = "127.0.0.1:8501")]
    addr: String,

    /// JSON session config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the passive tick interval (ms)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Directory holding the mental rotation images
    #[arg(long)]
    asset_root: Option<String>,

    /// Seed for session ids and trial randomization
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(root) = args.asset_root {
        config.asset_root = root;
    }
    config.validate()?;

    info!(
        platform = std::env::consts::OS,
        tick_ms = config.tick_interval_ms,
        "starting cogassess"
    );
    let state = Arc::new(AppState::new(config, args.seed)?);
    run_server(&args.addr, state).await
}
