//! Vela inspector
//!
//! Prints the configured interest-rate curves as JSON.
//!
//! ```text
//! vela [CONFIG_FILE] [POINTS]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vela_common::VERSION;
use vela_engine::{Engine, EngineConfig};

const DEFAULT_POINTS: usize = 11;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Vela inspector v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let points = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid point count: {}", raw))?,
        None => DEFAULT_POINTS,
    };

    let config = EngineConfig::load(config_path.as_deref())?;
    let engine = Engine::new(config)?;

    let report = engine.rate_report(points)?;
    let output = serde_json::json!({
        "version": VERSION,
        "native_asset": engine.config().oracle.native_asset_key,
        "curves": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
