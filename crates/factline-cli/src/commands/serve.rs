//! `factline gateway | classifier | summarizer` -- run one stage.
//!
//! # Example
//!
//! ```text
//! factline gateway
//! factline classifier --config /etc/factline.json --port 3100
//! ```

use clap::Args;
use tracing::info;

use factline_services::{Stage, serve};

use super::load_config;

/// Arguments shared by every stage subcommand.
#[derive(Args)]
pub struct StageArgs {
    /// Config file path (overrides `FACTLINE_CONFIG`).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bind host (overrides the stage's configured host).
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides the stage's configured port).
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Resolve the config, build the stage and serve until shutdown.
pub async fn run(stage: Stage, args: StageArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;

    let (configured_host, configured_port) = stage.bind_address(&config);
    let host = args.host.unwrap_or(configured_host);
    let port = args.port.unwrap_or(configured_port);

    let router = stage
        .router(&config)
        .map_err(|e| anyhow::anyhow!("failed to build {} stage: {e}", stage.name()))?;

    info!(
        stage = stage.name(),
        host = %host,
        port,
        timeout_secs = config.timeout_secs,
        "starting stage"
    );

    serve(router, &host, port).await?;
    Ok(())
}
