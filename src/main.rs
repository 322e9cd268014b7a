use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitepilot::cli::{self, Cli};
use sitepilot::config::SitepilotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let config = SitepilotConfig::resolve(args.config.as_deref())
        .context("failed to load configuration")?;
    cli::run(args.command, config)
        .await
        .context("command failed")?;
    Ok(())
}
