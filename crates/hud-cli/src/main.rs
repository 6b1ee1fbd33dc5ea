mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use hud_config::Config;
use hud_redact::Redactor;
use hud_store::{GatewayStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let config = Config::load()?;
    let redactor = Arc::new(Redactor::new(config.detection_policy()?));

    // The --base flag (or HUD_GATEWAY_BASE) wins over the config file.
    let base = cli.base.unwrap_or_else(|| config.gateway_base());
    tracing::debug!("Gateway base: {}", base.display());
    let store = GatewayStore::new(
        base,
        redactor,
        StoreConfig {
            active_window_secs: config.active_window_secs,
            default_transcript_limit: config.transcript.default_limit,
            max_transcript_limit: config.transcript.max_limit,
            max_content_len: config.transcript.max_content_len,
        },
    );

    match cli.command {
        cli::Commands::Agents => commands::agents::handle(&store).await,
        cli::Commands::Agent { id } => commands::agent::handle(&store, &id).await,
        cli::Commands::Sessions { id } => commands::sessions::handle(&store, &id).await,
        cli::Commands::Activity { id, limit } => {
            commands::activity::handle(&store, &id, limit).await
        }
        cli::Commands::Cron(cron_cmd) => commands::cron::handle(cron_cmd, &store).await,
        cli::Commands::Stats => commands::stats::handle(&store).await,
        cli::Commands::Config => commands::config::handle(&store).await,
    }
}
