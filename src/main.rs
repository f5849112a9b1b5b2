use anyhow::Context;
use background_service::BackgroundService;
use clap::Parser;
use discord_client::{build_client, wait_until_ready, ChannelId, DiscordChannelResolver};
use std::path::PathBuf;
use stream_sync::StreamSync;
use streams_api_client::StreamsApiClient;
use streams_core::{ChannelError, Config, DEFAULT_CONFIG_FILE};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "streams_bot=info,streams_core=info,streams_api_client=info,\
stream_sync=info,discord_client=info,background_service=info,serenity=warn";

#[derive(Parser, Debug)]
#[command(version, about = "Keeps a Discord channel in sync with who is live")]
struct Cli {
    /// Path to config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// `streams-bot-config.json` next to the executable.
fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::from_path(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    tracing::info!("Starting streams bot for channel {}", config.channel);

    let api = StreamsApiClient::from_config(&config)?;
    let (mut client, ready) = build_client(&config).await?;

    // non-zero, checked by Config::validate
    let channel = ChannelId::new(config.channel);
    let service = BackgroundService::default();
    service.start(async move {
        let session = wait_until_ready(ready).await?;
        Some(StreamSync::new(api, DiscordChannelResolver::new(session, channel)))
    })?;

    let shard_manager = client.shard_manager.clone();
    let outcome = tokio::select! {
        result = client.start() => result.map_err(|e| ChannelError::ConnectionFailed {
            reason: e.to_string(),
        }),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
    };

    // let the running cycle finish its writes before the gateway goes away
    service.stop().await?;
    shard_manager.shutdown_all().await;

    outcome?;
    Ok(())
}
