pub mod convert;
pub mod handler;
pub mod store;

pub use handler::{wait_until_ready, ReadyHandler, ReadySession, ReadyWatch};
pub use serenity::all::ChannelId;
pub use store::{DiscordChannelResolver, DiscordChannelStore};

use serenity::all::{Client, GatewayIntents};
use streams_core::{ChannelError, Config, CoreError};
use tracing::info;

/// Only guild events are needed to resolve channels.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
}

/// Builds the gateway client and the watch that fires once it is ready.
pub async fn build_client(config: &Config) -> Result<(Client, ReadyWatch), CoreError> {
    let (handler, ready) = ReadyHandler::new();

    let client = Client::builder(&config.discord_token, intents())
        .event_handler(handler)
        .await
        .map_err(|e| ChannelError::ConnectionFailed {
            reason: e.to_string(),
        })?;

    info!("Discord client created");
    Ok((client, ready))
}
