use std::sync::Arc;

use {
    async_trait::async_trait,
    futures::StreamExt,
    serenity::all::{
        Channel, ChannelId, ChannelType, CreateMessage, EditMessage, Http, MessageId, UserId,
    },
    streams_core::{
        Announcement, ChannelError, ChannelResolver, CoreError, MessageStore, StoredMessage,
    },
    tracing::{debug, warn},
};

use crate::{
    convert::{stored_message, to_create_embed},
    handler::ReadySession,
};

/// Resolves the configured channel over HTTP at the start of every cycle.
pub struct DiscordChannelResolver {
    http: Arc<Http>,
    channel_id: ChannelId,
    bot_user_id: UserId,
}

impl DiscordChannelResolver {
    pub fn new(session: ReadySession, channel_id: ChannelId) -> Self {
        Self {
            http: session.http,
            channel_id,
            bot_user_id: session.bot_user_id,
        }
    }
}

#[async_trait]
impl ChannelResolver for DiscordChannelResolver {
    type Store = DiscordChannelStore;

    async fn resolve(&self) -> Result<Self::Store, CoreError> {
        let channel_id = self.channel_id.get();
        let channel = match self.channel_id.to_channel(&*self.http).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!("Failed to find channel {}: {}", channel_id, e);
                return Err(ChannelError::NotFound { channel_id }.into());
            }
        };

        match channel {
            Channel::Guild(guild_channel)
                if matches!(guild_channel.kind, ChannelType::Text | ChannelType::News) =>
            {
                debug!(channel = %guild_channel.name, "Resolved channel {}", channel_id);
                Ok(DiscordChannelStore {
                    http: self.http.clone(),
                    channel_id: self.channel_id,
                    bot_user_id: self.bot_user_id,
                })
            }
            _ => {
                warn!("Expected text channel for {}", channel_id);
                Err(ChannelError::NotTextChannel { channel_id }.into())
            }
        }
    }
}

/// Message operations on one text channel.
pub struct DiscordChannelStore {
    http: Arc<Http>,
    channel_id: ChannelId,
    bot_user_id: UserId,
}

fn rejected(operation: &str, target: impl ToString, e: serenity::Error) -> CoreError {
    ChannelError::WriteRejected {
        operation: operation.to_string(),
        target: target.to_string(),
        reason: e.to_string(),
    }
    .into()
}

#[async_trait]
impl MessageStore for DiscordChannelStore {
    async fn list(&self) -> Result<Vec<StoredMessage>, CoreError> {
        let mut history = Box::pin(self.channel_id.messages_iter(&*self.http));
        let mut messages = Vec::new();

        while let Some(message) = history.next().await {
            let message = message.map_err(|e| ChannelError::HistoryUnavailable {
                reason: e.to_string(),
            })?;
            messages.push(stored_message(&message, self.bot_user_id));
        }

        debug!(
            "Read {} messages from channel {}",
            messages.len(),
            self.channel_id
        );
        Ok(messages)
    }

    async fn create(&self, announcement: &Announcement) -> Result<u64, CoreError> {
        let builder = CreateMessage::new().embed(to_create_embed(announcement));
        let target = announcement.url.as_deref().unwrap_or("<new>");
        let message = self
            .channel_id
            .send_message(&*self.http, builder)
            .await
            .map_err(|e| rejected("create", target, e))?;
        Ok(message.id.get())
    }

    async fn edit(&self, message_id: u64, announcement: &Announcement) -> Result<(), CoreError> {
        let builder = EditMessage::new().embed(to_create_embed(announcement));
        self.channel_id
            .edit_message(&*self.http, MessageId::new(message_id), builder)
            .await
            .map_err(|e| rejected("edit", message_id, e))?;
        Ok(())
    }

    async fn delete(&self, message_id: u64) -> Result<(), CoreError> {
        self.channel_id
            .delete_message(&*self.http, MessageId::new(message_id))
            .await
            .map_err(|e| rejected("delete", message_id, e))
    }
}
