//! Gateway event handler.
//!
//! The bot reacts to no events other than `ready`, which hands out what the
//! sync loop needs to talk to the channel.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, EventHandler, Http, Ready, UserId},
        async_trait,
    },
    tokio::sync::watch,
    tracing::info,
};

/// What a connected session provides to the sync loop.
#[derive(Clone)]
pub struct ReadySession {
    pub http: Arc<Http>,
    pub bot_user_id: UserId,
}

pub type ReadyWatch = watch::Receiver<Option<ReadySession>>;

/// Handler for Discord gateway events.
pub struct ReadyHandler {
    ready_tx: watch::Sender<Option<ReadySession>>,
}

impl ReadyHandler {
    pub fn new() -> (Self, ReadyWatch) {
        let (ready_tx, ready_rx) = watch::channel(None);
        (Self { ready_tx }, ready_rx)
    }

    /// Publishes a session. Later `ready` events (after a reconnect) replace it.
    pub fn publish(&self, session: ReadySession) {
        self.ready_tx.send_replace(Some(session));
    }
}

#[async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );

        self.publish(ReadySession {
            http: ctx.http.clone(),
            bot_user_id: ready.user.id,
        });
    }
}

/// Resolves with the first published session, or `None` if the handler is
/// dropped before the bot ever became ready.
pub async fn wait_until_ready(mut ready: ReadyWatch) -> Option<ReadySession> {
    info!("Waiting for bot to be ready before starting sync task...");
    let session = ready.wait_for(Option::is_some).await.ok()?.clone();
    session
}
