//! The TrainerDex Discord bot.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::GatewayIntents,
    client::{Context, EventHandler},
    model::{
        application::{Command, Interaction},
        gateway::Ready,
    },
};
use tracing::{debug, error, info};

use tdx_core::{MemorySettingsStore, ProfileApi, SettingsStore};

use crate::error::{DiscordError, Result};
use crate::{helpers, slash_commands};

/// Everything a command handler needs: the settings store, the TrainerDex
/// API handle, and the owner allow-list for the global settings.
pub struct TdxState {
    pub store: Arc<dyn SettingsStore>,
    pub api: Arc<dyn ProfileApi>,
    pub owner_ids: Vec<u64>,
}

struct Handler {
    state: TdxState,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}", ready.user.name);
        match Command::set_global_commands(&ctx.http, slash_commands::create_commands()).await {
            Ok(commands) => info!("Registered {} slash commands", commands.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            debug!(
                command = %command.data.name,
                user = %command.user.id,
                "dispatching command interaction"
            );
            if let Err(e) = slash_commands::dispatch(&self.state, &ctx, &command).await {
                error!("Command '{}' failed: {:?}", command.data.name, e);
                // The handler may have responded already; failure here is fine.
                let _ = helpers::respond(
                    &ctx,
                    &command,
                    "Something went wrong handling that command.".to_string(),
                    true,
                )
                .await;
            }
        }
    }
}

/// Builder for the bot. The API handle is required; the settings store
/// defaults to the in-memory implementation.
pub struct TdxBotBuilder {
    token: String,
    api: Arc<dyn ProfileApi>,
    store: Option<Arc<dyn SettingsStore>>,
    owner_ids: Vec<u64>,
}

impl TdxBotBuilder {
    pub fn new(token: impl Into<String>, api: Arc<dyn ProfileApi>) -> Self {
        Self {
            token: token.into(),
            api,
            store: None,
            owner_ids: Vec::new(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_owner_ids(mut self, owner_ids: Vec<u64>) -> Self {
        self.owner_ids = owner_ids;
        self
    }

    pub async fn build(self) -> Result<TdxBot> {
        let state = TdxState {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySettingsStore::new())),
            api: self.api,
            owner_ids: self.owner_ids,
        };
        // Slash commands arrive as interactions; no privileged intents needed.
        let intents = GatewayIntents::GUILDS;
        let client = serenity::Client::builder(&self.token, intents)
            .event_handler(Handler { state })
            .await
            .map_err(|e| DiscordError::auth_failed(e, &self.token))?;
        Ok(TdxBot { client })
    }
}

/// The running bot; owns the serenity client.
pub struct TdxBot {
    client: serenity::Client,
}

impl TdxBot {
    /// Connect to the gateway and run until the connection ends.
    pub async fn start(&mut self) -> Result<()> {
        self.client
            .start()
            .await
            .map_err(|cause| DiscordError::GatewayFailed { cause })
    }

    /// Handle for shutting the gateway down from another task.
    pub fn shard_manager(&self) -> Arc<serenity::gateway::ShardManager> {
        self.client.shard_manager.clone()
    }
}
