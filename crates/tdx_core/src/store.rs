//! Settings persistence contract.
//!
//! Durable storage belongs to whatever hosts the bot; this crate only
//! defines the narrow contract it consumes, plus an in-memory
//! implementation used by the shipped binary and by tests. Reads return a
//! default record when a scope has never been written. Writes replace the
//! whole record for a scope and are treated as atomic per record.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::settings::{ChannelSettings, GlobalSettings, GuildSettings};

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn guild(&self, guild_id: u64) -> Result<GuildSettings>;
    async fn set_guild(&self, guild_id: u64, settings: GuildSettings) -> Result<()>;

    async fn channel(&self, channel_id: u64) -> Result<ChannelSettings>;
    async fn set_channel(&self, channel_id: u64, settings: ChannelSettings) -> Result<()>;

    async fn global(&self) -> Result<GlobalSettings>;
    async fn set_global(&self, settings: GlobalSettings) -> Result<()>;
}

/// In-memory [`SettingsStore`]. State lives for the lifetime of the
/// process.
#[derive(Default)]
pub struct MemorySettingsStore {
    guilds: DashMap<u64, GuildSettings>,
    channels: DashMap<u64, ChannelSettings>,
    global: RwLock<GlobalSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn guild(&self, guild_id: u64) -> Result<GuildSettings> {
        Ok(self
            .guilds
            .get(&guild_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn set_guild(&self, guild_id: u64, settings: GuildSettings) -> Result<()> {
        self.guilds.insert(guild_id, settings);
        Ok(())
    }

    async fn channel(&self, channel_id: u64) -> Result<ChannelSettings> {
        Ok(self
            .channels
            .get(&channel_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn set_channel(&self, channel_id: u64, settings: ChannelSettings) -> Result<()> {
        self.channels.insert(channel_id, settings);
        Ok(())
    }

    async fn global(&self) -> Result<GlobalSettings> {
        Ok(self.global.read().await.clone())
    }

    async fn set_global(&self, settings: GlobalSettings) -> Result<()> {
        *self.global.write().await = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn unset_guild_reads_as_default() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.guild(1).await.unwrap(), GuildSettings::default());
    }

    #[tokio::test]
    async fn guild_settings_round_trip() {
        let store = MemorySettingsStore::new();
        let mut settings = GuildSettings::default();
        settings.mystic_role = Some(99);
        store.set_guild(1, settings.clone()).await.unwrap();

        assert_eq!(store.guild(1).await.unwrap(), settings);
        // Other guilds are unaffected.
        assert_eq!(store.guild(2).await.unwrap(), GuildSettings::default());
    }

    #[tokio::test]
    async fn channel_and_global_round_trip() {
        let store = MemorySettingsStore::new();
        store
            .set_channel(5, ChannelSettings { profile_ocr: true })
            .await
            .unwrap();
        assert!(store.channel(5).await.unwrap().profile_ocr);

        let global = GlobalSettings {
            notice: Some("maintenance".into()),
            embed_footer: None,
        };
        store.set_global(global.clone()).await.unwrap();
        assert_eq!(store.global().await.unwrap(), global);
    }
}
