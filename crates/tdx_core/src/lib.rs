//! TrainerDex Core - Trainer Profiles and Guild Settings
//!
//! This crate provides the domain layer for the TrainerDex Discord
//! integration: the trainer profile model, the faction enumeration, the
//! REST API client, and the typed settings schema with its persistence
//! contract. Nothing here depends on Discord types.

pub mod client;
pub mod error;
pub mod faction;
pub mod settings;
pub mod store;
pub mod trainer;
pub mod update;

pub use client::{ProfileApi, TrainerDexClient, DEFAULT_API_BASE};
pub use error::{Result, TdxError};
pub use faction::Faction;
pub use settings::{
    ChannelSettings, GlobalSettings, GuildSettings, GuildToggleField, StoredRoles, TeamRoleField,
};
pub use store::{MemorySettingsStore, SettingsStore};
pub use trainer::{Trainer, TrainerEdit};
pub use update::{PartialUpdate, Update};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        ChannelSettings, Faction, GlobalSettings, GuildSettings, GuildToggleField,
        MemorySettingsStore,
        PartialUpdate, ProfileApi, Result, SettingsStore, StoredRoles, TdxError, TeamRoleField,
        Trainer, TrainerDexClient, TrainerEdit, Update,
    };
}
