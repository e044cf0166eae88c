//! TrainerDex Discord - Bot Integration
//!
//! This crate provides the Discord-facing half of the TrainerDex
//! integration: slash command registration and dispatch, the quickstart
//! role reconciler, and the settings command surface. Domain logic lives
//! in `tdx-core`.

pub mod bot;
pub mod error;
pub mod helpers;
pub mod quickstart;
pub mod settings_commands;
pub mod slash_commands;

pub use bot::{TdxBot, TdxBotBuilder, TdxState};
pub use error::{DiscordError, Result};
pub use quickstart::{best_effort_role_match, RoleCandidate, RoleMatch};

// Re-export serenity for convenience
pub use serenity;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        best_effort_role_match, DiscordError, Result, RoleCandidate, RoleMatch, TdxBot,
        TdxBotBuilder, TdxState,
    };
}
