//! Bot configuration, loaded from a toml file with env fallbacks.

use std::path::Path;

use miette::{Diagnostic, IntoDiagnostic};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tdx_core::DEFAULT_API_BASE;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Missing Discord token")]
    #[diagnostic(
        code(tdx_main::missing_discord_token),
        help("Set `discord_token` in the config file or the DISCORD_TOKEN env var")
    )]
    MissingDiscordToken,

    #[error("Missing TrainerDex API token")]
    #[diagnostic(
        code(tdx_main::missing_api_token),
        help("Set `trainerdex_token` in the config file or the TRAINERDEX_TOKEN env var")
    )]
    MissingApiToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Discord bot token; falls back to DISCORD_TOKEN.
    #[serde(default)]
    pub discord_token: Option<String>,

    /// TrainerDex API token; falls back to TRAINERDEX_TOKEN.
    #[serde(default)]
    pub trainerdex_token: Option<String>,

    /// TrainerDex API root.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Users allowed to change global settings.
    #[serde(default)]
    pub owner_ids: Vec<u64>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            discord_token: None,
            trainerdex_token: None,
            api_base: default_api_base(),
            owner_ids: Vec::new(),
        }
    }
}

impl BotConfig {
    /// Load from a toml file; a missing file yields the defaults so the
    /// bot can run on env vars alone.
    pub fn load(path: &Path) -> miette::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).into_diagnostic()?;
        toml::from_str(&raw).into_diagnostic()
    }

    pub fn discord_token(&self) -> Result<String, ConfigError> {
        self.discord_token
            .clone()
            .or_else(|| std::env::var("DISCORD_TOKEN").ok())
            .ok_or(ConfigError::MissingDiscordToken)
    }

    pub fn trainerdex_token(&self) -> Result<String, ConfigError> {
        self.trainerdex_token
            .clone()
            .or_else(|| std::env::var("TRAINERDEX_TOKEN").ok())
            .ok_or(ConfigError::MissingApiToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_point_at_production_api() {
        let config = BotConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.owner_ids.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: BotConfig = toml::from_str(
            r#"
            discord_token = "abc"
            owner_ids = [123]
            "#,
        )
        .unwrap();
        assert_eq!(config.discord_token.as_deref(), Some("abc"));
        assert_eq!(config.owner_ids, vec![123]);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
