//! TrainerDex - Discord bot for Pokemon Go trainer profiles.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::Result;
use tracing::info;

use tdx_core::TrainerDexClient;
use tdx_discord::TdxBotBuilder;

use crate::config::BotConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "tdx.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting TrainerDex bot...");
    info!("Config file: {}", args.config.display());

    let config = BotConfig::load(&args.config)?;
    let discord_token = config.discord_token()?;
    let api_token = config.trainerdex_token()?;

    let api = Arc::new(TrainerDexClient::with_base_url(api_token, &config.api_base));
    let mut bot = TdxBotBuilder::new(&discord_token, api)
        .with_owner_ids(config.owner_ids.clone())
        .build()
        .await?;

    let shard_manager = bot.shard_manager();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down TrainerDex bot...");
            shard_manager.shutdown_all().await;
        }
    });

    bot.start().await?;
    Ok(())
}
