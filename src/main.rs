mod config;
mod platform;
mod router;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::router::CommandRouter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,copybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An explicit env file must exist; the default ./.env is optional
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(env_path) => {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path)
                .with_context(|| format!("Failed to load env file {}", env_path.display()))?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv() {
                debug!("No .env file loaded: {}", e);
            }
        }
    }

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Configuration loaded successfully");
    info!("  Destination chat: {:?}", config.destination);

    let bot = Bot::new(&config.bot_token);
    let router = Arc::new(CommandRouter::new(
        config.destination.clone(),
        Arc::new(bot.clone()),
    ));

    info!("Starting Telegram Copy-Paste Bot...");
    platform::telegram::run(router, bot).await?;

    Ok(())
}
