mod bootstrap;
mod config;
mod discord;
mod logger;
mod signal;

use config::BotConfig;
use discord::{cogs::CogRegistry, framework::DiscordClient};

use poise::serenity_prelude as serenity;

use serenity::GatewayIntents;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env variables if it exists.
    dotenvy::dotenv().ok();

    let _log_guard = logger::init(&logger::log_file_from_env())?;

    let config_path = BotConfig::path_from_env();
    let result = bootstrap::launch(&config_path, run).await;
    if let Err(why) = &result {
        error!("Bot exited with an error: {:#}", why);
    }
    result
}

async fn run(config: BotConfig) -> anyhow::Result<()> {
    let (commands, cogs) = CogRegistry::with_defaults().load();

    let mut client = DiscordClient::new(&config.token, GatewayIntents::all(), commands, cogs).await?;
    let shard_manager = client.serenity_client.shard_manager.clone();

    tokio::select! {
        result = client.serenity_client.start() => result?,
        _ = signal::wait_for_signal() => shard_manager.shutdown_all().await,
    }
    info!("Bot stopped");
    Ok(())
}
