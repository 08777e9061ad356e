use poise::serenity_prelude as serenity;
use serenity::{Client, GatewayIntents};
use tracing::{error, info};

use super::{BotData, Command, cogs::CogReport, errors};

pub struct DiscordClient {
    pub serenity_client: Client,
}

impl DiscordClient {
    pub async fn new(
        token: &str,
        intents: GatewayIntents,
        commands: Vec<Command>,
        cogs: CogReport,
    ) -> anyhow::Result<Self> {
        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands,
                on_error: |error| Box::pin(errors::on_error(error)),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Logged in as {}", ready.user.name);
                    info!("Loaded cogs: {:?}", cogs.loaded);
                    if !cogs.errors.is_empty() {
                        error!("Failed to load cogs: {:?}", cogs.errors);
                    }
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!(
                        "Registered {} slash commands",
                        framework.options().commands.len()
                    );
                    Ok(BotData)
                })
            })
            .build();

        let serenity_client = serenity::ClientBuilder::new(token, intents)
            .framework(framework)
            .await?;

        Ok(DiscordClient { serenity_client })
    }
}
