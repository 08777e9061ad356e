use tracing::info;

use super::{Command, Context, Error, cogs::Cog};

/// Says hello!
#[poise::command(slash_command)]
pub async fn hello(ctx: Context<'_>) -> Result<(), Error> {
    info!("Channel {}: Hello received.", ctx.channel_id());
    ctx.say("Hello!").await?;
    Ok(())
}

/// The example cog shipped with the template.
pub struct ExampleCog;

impl Cog for ExampleCog {
    fn name(&self) -> &'static str {
        "example"
    }

    fn commands(&self) -> Vec<Command> {
        vec![hello()]
    }
}
