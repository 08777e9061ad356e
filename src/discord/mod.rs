pub mod cogs;
pub mod commands;
pub mod errors;
pub mod framework;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, BotData, Error>;
pub type Command = poise::Command<BotData, Error>;

/// Shared state handed to every command. The template keeps none yet.
pub struct BotData;
