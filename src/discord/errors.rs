use std::time::Duration;

use poise::{
    CreateReply, FrameworkError,
    serenity_prelude::{Colour, CreateEmbed, Permissions},
};
use tracing::error;

use super::{BotData, Error};

static EMBED_TITLE: &str = "__An error occurred__";

/// Why a command could not be completed, detached from the framework context.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandFailure {
    Invocation(String),
    ArgumentParse {
        input: Option<String>,
        error: String,
    },
    StructureMismatch(&'static str),
    Cooldown(Duration),
    MissingBotPermissions(Vec<String>),
    /// Empty when the framework could not resolve the member's permissions.
    MissingUserPermissions(Vec<String>),
    NotOwner,
    GuildOnly,
    DmOnly,
    NsfwOnly,
    CheckFailed(Option<String>),
    SubcommandRequired,
    Panic,
    Unknown,
}

impl CommandFailure {
    pub fn from_framework_error(error: &FrameworkError<'_, BotData, Error>) -> Self {
        match error {
            FrameworkError::Command { error, .. } => Self::Invocation(error.to_string()),
            FrameworkError::ArgumentParse { error, input, .. } => Self::ArgumentParse {
                input: input.clone(),
                error: error.to_string(),
            },
            FrameworkError::CommandStructureMismatch { description, .. } => {
                Self::StructureMismatch(*description)
            }
            FrameworkError::CooldownHit {
                remaining_cooldown, ..
            } => Self::Cooldown(*remaining_cooldown),
            FrameworkError::MissingBotPermissions {
                missing_permissions,
                ..
            } => Self::missing_bot_permissions(*missing_permissions),
            FrameworkError::MissingUserPermissions {
                missing_permissions,
                ..
            } => Self::missing_user_permissions(*missing_permissions),
            FrameworkError::NotAnOwner { .. } => Self::NotOwner,
            FrameworkError::GuildOnly { .. } => Self::GuildOnly,
            FrameworkError::DmOnly { .. } => Self::DmOnly,
            FrameworkError::NsfwOnly { .. } => Self::NsfwOnly,
            FrameworkError::CommandCheckFailed { error, .. } => {
                Self::CheckFailed(error.as_ref().map(ToString::to_string))
            }
            FrameworkError::SubcommandRequired { .. } => Self::SubcommandRequired,
            FrameworkError::CommandPanic { .. } => Self::Panic,
            _ => Self::Unknown,
        }
    }

    pub fn missing_bot_permissions(missing: Permissions) -> Self {
        Self::MissingBotPermissions(permission_names(missing))
    }

    pub fn missing_user_permissions(missing: Option<Permissions>) -> Self {
        Self::MissingUserPermissions(missing.map(permission_names).unwrap_or_default())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Invocation(_) => "Command invocation error",
            Self::ArgumentParse { .. } => "Bad argument",
            Self::StructureMismatch(_) => "Conversion error",
            Self::Cooldown(_) => "Command on cooldown",
            Self::MissingBotPermissions(_) => "Bot missing permissions",
            Self::MissingUserPermissions(_) => "Missing permissions",
            Self::NotOwner => "Not owner",
            Self::GuildOnly => "No private message",
            Self::DmOnly => "Private message only",
            Self::NsfwOnly => "NSFW channel required",
            Self::CheckFailed(_) => "Check failure",
            Self::SubcommandRequired => "Subcommand required",
            Self::Panic | Self::Unknown => "Unknown error",
        }
    }

    pub fn details(&self) -> Option<String> {
        let details = match self {
            Self::Invocation(error) => format!("The command raised an error: {error}"),
            Self::ArgumentParse {
                input: Some(input),
                error,
            } => format!(
                "One or more arguments provided are invalid.\nCould not parse `{input}`: {error}"
            ),
            Self::ArgumentParse { input: None, error } => {
                format!("One or more arguments provided are invalid.\n{error}")
            }
            Self::StructureMismatch(description) => {
                format!("Failed to convert argument: {description}")
            }
            Self::Cooldown(remaining) => format!(
                "You need to wait `{:.2}` seconds before using this command again.",
                remaining.as_secs_f64()
            ),
            Self::MissingBotPermissions(names) => format!(
                "The bot is missing {} permission(s) to run this command.",
                humanize_permissions(names)
            ),
            Self::MissingUserPermissions(names) if names.is_empty() => {
                "You are missing the permissions required to run this command.".to_owned()
            }
            Self::MissingUserPermissions(names) => format!(
                "You are missing {} permission(s) to run this command.",
                humanize_permissions(names)
            ),
            Self::NotOwner => "You are not the owner of this bot.".to_owned(),
            Self::GuildOnly => "This command cannot be used in a private message.".to_owned(),
            Self::DmOnly => "This command can only be used in a private message.".to_owned(),
            Self::NsfwOnly => "This command can only be used in NSFW channels.".to_owned(),
            Self::CheckFailed(None) => "You do not have permission to run this command.".to_owned(),
            Self::CheckFailed(Some(reason)) => {
                format!("You do not have permission to run this command.\n{reason}")
            }
            Self::SubcommandRequired => return None,
            Self::Panic | Self::Unknown => {
                "An unexpected error occurred. Please try again later.".to_owned()
            }
        };
        Some(details)
    }
}

fn permission_names(permissions: Permissions) -> Vec<String> {
    permissions
        .get_permission_names()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// `MANAGE_GUILD` and `Manage Guild` both become `` `Manage Server` ``.
pub fn humanize_permission(name: &str) -> String {
    let words = name
        .to_lowercase()
        .replace('_', " ")
        .replace("guild", "server");
    let titled: Vec<String> = words
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("`{}`", titled.join(" "))
}

fn humanize_permissions(names: &[String]) -> String {
    names
        .iter()
        .map(|name| humanize_permission(name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn embed_description(title: &str, details: Option<&str>) -> String {
    match details {
        Some(details) => format!("**Error:**\n{title}\n\n**Additional info:**\n{details}"),
        None => format!("**Error:**\n{title}"),
    }
}

pub fn error_embed(failure: &CommandFailure) -> CreateEmbed {
    CreateEmbed::new()
        .title(EMBED_TITLE)
        .description(embed_description(
            failure.title(),
            failure.details().as_deref(),
        ))
        .colour(Colour::RED)
}

/// Framework-wide error hook: logs every failure and answers the invoking
/// user with an ephemeral embed when there is someone to answer.
pub async fn on_error(error: FrameworkError<'_, BotData, Error>) {
    match &error {
        FrameworkError::Setup { error, .. } => {
            error!("Error during setup: {}", error);
            return;
        }
        FrameworkError::EventHandler { error, .. } => {
            error!("Error in event handler: {}", error);
            return;
        }
        _ => {}
    }

    let failure = CommandFailure::from_framework_error(&error);
    let Some(ctx) = error.ctx() else {
        error!("Unhandled framework error: {}", failure.title());
        return;
    };

    error!(
        "Error occurred in command '{}': {}",
        ctx.command().name,
        failure
            .details()
            .unwrap_or_else(|| failure.title().to_owned())
    );

    let reply = CreateReply::default()
        .embed(error_embed(&failure))
        .ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        error!("Error while sending error message: {}", e);
    }
}
