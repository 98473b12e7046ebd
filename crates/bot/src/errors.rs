use poise::FrameworkError;
use poise::serenity_prelude as serenity;
use thiserror::Error;
use tracing::{error, warn};

use ninjabot_events::BusError;
use ninjabot_game::GameError;
use ninjabot_infra::{ListEditError, StoreError};

use crate::context::Data;

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Discord(#[from] serenity::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    ListEdit(#[from] ListEditError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Framework-wide error handler.
///
/// Unknown commands and failed checks are dropped silently so members
/// cannot probe for staff commands.
pub async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::UnknownCommand { .. } | FrameworkError::CommandCheckFailed { .. } => {}
        FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            let reply = match input {
                Some(input) => format!("Could not understand `{input}`: {error}"),
                None => format!("Missing or invalid argument: {error}"),
            };
            if let Err(err) = ctx.say(reply).await {
                warn!(error = %err, "failed to reply to argument error");
            }
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                command = %ctx.command().qualified_name,
                author_id = %ctx.author().id,
                error = %error,
                "command failed"
            );
        }
        FrameworkError::EventHandler { error, event, .. } => {
            error!(event = %event.snake_case_name(), error = %error, "event handler failed");
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!(error = %err, "error while handling framework error");
            }
        }
    }
}
