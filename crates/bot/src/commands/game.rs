//! `admin game`: lifecycle and scoreboard reset.

use poise::serenity_prelude as serenity;
use tracing::info;

use ninjabot_core::{EmojiId, GameState};
use ninjabot_events::EventBus;
use ninjabot_game::GameError;
use ninjabot_infra::RoundStats;

use crate::authz::admin_check;
use crate::commands::confirm::{DECISION_TIMEOUT, Decision, wait_for_decision};
use crate::context::Context;
use crate::discord::{message_id, user_id};
use crate::errors::BotError;

#[poise::command(
    prefix_command,
    check = "admin_check",
    subcommands("status", "start", "stop", "clear")
)]
pub async fn game(ctx: Context<'_>) -> Result<(), BotError> {
    send_status(ctx).await
}

#[poise::command(prefix_command, check = "admin_check")]
pub async fn status(ctx: Context<'_>) -> Result<(), BotError> {
    send_status(ctx).await
}

#[poise::command(prefix_command, check = "admin_check")]
pub async fn start(ctx: Context<'_>) -> Result<(), BotError> {
    let reply = match ctx.data().controller.start().await {
        Ok(()) => "Started the game.",
        Err(GameError::AlreadyRunning) => "The game is already running.",
        Err(err) => return Err(err.into()),
    };
    ctx.say(reply).await?;
    Ok(())
}

#[poise::command(prefix_command, check = "admin_check")]
pub async fn stop(ctx: Context<'_>) -> Result<(), BotError> {
    let reply = match ctx.data().controller.stop().await {
        Ok(()) => "Stopped the game.",
        Err(GameError::NotRunning) => "The game is not running.",
        Err(err) => return Err(err.into()),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Wipe the scoreboard after the invoker confirms with a reaction.
#[poise::command(prefix_command, check = "admin_check")]
pub async fn clear(ctx: Context<'_>) -> Result<(), BotError> {
    let data = ctx.data();
    // Subscribe first so a quick reaction is not missed.
    let mut events = data.bus.subscribe();

    let reply = ctx
        .say("THIS WILL IRREVOCABLY CLEAR THE LEADERBOARD. ARE YOU SURE?")
        .await?;
    let prompt = reply.message().await?;

    let confirm = guild_reaction(ctx, data.emoji_confirm, "confirm");
    let deny = guild_reaction(ctx, data.emoji_deny, "deny");
    prompt.react(ctx.serenity_context(), confirm).await?;
    prompt.react(ctx.serenity_context(), deny).await?;

    let decision = wait_for_decision(
        &mut events,
        message_id(prompt.id),
        user_id(ctx.author().id),
        data.emoji_confirm,
        data.emoji_deny,
        DECISION_TIMEOUT,
    )
    .await;

    match decision {
        Decision::TimedOut => {
            prompt.delete_reactions(ctx.serenity_context()).await?;
            ctx.say("Timed out. Please try again.").await?;
        }
        Decision::Denied => {
            ctx.say("Scoreboard NOT cleared.").await?;
        }
        Decision::Confirmed => {
            data.store.clear_scores().await?;
            info!(admin_id = %ctx.author().id, "scoreboard cleared");
            ctx.say("Scoreboard cleared.").await?;
        }
    }
    Ok(())
}

async fn send_status(ctx: Context<'_>) -> Result<(), BotError> {
    let data = ctx.data();
    let stats = data.store.stats().await?;
    let text = status_text(data.controller.status(), data.controller.state(), &stats);
    ctx.say(text).await?;
    Ok(())
}

/// Custom guild emoji as a reaction, named from the cache when available.
fn guild_reaction(ctx: Context<'_>, id: EmojiId, fallback_name: &str) -> serenity::ReactionType {
    let emoji = serenity::EmojiId::new(id.get());
    let name = ctx
        .guild()
        .and_then(|guild| guild.emojis.get(&emoji).map(|e| e.name.clone()))
        .unwrap_or_else(|| fallback_name.to_string());
    serenity::ReactionType::Custom {
        animated: false,
        id: emoji,
        name: Some(name),
    }
}

fn status_text(running: bool, state: GameState, stats: &RoundStats) -> String {
    let headline = if running {
        format!("The game is currently running ({state}).")
    } else {
        "The game is currently NOT running.".to_string()
    };
    format!(
        "{headline}\nRounds played: {} ({} detected, {} undetected), {} points awarded.",
        stats.rounds, stats.detected, stats.undetected, stats.points_awarded
    )
}
