use poise::CreateReply;
use poise::serenity_prelude as serenity;
use tracing::info;

use ninjabot_core::UserId;
use ninjabot_infra::{GameStore, StoreResult};

use crate::authz::moderator_check;
use crate::commands::game::game;
use crate::commands::permissions::permissions;
use crate::context::Context;
use crate::discord::{embeds, user_id};
use crate::errors::BotError;

/// Staff commands.
#[poise::command(
    prefix_command,
    aliases("a"),
    check = "moderator_check",
    subcommands("block", "unblock", "blocked", "game", "permissions")
)]
pub async fn admin(ctx: Context<'_>) -> Result<(), BotError> {
    ctx.send(CreateReply::default().embed(embeds::admin_overview(&ctx.data().prefix)))
        .await?;
    Ok(())
}

/// Block a member and remove their score.
#[poise::command(prefix_command, check = "moderator_check")]
pub async fn block(ctx: Context<'_>, user: serenity::User) -> Result<(), BotError> {
    let target = user_id(user.id);
    let store = &ctx.data().store;
    store.block_user(target).await?;
    store.delete_score(target).await?;

    info!(user_id = %target, moderator_id = %ctx.author().id, "blocked user");
    ctx.say(format!("Successfully blocked {} and removed their score.", target.mention()))
        .await?;
    Ok(())
}

#[poise::command(prefix_command, check = "moderator_check")]
pub async fn unblock(ctx: Context<'_>, user: serenity::User) -> Result<(), BotError> {
    let target = user_id(user.id);
    if !lift_block(ctx.data().store.as_ref(), target).await? {
        ctx.say(format!("{} is not blocked.", target.mention())).await?;
        return Ok(());
    }

    info!(user_id = %target, moderator_id = %ctx.author().id, "unblocked user");
    ctx.say(format!("Successfully unblocked {}.", target.mention())).await?;
    Ok(())
}

/// Unblock `target`. Returns false when they were not blocked.
async fn lift_block(store: &dyn GameStore, target: UserId) -> StoreResult<bool> {
    if !store.is_blocked(target).await? {
        return Ok(false);
    }
    store.unblock_user(target).await?;
    Ok(true)
}

#[poise::command(prefix_command, check = "moderator_check")]
pub async fn blocked(ctx: Context<'_>) -> Result<(), BotError> {
    let users = ctx.data().store.blocked_users().await?;
    ctx.say(embeds::blocked_users_text(users)).await?;
    Ok(())
}
