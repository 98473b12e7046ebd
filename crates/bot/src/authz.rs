//! Command checks.
//!
//! Thin poise adapters over the staff policy: resolve the invoking member's
//! roles, then defer to `ninjabot_auth`.

use ninjabot_auth::{Access, Principal, authorize, in_commands_channel};
use ninjabot_core::{ChannelId, RoleId, UserId};

use crate::context::Context;
use crate::errors::BotError;

async fn principal(ctx: Context<'_>) -> Principal {
    let roles: Vec<RoleId> = match ctx.author_member().await {
        Some(member) => member.roles.iter().map(|r| RoleId::new(r.get())).collect(),
        None => Vec::new(),
    };
    Principal::new(
        UserId::new(ctx.author().id.get()),
        ChannelId::new(ctx.channel_id().get()),
        roles,
    )
}

/// Member commands: commands channels only, bypass roles anywhere.
pub async fn member_check(ctx: Context<'_>) -> Result<bool, BotError> {
    let principal = principal(ctx).await;
    Ok(in_commands_channel(&ctx.data().policy, &principal, true).is_ok())
}

pub async fn moderator_check(ctx: Context<'_>) -> Result<bool, BotError> {
    let principal = principal(ctx).await;
    Ok(authorize(&ctx.data().policy, &principal, Access::Moderator).is_ok())
}

pub async fn admin_check(ctx: Context<'_>) -> Result<bool, BotError> {
    let principal = principal(ctx).await;
    Ok(authorize(&ctx.data().policy, &principal, Access::Admin).is_ok())
}
