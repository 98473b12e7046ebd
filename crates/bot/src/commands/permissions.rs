//! `admin permissions`: edit the stored allow/deny lists.

use poise::CreateReply;

use ninjabot_core::ListType;
use ninjabot_infra::{add_to_list, remove_from_list, sync_permissions};

use crate::authz::admin_check;
use crate::context::Context;
use crate::discord::embeds;
use crate::errors::BotError;

#[poise::command(
    prefix_command,
    aliases("perms", "perm", "p"),
    check = "admin_check",
    subcommands("add", "remove", "list")
)]
pub async fn permissions(ctx: Context<'_>) -> Result<(), BotError> {
    send_usage(ctx).await
}

#[poise::command(prefix_command, check = "admin_check")]
pub async fn add(ctx: Context<'_>, list_type: String, snowflake: String) -> Result<(), BotError> {
    let list = match parse_edit(&list_type, &snowflake) {
        Ok(list) => list,
        Err(message) => return reject(ctx, message).await,
    };

    let data = ctx.data();
    let permissions = data.controller.permissions();
    let mut permissions = permissions.lock().await;
    add_to_list(data.store.as_ref(), &mut permissions, list, &snowflake).await?;
    drop(permissions);

    ctx.say(format!("Added {snowflake} to {list}")).await?;
    Ok(())
}

#[poise::command(prefix_command, check = "admin_check")]
pub async fn remove(ctx: Context<'_>, list_type: String, snowflake: String) -> Result<(), BotError> {
    let list = match parse_edit(&list_type, &snowflake) {
        Ok(list) => list,
        Err(message) => return reject(ctx, message).await,
    };

    let data = ctx.data();
    let permissions = data.controller.permissions();
    let mut permissions = permissions.lock().await;
    remove_from_list(data.store.as_ref(), &mut permissions, list, &snowflake).await?;
    drop(permissions);

    ctx.say(format!("Removed {snowflake} from {list}")).await?;
    Ok(())
}

#[poise::command(prefix_command, check = "admin_check")]
pub async fn list(ctx: Context<'_>, list_type: String) -> Result<(), BotError> {
    let list = match parse_list_type(&list_type) {
        Ok(list) => list,
        Err(message) => return reject(ctx, message).await,
    };

    let data = ctx.data();
    let permissions = data.controller.permissions();
    let stored = {
        let mut permissions = permissions.lock().await;
        sync_permissions(data.store.as_ref(), &mut permissions).await?;
        permissions.list(list).to_stored()
    };

    ctx.say(format!("Current {list}: {stored}")).await?;
    Ok(())
}

fn parse_list_type(raw: &str) -> Result<ListType, String> {
    raw.parse()
        .map_err(|_| format!("Invalid list type: '{raw}'"))
}

fn parse_edit(list_type: &str, snowflake: &str) -> Result<ListType, String> {
    let list = parse_list_type(list_type)?;
    let snowflake = snowflake.trim();
    if snowflake != "*" && snowflake.parse::<u64>().is_err() {
        return Err(format!("Invalid snowflake id: '{snowflake}'"));
    }
    Ok(list)
}

async fn reject(ctx: Context<'_>, message: String) -> Result<(), BotError> {
    let usage = embeds::permissions_usage(&ctx.data().prefix);
    ctx.send(CreateReply::default().content(message).embed(usage)).await?;
    Ok(())
}

async fn send_usage(ctx: Context<'_>) -> Result<(), BotError> {
    ctx.send(CreateReply::default().embed(embeds::permissions_usage(&ctx.data().prefix)))
        .await?;
    Ok(())
}
