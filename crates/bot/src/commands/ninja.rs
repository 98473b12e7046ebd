use poise::CreateReply;

use ninjabot_core::Leaderboard;

use crate::authz::member_check;
use crate::context::Context;
use crate::discord::{embeds, user_id};
use crate::errors::BotError;

/// How to play.
#[poise::command(prefix_command, check = "member_check")]
pub async fn help(ctx: Context<'_>) -> Result<(), BotError> {
    send_info(ctx).await
}

#[poise::command(
    prefix_command,
    aliases("ninja_hunt", "ninja_bot", "ninjahunt", "ninjabot", "n"),
    check = "member_check",
    subcommands("score", "leaderboard")
)]
pub async fn ninja(ctx: Context<'_>) -> Result<(), BotError> {
    send_info(ctx).await
}

/// Your score and place.
#[poise::command(prefix_command, aliases("s"), check = "member_check")]
pub async fn score(ctx: Context<'_>) -> Result<(), BotError> {
    let scores = ctx.data().store.scores().await?;
    let board = Leaderboard::from_scores(&scores);
    let entry = board.get(user_id(ctx.author().id));
    ctx.send(CreateReply::default().embed(embeds::score(entry))).await?;
    Ok(())
}

/// The top 10.
#[poise::command(prefix_command, aliases("lb"), check = "member_check")]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), BotError> {
    let scores = ctx.data().store.scores().await?;
    let table = Leaderboard::from_scores(&scores).render_table(10);
    ctx.send(CreateReply::default().embed(embeds::leaderboard(table))).await?;
    Ok(())
}

async fn send_info(ctx: Context<'_>) -> Result<(), BotError> {
    let data = ctx.data();
    ctx.send(CreateReply::default().embed(embeds::info(&data.prefix, &data.ninja_emoji)))
        .await?;
    Ok(())
}
