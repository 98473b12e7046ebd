//! Embeds and reply texts.

use poise::serenity_prelude as serenity;

use ninjabot_core::{LeaderboardEntry, ListType, UserId, ordinal};
use ninjabot_game::{NINJA_THUMBNAIL_URL, RoundSummary};

const NINJA_RED: (u8, u8, u8) = (214, 40, 24);

fn colour((r, g, b): (u8, u8, u8)) -> serenity::Colour {
    serenity::Colour::from_rgb(r, g, b)
}

pub fn summary(summary: &RoundSummary) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(&summary.title)
        .description(&summary.description)
        .colour(colour(summary.colour))
        .thumbnail(&summary.thumbnail_url)
        .timestamp(serenity::Timestamp::from(summary.timestamp))
}

pub fn info_description(prefix: &str, ninja: &str) -> String {
    format!(
        "All day, ninja duck will sneak up on our messages. Those who are \
         observant may earn points by clicking on the {ninja} reaction as it appears.\n\n\
         **How it works**\n\
         The bot will automatically react with {ninja}. If you click that reaction \
         before the timer runs out, you'll earn points. The quicker you react, the \
         more points you get.\n\n\
         *Spamming messages will not make the ninja appear sooner, so please be \
         mindful of others.*\n\n\
         **Commands**\n\
         • `{prefix}ninja score` - get your personal ninja score\n\
         • `{prefix}ninja leaderboard` - get the current top 10\n"
    )
}

pub fn info(prefix: &str, ninja: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Spot Ninja Duck!")
        .description(info_description(prefix, ninja))
        .colour(colour(NINJA_RED))
        .thumbnail(NINJA_THUMBNAIL_URL)
}

pub fn score_description(entry: Option<&LeaderboardEntry>) -> String {
    match entry {
        None => "You have not scored any points yet.".to_string(),
        Some(entry) => {
            let position = if entry.tied { "tied for" } else { "in" };
            format!(
                "Your score is {}. You're currently {position} {} place.",
                entry.score,
                ordinal(entry.rank)
            )
        }
    }
}

pub fn score(entry: Option<&LeaderboardEntry>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Your ninja duck score")
        .description(score_description(entry))
        .colour(colour(NINJA_RED))
}

pub fn leaderboard(table: String) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Top 10")
        .description(table)
        .colour(colour(NINJA_RED))
        .thumbnail(NINJA_THUMBNAIL_URL)
        .timestamp(serenity::Timestamp::now())
}

pub fn admin_overview_description(prefix: &str) -> String {
    [
        "**Moderation Commands**".to_string(),
        format!("`{prefix}admin block <user>` - block a user and REMOVE their score"),
        format!("`{prefix}admin unblock <user>` - unblock a user"),
        format!("`{prefix}admin blocked` - list blocked users"),
        String::new(),
        "**Admin Commands**".to_string(),
        format!("`{prefix}admin game [status|start|stop|clear]`"),
        format!("`{prefix}admin permissions`"),
        format!("`{prefix}admin permissions add <list_type> <snowflake>`"),
        format!("`{prefix}admin permissions remove <list_type> <snowflake>`"),
        format!("`{prefix}admin permissions list <list_type>`"),
    ]
    .join("\n")
}

pub fn admin_overview(prefix: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Admin & Moderation Commands")
        .description(admin_overview_description(prefix))
        .colour(colour(NINJA_RED))
        .thumbnail(NINJA_THUMBNAIL_URL)
}

pub fn permissions_usage_description(prefix: &str) -> String {
    let lists = ListType::ALL
        .iter()
        .map(|list| format!("• `{list}`"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Usage:\n`{prefix}admin permissions [list|add|remove] <list_type> <id>`\n\n\
         The following lists are available:\n{lists}\n\n\
         Use `*` as the id to match everything."
    )
}

pub fn permissions_usage(prefix: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Admin - Permissions Management")
        .description(permissions_usage_description(prefix))
        .colour(colour(NINJA_RED))
        .timestamp(serenity::Timestamp::now())
}

/// `Currently blocked users: <@a>, <@b>` in id order.
pub fn blocked_users_text(users: impl IntoIterator<Item = UserId>) -> String {
    let mut users: Vec<UserId> = users.into_iter().collect();
    users.sort();
    let formatted = users
        .iter()
        .map(UserId::mention)
        .collect::<Vec<_>>()
        .join(", ");
    if formatted.is_empty() {
        "Currently blocked users: (no blocked users)".to_string()
    } else {
        format!("Currently blocked users: {formatted}")
    }
}
