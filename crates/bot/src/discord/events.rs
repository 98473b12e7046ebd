//! Gateway events are translated into [`ChatEvent`]s and published on the bus.

use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

use ninjabot_core::{CategoryId, GuildId};
use ninjabot_events::{ChatEvent, EventBus, MessageEvent, ReactionEmoji, ReactionEvent};

use crate::context::Data;
use crate::discord::{channel_id, emoji_id, guild_id, message_id, user_id};
use crate::errors::BotError;

pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, BotError>,
    data: &Data,
) -> Result<(), BotError> {
    let translated = match event {
        serenity::FullEvent::Message { new_message } => {
            Some(ChatEvent::MessageCreated(message_event(ctx, new_message)))
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            add_reaction.user_id.map(|user| {
                ChatEvent::ReactionAdded(ReactionEvent {
                    message_id: message_id(add_reaction.message_id),
                    channel_id: channel_id(add_reaction.channel_id),
                    user_id: user_id(user),
                    emoji: reaction_emoji(&add_reaction.emoji),
                })
            })
        }
        serenity::FullEvent::GuildCreate { guild, .. } => {
            let event = guild_available(
                data.guild_id,
                guild_id(guild.id),
                !guild.roles.is_empty(),
                !guild.channels.is_empty(),
            );
            if event.is_some() {
                info!(guild_id = %guild.id, name = %guild.name, "guild is available");
            }
            event
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            guild_unavailable(data.guild_id, guild_id(incomplete.id))
        }
        _ => None,
    };

    if let Some(event) = translated {
        data.bus.publish(event)?;
    }
    Ok(())
}

/// `GuildReady` for the configured guild once its roles and channels are known.
pub(crate) fn guild_available(
    configured: GuildId,
    guild: GuildId,
    has_roles: bool,
    has_channels: bool,
) -> Option<ChatEvent> {
    if guild != configured {
        debug!(guild_id = %guild, "ignoring foreign guild");
        return None;
    }
    if !has_roles || !has_channels {
        warn!(guild_id = %guild, "guild arrived without roles or channels");
        return None;
    }
    Some(ChatEvent::GuildReady(guild))
}

pub(crate) fn guild_unavailable(configured: GuildId, guild: GuildId) -> Option<ChatEvent> {
    if guild != configured {
        return None;
    }
    warn!(guild_id = %guild, "guild became unavailable");
    Some(ChatEvent::GuildUnavailable(guild))
}

pub(crate) fn reaction_emoji(emoji: &serenity::ReactionType) -> ReactionEmoji {
    match emoji {
        serenity::ReactionType::Custom { id, .. } => ReactionEmoji::Custom { id: emoji_id(*id) },
        other => ReactionEmoji::Unicode(other.to_string()),
    }
}

fn message_event(ctx: &serenity::Context, message: &serenity::Message) -> MessageEvent {
    let (category_id, publicly_visible) = message
        .guild_id
        .and_then(|gid| {
            let guild = ctx.cache.guild(gid)?;
            let everyone = everyone_base(&guild);
            Some(channel_context(message.channel_id, everyone, |id| {
                channel_view(&guild, id)
            }))
        })
        .unwrap_or((None, false));

    MessageEvent {
        message_id: message_id(message.id),
        channel_id: channel_id(message.channel_id),
        category_id,
        guild_id: message.guild_id.map(guild_id),
        author_id: user_id(message.author.id),
        author_is_bot: message.author.bot,
        publicly_visible,
    }
}

/// What visibility resolution needs to know about one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChannelView {
    pub parent_id: Option<serenity::ChannelId>,
    pub is_thread: bool,
    /// `(allow, deny)` of the `@everyone` overwrite.
    pub everyone_overwrite: Option<(serenity::Permissions, serenity::Permissions)>,
}

fn everyone_role(guild: &serenity::Guild) -> serenity::RoleId {
    serenity::RoleId::new(guild.id.get())
}

fn everyone_base(guild: &serenity::Guild) -> serenity::Permissions {
    guild
        .roles
        .get(&everyone_role(guild))
        .map(|role| role.permissions)
        .unwrap_or_else(serenity::Permissions::empty)
}

fn channel_view(guild: &serenity::Guild, id: serenity::ChannelId) -> Option<ChannelView> {
    let channel = guild
        .channels
        .get(&id)
        .or_else(|| guild.threads.iter().find(|thread| thread.id == id))?;
    let everyone = serenity::PermissionOverwriteType::Role(everyone_role(guild));
    Some(ChannelView {
        parent_id: channel.parent_id,
        is_thread: channel.thread_metadata.is_some(),
        everyone_overwrite: channel
            .permission_overwrites
            .iter()
            .find(|overwrite| overwrite.kind == everyone)
            .map(|overwrite| (overwrite.allow, overwrite.deny)),
    })
}

/// Category and public visibility of a channel. Threads are judged by their
/// parent channel.
pub(crate) fn channel_context(
    channel: serenity::ChannelId,
    everyone_base: serenity::Permissions,
    lookup: impl Fn(serenity::ChannelId) -> Option<ChannelView>,
) -> (Option<CategoryId>, bool) {
    let Some(mut view) = lookup(channel) else {
        return (None, false);
    };
    if view.is_thread {
        if let Some(parent) = view.parent_id.and_then(&lookup) {
            view = parent;
        }
    }

    let category = view.parent_id.map(|id| CategoryId::new(id.get()));
    let public = apply_overwrites(everyone_base, view.everyone_overwrite)
        .contains(serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES);
    (category, public)
}

/// Resolve channel permissions from base permissions and `(allow, deny)`
/// overwrites, applied in order.
pub(crate) fn apply_overwrites(
    base: serenity::Permissions,
    overwrites: impl IntoIterator<Item = (serenity::Permissions, serenity::Permissions)>,
) -> serenity::Permissions {
    if base.contains(serenity::Permissions::ADMINISTRATOR) {
        return serenity::Permissions::all();
    }
    overwrites
        .into_iter()
        .fold(base, |perms, (allow, deny)| (perms & !deny) | allow)
}
