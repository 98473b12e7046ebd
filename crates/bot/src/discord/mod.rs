//! Serenity adapters: gateway events in, chat operations out.

pub mod embeds;
pub mod events;
pub mod platform;

use poise::serenity_prelude as serenity;

use ninjabot_core::{ChannelId, EmojiId, GuildId, MessageId, NinjaEmoji, UserId};

pub(crate) fn user_id(id: serenity::UserId) -> UserId {
    UserId::new(id.get())
}

pub(crate) fn channel_id(id: serenity::ChannelId) -> ChannelId {
    ChannelId::new(id.get())
}

pub(crate) fn message_id(id: serenity::MessageId) -> MessageId {
    MessageId::new(id.get())
}

pub(crate) fn guild_id(id: serenity::GuildId) -> GuildId {
    GuildId::new(id.get())
}

pub(crate) fn emoji_id(id: serenity::EmojiId) -> EmojiId {
    EmojiId::new(id.get())
}

pub(crate) fn to_serenity_channel(id: ChannelId) -> serenity::ChannelId {
    serenity::ChannelId::new(id.get())
}

pub(crate) fn to_serenity_message(id: MessageId) -> serenity::MessageId {
    serenity::MessageId::new(id.get())
}

pub(crate) fn to_serenity_guild(id: GuildId) -> serenity::GuildId {
    serenity::GuildId::new(id.get())
}

pub(crate) fn reaction_type(emoji: &NinjaEmoji) -> serenity::ReactionType {
    serenity::ReactionType::Custom {
        animated: emoji.animated,
        id: serenity::EmojiId::new(emoji.id.get()),
        name: Some(emoji.name.clone()),
    }
}
