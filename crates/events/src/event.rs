use ninjabot_core::{CategoryId, ChannelId, EmojiId, GuildId, MessageId, UserId};

/// Gateway events the game reacts to, stripped of transport types.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    MessageCreated(MessageEvent),
    ReactionAdded(ReactionEvent),
    /// The guild's cache (roles, channels) is populated and usable.
    GuildReady(GuildId),
    GuildUnavailable(GuildId),
}

/// A new message posted somewhere the bot can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub category_id: Option<CategoryId>,
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
    pub author_is_bot: bool,
    /// Whether the guild's default role can both read and send here.
    pub publicly_visible: bool,
}

/// A reaction added to any message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionEmoji {
    Custom { id: EmojiId },
    Unicode(String),
}

impl ReactionEmoji {
    pub fn custom_id(&self) -> Option<EmojiId> {
        match self {
            ReactionEmoji::Custom { id } => Some(*id),
            ReactionEmoji::Unicode(_) => None,
        }
    }
}
