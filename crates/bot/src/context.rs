use std::sync::Arc;

use ninjabot_auth::StaffPolicy;
use ninjabot_core::{EmojiId, GuildId};
use ninjabot_events::{ChatEvent, InMemoryEventBus};
use ninjabot_game::GameController;
use ninjabot_infra::GameStore;

use crate::errors::BotError;

/// Shared state handed to every command and event handler.
pub struct Data {
    pub controller: GameController,
    pub store: Arc<dyn GameStore>,
    pub bus: Arc<InMemoryEventBus<ChatEvent>>,
    pub policy: StaffPolicy,
    pub guild_id: GuildId,
    pub prefix: String,
    /// Chat markup of the fallback ninja emoji, shown in help texts.
    pub ninja_emoji: String,
    pub emoji_confirm: EmojiId,
    pub emoji_deny: EmojiId,
}

pub type Context<'a> = poise::Context<'a, Data, BotError>;
