//! `ChatPlatform` over the Discord REST API.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use ninjabot_core::{GuildId, NinjaEmoji, UserId};
use ninjabot_game::{ChatPlatform, PlatformError, RoundSummary};

use super::{emoji_id, embeds, reaction_type, to_serenity_channel, to_serenity_guild, to_serenity_message};

pub struct SerenityPlatform {
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
    bot_user_id: UserId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<serenity::Http>, guild_id: GuildId, bot_user_id: UserId) -> Self {
        Self {
            http,
            guild_id: to_serenity_guild(guild_id),
            bot_user_id,
        }
    }
}

fn request_error(err: serenity::Error) -> PlatformError {
    PlatformError::Request(err.to_string())
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn add_reaction(
        &self,
        channel: ninjabot_core::ChannelId,
        message: ninjabot_core::MessageId,
        emoji: &NinjaEmoji,
    ) -> Result<(), PlatformError> {
        to_serenity_channel(channel)
            .create_reaction(&self.http, to_serenity_message(message), reaction_type(emoji))
            .await
            .map_err(request_error)
    }

    async fn clear_reaction(
        &self,
        channel: ninjabot_core::ChannelId,
        message: ninjabot_core::MessageId,
        emoji: &NinjaEmoji,
    ) -> Result<(), PlatformError> {
        to_serenity_channel(channel)
            .delete_reaction_emoji(&self.http, to_serenity_message(message), reaction_type(emoji))
            .await
            .map_err(request_error)
    }

    async fn create_emoji(&self, name: &str, image: &[u8]) -> Result<NinjaEmoji, PlatformError> {
        let image = serenity::CreateAttachment::bytes(image.to_vec(), "ninja.png").to_base64();
        let emoji = self
            .guild_id
            .create_emoji(&self.http, name, &image)
            .await
            .map_err(request_error)?;

        let mut created = NinjaEmoji::new(emoji_id(emoji.id), emoji.name);
        created.animated = emoji.animated;
        Ok(created)
    }

    async fn delete_emoji(&self, emoji: &NinjaEmoji) -> Result<(), PlatformError> {
        self.guild_id
            .delete_emoji(&self.http, serenity::EmojiId::new(emoji.id.get()))
            .await
            .map_err(request_error)
    }

    async fn send_summary(&self, summary: &RoundSummary) -> Result<(), PlatformError> {
        let message = serenity::CreateMessage::new().embed(embeds::summary(summary));
        to_serenity_channel(summary.channel)
            .send_message(&*self.http, message)
            .await
            .map(|_| ())
            .map_err(request_error)
    }

    fn bot_user_id(&self) -> UserId {
        self.bot_user_id
    }
}
