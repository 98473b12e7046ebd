//! The chat operations a round needs, independent of any client library.

use async_trait::async_trait;
use thiserror::Error;

use ninjabot_core::{ChannelId, MessageId, NinjaEmoji, UserId};

use crate::results::RoundSummary;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("missing permission: {0}")]
    Forbidden(String),

    #[error("chat request failed: {0}")]
    Request(String),
}

/// Outbound side of the chat service.
///
/// Implementations must be cheap to share between the game task and commands.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &NinjaEmoji,
    ) -> Result<(), PlatformError>;

    /// Remove every reaction with `emoji` from a message.
    async fn clear_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &NinjaEmoji,
    ) -> Result<(), PlatformError>;

    /// Upload a custom emoji to the guild.
    async fn create_emoji(&self, name: &str, image: &[u8]) -> Result<NinjaEmoji, PlatformError>;

    async fn delete_emoji(&self, emoji: &NinjaEmoji) -> Result<(), PlatformError>;

    async fn send_summary(&self, summary: &RoundSummary) -> Result<(), PlatformError>;

    fn bot_user_id(&self) -> UserId;
}
