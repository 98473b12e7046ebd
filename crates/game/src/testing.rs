//! Recording chat platform for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use ninjabot_core::{ChannelId, EmojiId, MessageId, NinjaEmoji, UserId};

use crate::platform::{ChatPlatform, PlatformError};
use crate::results::RoundSummary;

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    AddReaction(MessageId, EmojiId),
    ClearReaction(MessageId, EmojiId),
    CreateEmoji(String),
    DeleteEmoji(EmojiId),
    SendSummary(RoundSummary),
}

#[derive(Debug, Default)]
pub struct FakePlatform {
    calls: Mutex<Vec<PlatformCall>>,
    fail_create_emoji: AtomicBool,
    fail_add_reaction: AtomicBool,
    fail_send_summary: AtomicBool,
}

impl FakePlatform {
    pub const BOT_ID: u64 = 1;
    pub const CREATED_EMOJI_ID: u64 = 4242;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_emoji(&self) {
        self.fail_create_emoji.store(true, Ordering::SeqCst);
    }

    pub fn fail_add_reaction(&self) {
        self.fail_add_reaction.store(true, Ordering::SeqCst);
    }

    pub fn fail_send_summary(&self) {
        self.fail_send_summary.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<RoundSummary> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::SendSummary(summary) => Some(summary),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn add_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emoji: &NinjaEmoji,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::AddReaction(message, emoji.id));
        if self.fail_add_reaction.load(Ordering::SeqCst) {
            return Err(PlatformError::Forbidden("add reactions".to_string()));
        }
        Ok(())
    }

    async fn clear_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emoji: &NinjaEmoji,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::ClearReaction(message, emoji.id));
        Ok(())
    }

    async fn create_emoji(&self, name: &str, _image: &[u8]) -> Result<NinjaEmoji, PlatformError> {
        self.record(PlatformCall::CreateEmoji(name.to_string()));
        if self.fail_create_emoji.load(Ordering::SeqCst) {
            return Err(PlatformError::Request("emoji slots full".to_string()));
        }
        Ok(NinjaEmoji::new(EmojiId::new(Self::CREATED_EMOJI_ID), name))
    }

    async fn delete_emoji(&self, emoji: &NinjaEmoji) -> Result<(), PlatformError> {
        self.record(PlatformCall::DeleteEmoji(emoji.id));
        Ok(())
    }

    async fn send_summary(&self, summary: &RoundSummary) -> Result<(), PlatformError> {
        self.record(PlatformCall::SendSummary(summary.clone()));
        if self.fail_send_summary.load(Ordering::SeqCst) {
            return Err(PlatformError::NotFound("summary channel".to_string()));
        }
        Ok(())
    }

    fn bot_user_id(&self) -> UserId {
        UserId::new(Self::BOT_ID)
    }
}
