use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ninjabot_core::{NinjaEmoji, ReactionPoints, UserId, win_points};
use ninjabot_events::{ChatEvent, MessageEvent, ReactionEvent, Subscription};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::platform::ChatPlatform;

/// What a finished reaction window produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionRound {
    pub target: MessageEvent,
    pub emoji: NinjaEmoji,
    /// In the order the reactions arrived.
    pub awards: Vec<ReactionPoints>,
}

/// The ninja reacts to the chosen message and members race to click it.
pub struct ReactionPhase<'a> {
    config: &'a GameConfig,
    platform: &'a dyn ChatPlatform,
    target: MessageEvent,
}

impl<'a> ReactionPhase<'a> {
    pub fn new(config: &'a GameConfig, platform: &'a dyn ChatPlatform, target: MessageEvent) -> Self {
        Self {
            config,
            platform,
            target,
        }
    }

    /// Run the reaction window.
    ///
    /// The reaction is cleared and a freshly created emoji deleted on every
    /// exit path, including cancellation and errors.
    pub async fn run<R: Rng + ?Sized>(
        self,
        events: &mut Subscription<ChatEvent>,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> GameResult<ReactionRound> {
        let (emoji, created) = self.prepare_emoji(rng).await;

        let outcome = match self
            .platform
            .add_reaction(self.target.channel_id, self.target.message_id, &emoji)
            .await
        {
            Ok(()) => {
                info!(
                    channel_id = %self.target.channel_id,
                    message_id = %self.target.message_id,
                    emoji = %emoji.name,
                    "ninja appeared"
                );
                self.collect(&emoji, events, cancel).await
            }
            Err(err) => Err(err.into()),
        };

        self.clean_up(&emoji, created).await;

        outcome.map(|awards| ReactionRound {
            target: self.target,
            emoji,
            awards,
        })
    }

    /// Create a fresh emoji, or fall back to the configured one.
    async fn prepare_emoji<R: Rng + ?Sized>(&self, rng: &mut R) -> (NinjaEmoji, bool) {
        let name = self.config.ninja_names.choose(rng);
        if let (Some(name), Some(image)) = (name, self.config.ninja_image.as_deref()) {
            match self.platform.create_emoji(name, image).await {
                Ok(emoji) => return (emoji, true),
                Err(err) => warn!(error = %err, name = %name, "failed to create ninja emoji, using fallback"),
            }
        }
        (self.config.fallback_emoji.clone(), false)
    }

    async fn collect(
        &self,
        emoji: &NinjaEmoji,
        events: &mut Subscription<ChatEvent>,
        cancel: &CancellationToken,
    ) -> GameResult<Vec<ReactionPoints>> {
        let started = Instant::now();
        let deadline = started + self.config.reaction_timeout;
        let bot = self.platform.bot_user_id();

        let mut awards = Vec::new();
        let mut rewarded: HashSet<UserId> = HashSet::new();

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("reaction phase cancelled");
                    return Err(GameError::Cancelled);
                }
                _ = tokio::time::sleep_until(deadline) => break,
                event = events.recv() => match event {
                    Some(event) => event,
                    None => {
                        warn!("event bus closed during reaction phase");
                        break;
                    }
                },
            };

            let ChatEvent::ReactionAdded(reaction) = event else {
                continue;
            };
            if !self.is_relevant(&reaction, emoji, bot, &rewarded) {
                continue;
            }

            let elapsed = started.elapsed();
            let points = win_points(self.config.max_points, self.config.reaction_timeout, elapsed);
            debug!(user_id = %reaction.user_id, points, elapsed_ms = elapsed.as_millis() as u64, "ninja spotted");
            rewarded.insert(reaction.user_id);
            awards.push(ReactionPoints {
                user_id: reaction.user_id,
                points,
            });
        }

        Ok(awards)
    }

    fn is_relevant(
        &self,
        reaction: &ReactionEvent,
        emoji: &NinjaEmoji,
        bot: UserId,
        rewarded: &HashSet<UserId>,
    ) -> bool {
        reaction.user_id != bot
            && reaction.message_id == self.target.message_id
            && reaction.emoji.custom_id() == Some(emoji.id)
            && !rewarded.contains(&reaction.user_id)
    }

    async fn clean_up(&self, emoji: &NinjaEmoji, created: bool) {
        if let Err(err) = self
            .platform
            .clear_reaction(self.target.channel_id, self.target.message_id, emoji)
            .await
        {
            warn!(error = %err, "failed to clear ninja reaction");
        }
        if created {
            if let Err(err) = self.platform.delete_emoji(emoji).await {
                warn!(error = %err, emoji = %emoji.name, "failed to delete ninja emoji");
            }
        }
    }
}
