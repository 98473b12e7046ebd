use rand::Rng;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use ninjabot_core::Permissions;
use ninjabot_events::{ChatEvent, MessageEvent, Subscription};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};

/// Waits for the message the ninja will ambush.
///
/// Every eligible message raises the odds by one percentage point, so a busy
/// server is hit sooner than a quiet one but never by a single burst.
pub struct HuntingPhase<'a> {
    config: &'a GameConfig,
    permissions: &'a Mutex<Permissions>,
    eligible_seen: u32,
}

impl<'a> HuntingPhase<'a> {
    pub fn new(config: &'a GameConfig, permissions: &'a Mutex<Permissions>) -> Self {
        Self {
            config,
            permissions,
            eligible_seen: 0,
        }
    }

    pub async fn run<R: Rng + ?Sized>(
        mut self,
        events: &mut Subscription<ChatEvent>,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> GameResult<MessageEvent> {
        info!("ninja is hunting for a message");
        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("hunting phase cancelled");
                    return Err(GameError::Cancelled);
                }
                event = events.recv() => event.ok_or(GameError::BusClosed)?,
            };

            let ChatEvent::MessageCreated(message) = event else {
                continue;
            };

            if self.is_ignored(&message).await {
                continue;
            }

            let p = self.next_probability(&message);
            if rng.gen_range(0.0..1.0) <= p {
                debug!(
                    channel_id = %message.channel_id,
                    message_id = %message.message_id,
                    p,
                    "message chosen"
                );
                return Ok(message);
            }
        }
    }

    async fn is_ignored(&self, message: &MessageEvent) -> bool {
        if message.guild_id != Some(self.config.guild_id) {
            return true;
        }
        if message.author_is_bot {
            return true;
        }
        if self.config.public_only && !message.publicly_visible {
            return true;
        }
        !self
            .permissions
            .lock()
            .await
            .admits(message.channel_id, message.category_id)
    }

    /// Advance the counter and return the scaled hit probability.
    fn next_probability(&mut self, message: &MessageEvent) -> f64 {
        self.eligible_seen = self.eligible_seen.saturating_add(1);
        let base = (f64::from(self.eligible_seen) / 100.0).min(1.0);
        base * self.config.probability_multiplier * self.config.channel_scalar(message.channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use ninjabot_core::{AllowDenySet, CategoryId, ChannelId, GuildId, MessageId, UserId};
    use ninjabot_events::{EventBus, InMemoryEventBus};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn message(id: u64, channel: u64) -> MessageEvent {
        MessageEvent {
            message_id: MessageId::new(id),
            channel_id: ChannelId::new(channel),
            category_id: Some(CategoryId::new(50)),
            guild_id: Some(GuildId::new(1000)),
            author_id: UserId::new(7),
            author_is_bot: false,
            publicly_visible: true,
        }
    }

    #[tokio::test]
    async fn certain_hit_takes_the_first_eligible_message() {
        let mut config = test_config();
        config.probability_multiplier = 100.0;
        let permissions = Mutex::new(Permissions::default());
        let bus = InMemoryEventBus::new();
        let mut events = bus.subscribe();

        let mut bot_message = message(1, 10);
        bot_message.author_is_bot = true;
        let mut foreign = message(2, 10);
        foreign.guild_id = Some(GuildId::new(1));
        bus.publish(ChatEvent::MessageCreated(bot_message)).unwrap();
        bus.publish(ChatEvent::MessageCreated(foreign)).unwrap();
        bus.publish(ChatEvent::MessageCreated(message(3, 10))).unwrap();

        let chosen = HuntingPhase::new(&config, &permissions)
            .run(&mut events, &mut StdRng::seed_from_u64(3), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(chosen.message_id, MessageId::new(3));
    }

    #[tokio::test]
    async fn denied_and_private_channels_are_skipped() {
        let mut config = test_config();
        config.probability_multiplier = 100.0;
        config.public_only = true;
        let mut perms = Permissions::default();
        perms.channels.deny = AllowDenySet::from_ids([10]);
        let permissions = Mutex::new(perms);
        let bus = InMemoryEventBus::new();
        let mut events = bus.subscribe();

        let mut private = message(2, 11);
        private.publicly_visible = false;
        bus.publish(ChatEvent::MessageCreated(message(1, 10))).unwrap();
        bus.publish(ChatEvent::MessageCreated(private)).unwrap();
        bus.publish(ChatEvent::MessageCreated(message(3, 12))).unwrap();

        let chosen = HuntingPhase::new(&config, &permissions)
            .run(&mut events, &mut StdRng::seed_from_u64(3), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(chosen.message_id, MessageId::new(3));
    }

    #[test]
    fn probability_grows_by_one_percent_and_caps() {
        let config = test_config();
        let permissions = Mutex::new(Permissions::default());
        let mut phase = HuntingPhase::new(&config, &permissions);
        let msg = message(1, 10);

        assert!((phase.next_probability(&msg) - 0.01).abs() < 1e-12);
        assert!((phase.next_probability(&msg) - 0.02).abs() < 1e-12);
        for _ in 0..200 {
            phase.next_probability(&msg);
        }
        assert!((phase.next_probability(&msg) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn channel_scalar_scales_the_probability() {
        let mut config = test_config();
        config.probability_multiplier = 2.0;
        config.channel_scalars.insert(ChannelId::new(10), 0.25);
        let permissions = Mutex::new(Permissions::default());
        let mut phase = HuntingPhase::new(&config, &permissions);

        assert!((phase.next_probability(&message(1, 10)) - 0.005).abs() < 1e-12);
        assert!((phase.next_probability(&message(2, 11)) - 0.04).abs() < 1e-12);
    }

    #[tokio::test]
    async fn zero_multiplier_never_hits_and_cancels_cleanly() {
        let mut config = test_config();
        config.probability_multiplier = 0.0;
        let permissions = Mutex::new(Permissions::default());
        let bus = InMemoryEventBus::new();
        let mut events = bus.subscribe();
        for i in 0..50 {
            bus.publish(ChatEvent::MessageCreated(message(i, 10))).unwrap();
        }

        let cancel = CancellationToken::new();
        let mut rng = StdRng::seed_from_u64(3);
        let hunt = HuntingPhase::new(&config, &permissions);
        let run = hunt.run(&mut events, &mut rng, &cancel);
        tokio::pin!(run);

        // All queued messages are consumed without a hit, then cancellation ends the hunt.
        assert!(tokio::time::timeout(std::time::Duration::from_millis(50), &mut run).await.is_err());
        cancel.cancel();
        assert!(matches!(run.await, Err(GameError::Cancelled)));
    }

    #[tokio::test]
    async fn closed_bus_ends_the_hunt() {
        let config = test_config();
        let permissions = Mutex::new(Permissions::default());
        let bus = InMemoryEventBus::<ChatEvent>::new();
        let mut events = bus.subscribe();
        drop(bus);

        let result = HuntingPhase::new(&config, &permissions)
            .run(&mut events, &mut StdRng::seed_from_u64(3), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(GameError::BusClosed)));
    }
}
