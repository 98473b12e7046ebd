//! Yes/no prompts answered with a reaction.

use std::time::Duration;

use ninjabot_core::{EmojiId, MessageId, UserId};
use ninjabot_events::{ChatEvent, ReactionEmoji, Subscription};

pub const DECISION_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Denied,
    TimedOut,
}

/// Wait for `author` to react to `message` with `confirm` or `deny`.
///
/// Reactions by anyone else, on other messages, or with other emoji are
/// ignored. A closed bus counts as a timeout.
pub async fn wait_for_decision(
    events: &mut Subscription<ChatEvent>,
    message: MessageId,
    author: UserId,
    confirm: EmojiId,
    deny: EmojiId,
    timeout: Duration,
) -> Decision {
    let wait = async {
        while let Some(event) = events.recv().await {
            let ChatEvent::ReactionAdded(reaction) = event else {
                continue;
            };
            if reaction.message_id != message || reaction.user_id != author {
                continue;
            }
            match reaction.emoji {
                ReactionEmoji::Custom { id } if id == confirm => return Decision::Confirmed,
                ReactionEmoji::Custom { id } if id == deny => return Decision::Denied,
                _ => {}
            }
        }
        Decision::TimedOut
    };
    tokio::time::timeout(timeout, wait)
        .await
        .unwrap_or(Decision::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ninjabot_core::ChannelId;
    use ninjabot_events::{EventBus, InMemoryEventBus, ReactionEvent};

    const CONFIRM: u64 = 11;
    const DENY: u64 = 12;

    fn reaction(message: u64, user: u64, emoji: u64) -> ChatEvent {
        ChatEvent::ReactionAdded(ReactionEvent {
            message_id: MessageId::new(message),
            channel_id: ChannelId::new(1),
            user_id: UserId::new(user),
            emoji: ReactionEmoji::Custom { id: EmojiId::new(emoji) },
        })
    }

    async fn decide(events: &mut Subscription<ChatEvent>) -> Decision {
        wait_for_decision(
            events,
            MessageId::new(5),
            UserId::new(7),
            EmojiId::new(CONFIRM),
            EmojiId::new(DENY),
            DECISION_TIMEOUT,
        )
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_author_can_confirm() {
        let bus = InMemoryEventBus::new();
        let mut events = bus.subscribe();
        bus.publish(reaction(5, 8, CONFIRM)).unwrap();
        bus.publish(reaction(6, 7, CONFIRM)).unwrap();
        bus.publish(reaction(5, 7, 99)).unwrap();
        bus.publish(reaction(5, 7, CONFIRM)).unwrap();

        assert_eq!(decide(&mut events).await, Decision::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn deny_reaction_denies() {
        let bus = InMemoryEventBus::new();
        let mut events = bus.subscribe();
        bus.publish(ChatEvent::ReactionAdded(ReactionEvent {
            message_id: MessageId::new(5),
            channel_id: ChannelId::new(1),
            user_id: UserId::new(7),
            emoji: ReactionEmoji::Unicode("👍".to_string()),
        }))
        .unwrap();
        bus.publish(reaction(5, 7, DENY)).unwrap();

        assert_eq!(decide(&mut events).await, Decision::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn silence_times_out() {
        let bus = InMemoryEventBus::<ChatEvent>::new();
        let mut events = bus.subscribe();

        assert_eq!(decide(&mut events).await, Decision::TimedOut);
    }
}
