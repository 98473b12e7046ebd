//! Scoring a finished round and announcing it.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use ninjabot_core::{ChannelId, ReactionPoints};
use ninjabot_infra::{GameStore, RoundOutcome};

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::phase::ReactionRound;
use crate::platform::ChatPlatform;

pub const NINJA_THUMBNAIL_URL: &str = "https://cdn.discordapp.com/emojis/637923502535606293.png";

const REWARDED_LIST_LIMIT: usize = 1800;
const UNDETECTED_COLOUR: (u8, u8, u8) = (45, 45, 45);
const DETECTED_COLOUR: (u8, u8, u8) = (214, 40, 24);

/// Announcement posted to the summary channel after each round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Where the announcement goes.
    pub channel: ChannelId,
    pub title: String,
    pub description: String,
    pub colour: (u8, u8, u8),
    pub thumbnail_url: String,
    pub timestamp: DateTime<Utc>,
}

impl RoundSummary {
    pub fn undetected(summary_channel: ChannelId, ninja_mention: &str, appeared_in: ChannelId) -> Self {
        Self {
            channel: summary_channel,
            title: "Ninja Duck sneaked by undetected!".to_string(),
            description: format!(
                "No one noticed {ninja_mention} when it appeared in {}.",
                appeared_in.mention()
            ),
            colour: UNDETECTED_COLOUR,
            thumbnail_url: NINJA_THUMBNAIL_URL.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// `awards` must not be empty.
    pub fn detected(summary_channel: ChannelId, appeared_in: ChannelId, awards: &[ReactionPoints]) -> Self {
        let (pronoun, noun) = if awards.len() == 1 {
            ("This", "member")
        } else {
            ("These", "members")
        };

        let mut rewarded = awards
            .iter()
            .map(|award| format!("{} (+{})", award.user_id.mention(), award.points))
            .collect::<Vec<_>>()
            .join(", ");
        if rewarded.chars().count() >= REWARDED_LIST_LIMIT {
            rewarded = rewarded.chars().take(REWARDED_LIST_LIMIT).collect::<String>() + "...";
        }

        Self {
            channel: summary_channel,
            title: format!("Ninja Duck was detected by {} {noun}!", awards.len()),
            description: format!(
                "Ninja Duck appeared in {}.\n\n{pronoun} {noun} earned points: {rewarded}",
                appeared_in.mention()
            ),
            colour: DETECTED_COLOUR,
            thumbnail_url: NINJA_THUMBNAIL_URL.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Book the round's points and post the summary.
///
/// Blocked members keep their reaction but earn nothing. A summary that
/// cannot be delivered is logged and skipped.
pub async fn process_results(
    store: &dyn GameStore,
    platform: &dyn ChatPlatform,
    config: &GameConfig,
    round: &ReactionRound,
) -> GameResult<RoundOutcome> {
    let blocked = store.blocked_users().await?;
    let awards: Vec<ReactionPoints> = round
        .awards
        .iter()
        .filter(|award| !blocked.contains(&award.user_id))
        .cloned()
        .collect();

    for award in &awards {
        store
            .increment_score(award.user_id, i64::from(award.points))
            .await?;
    }
    info!(members = awards.len(), "updated scores");

    let outcome = RoundOutcome {
        detected: !awards.is_empty(),
        points_awarded: awards.iter().map(|a| u64::from(a.points)).sum(),
    };
    store.record_round(outcome).await?;

    let appeared_in = round.target.channel_id;
    let summary = if awards.is_empty() {
        RoundSummary::undetected(config.summary_channel, &config.fallback_emoji.mention(), appeared_in)
    } else {
        RoundSummary::detected(config.summary_channel, appeared_in, &awards)
    };
    if let Err(err) = platform.send_summary(&summary).await {
        warn!(error = %err, channel_id = %config.summary_channel, "could not post round summary");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::testing::FakePlatform;
    use ninjabot_core::{CategoryId, EmojiId, GuildId, MessageId, NinjaEmoji, UserId};
    use ninjabot_events::MessageEvent;
    use ninjabot_infra::InMemoryGameStore;

    fn round(awards: Vec<ReactionPoints>) -> ReactionRound {
        ReactionRound {
            target: MessageEvent {
                message_id: MessageId::new(55),
                channel_id: ChannelId::new(10),
                category_id: Some(CategoryId::new(50)),
                guild_id: Some(GuildId::new(1000)),
                author_id: UserId::new(7),
                author_is_bot: false,
                publicly_visible: true,
            },
            emoji: NinjaEmoji::new(EmojiId::new(4242), "ShadowDuck"),
            awards,
        }
    }

    fn award(user: u64, points: u32) -> ReactionPoints {
        ReactionPoints {
            user_id: UserId::new(user),
            points,
        }
    }

    #[test]
    fn single_winner_uses_singular_wording() {
        let summary = RoundSummary::detected(ChannelId::new(9), ChannelId::new(10), &[award(5, 8)]);
        assert_eq!(summary.title, "Ninja Duck was detected by 1 member!");
        assert_eq!(
            summary.description,
            "Ninja Duck appeared in <#10>.\n\nThis member earned points: <@5> (+8)"
        );
        assert_eq!(summary.colour, (214, 40, 24));
    }

    #[test]
    fn long_rewarded_list_is_cut() {
        let awards: Vec<_> = (0..200).map(|i| award(100_000_000_000_000_000 + i, 1)).collect();
        let summary = RoundSummary::detected(ChannelId::new(9), ChannelId::new(10), &awards);

        assert_eq!(summary.title, "Ninja Duck was detected by 200 members!");
        let list = summary
            .description
            .split_once("These members earned points: ")
            .unwrap()
            .1;
        assert_eq!(list.chars().count(), 1803);
        assert!(list.ends_with("..."));
    }

    #[test]
    fn undetected_mentions_the_ninja() {
        let summary = RoundSummary::undetected(ChannelId::new(9), "<:ninjaduck:1>", ChannelId::new(10));
        assert_eq!(summary.description, "No one noticed <:ninjaduck:1> when it appeared in <#10>.");
        assert_eq!(summary.colour, (45, 45, 45));
        assert_eq!(summary.thumbnail_url, NINJA_THUMBNAIL_URL);
    }

    #[tokio::test]
    async fn blocked_members_earn_nothing() {
        let store = InMemoryGameStore::new();
        let platform = FakePlatform::new();
        let config = test_config();
        store.block_user(UserId::new(2)).await.unwrap();

        let outcome = process_results(&store, &platform, &config, &round(vec![award(1, 9), award(2, 7)]))
            .await
            .unwrap();

        assert_eq!(outcome, RoundOutcome { detected: true, points_awarded: 9 });
        let scores = store.scores().await.unwrap();
        assert_eq!(scores.get(&UserId::new(1)), Some(&9));
        assert!(!scores.contains_key(&UserId::new(2)));

        let summaries = platform.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].channel, config.summary_channel);
        assert!(summaries[0].description.ends_with("This member earned points: <@1> (+9)"));
    }

    #[tokio::test]
    async fn round_with_only_blocked_members_is_undetected() {
        let store = InMemoryGameStore::new();
        let platform = FakePlatform::new();
        store.block_user(UserId::new(2)).await.unwrap();

        let outcome = process_results(&store, &platform, &test_config(), &round(vec![award(2, 7)]))
            .await
            .unwrap();

        assert!(!outcome.detected);
        assert_eq!(store.stats().await.unwrap().undetected, 1);
        assert_eq!(platform.summaries()[0].title, "Ninja Duck sneaked by undetected!");
    }

    #[tokio::test]
    async fn undeliverable_summary_is_not_an_error() {
        let store = InMemoryGameStore::new();
        let platform = FakePlatform::new();
        platform.fail_send_summary();

        let outcome = process_results(&store, &platform, &test_config(), &round(vec![award(3, 4)])).await;
        assert!(outcome.is_ok());
        assert_eq!(store.scores().await.unwrap().get(&UserId::new(3)), Some(&4));
    }
}
