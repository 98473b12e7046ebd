//! Persistent game state boundary.
//!
//! Everything the bot persists lives in four hashes under a namespace:
//! the scoreboard, runtime config (allow/deny lists, `running`), blocked
//! users, and round statistics.

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis_store;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use ninjabot_core::UserId;

pub use in_memory::InMemoryGameStore;
#[cfg(feature = "redis")]
pub use redis_store::{RedisGameStore, connect_with_retry};

/// Config key holding `"true"` / `"false"`.
pub const RUNNING_KEY: &str = "running";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store command failed: {0}")]
    Command(String),

    #[error("corrupt stored value for {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// What happened in one finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub detected: bool,
    pub points_awarded: u64,
}

/// Running totals over all recorded rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub rounds: u64,
    pub detected: u64,
    pub undetected: u64,
    pub points_awarded: u64,
}

impl RoundStats {
    pub const ROUNDS: &'static str = "rounds";
    pub const DETECTED: &'static str = "detected";
    pub const UNDETECTED: &'static str = "undetected";
    pub const POINTS_AWARDED: &'static str = "points_awarded";

    /// Apply one outcome.
    pub fn record(&mut self, outcome: RoundOutcome) {
        self.rounds += 1;
        if outcome.detected {
            self.detected += 1;
        } else {
            self.undetected += 1;
        }
        self.points_awarded += outcome.points_awarded;
    }
}

/// Storage for scores, runtime config, blocked users and round statistics.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Add `points` to a user's score and return the new total.
    async fn increment_score(&self, user: UserId, points: i64) -> StoreResult<i64>;
    async fn scores(&self) -> StoreResult<HashMap<UserId, i64>>;
    async fn delete_score(&self, user: UserId) -> StoreResult<()>;
    async fn clear_scores(&self) -> StoreResult<()>;

    async fn config_get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn config_set(&self, key: &str, value: &str) -> StoreResult<()>;

    async fn block_user(&self, user: UserId) -> StoreResult<()>;
    async fn unblock_user(&self, user: UserId) -> StoreResult<()>;
    async fn blocked_users(&self) -> StoreResult<HashSet<UserId>>;
    async fn is_blocked(&self, user: UserId) -> StoreResult<bool>;

    async fn record_round(&self, outcome: RoundOutcome) -> StoreResult<()>;
    async fn stats(&self) -> StoreResult<RoundStats>;
}

#[async_trait]
impl<S> GameStore for Arc<S>
where
    S: GameStore + ?Sized,
{
    async fn increment_score(&self, user: UserId, points: i64) -> StoreResult<i64> {
        (**self).increment_score(user, points).await
    }

    async fn scores(&self) -> StoreResult<HashMap<UserId, i64>> {
        (**self).scores().await
    }

    async fn delete_score(&self, user: UserId) -> StoreResult<()> {
        (**self).delete_score(user).await
    }

    async fn clear_scores(&self) -> StoreResult<()> {
        (**self).clear_scores().await
    }

    async fn config_get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).config_get(key).await
    }

    async fn config_set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).config_set(key, value).await
    }

    async fn block_user(&self, user: UserId) -> StoreResult<()> {
        (**self).block_user(user).await
    }

    async fn unblock_user(&self, user: UserId) -> StoreResult<()> {
        (**self).unblock_user(user).await
    }

    async fn blocked_users(&self) -> StoreResult<HashSet<UserId>> {
        (**self).blocked_users().await
    }

    async fn is_blocked(&self, user: UserId) -> StoreResult<bool> {
        (**self).is_blocked(user).await
    }

    async fn record_round(&self, outcome: RoundOutcome) -> StoreResult<()> {
        (**self).record_round(outcome).await
    }

    async fn stats(&self) -> StoreResult<RoundStats> {
        (**self).stats().await
    }
}

/// Read the persisted `running` flag, if any.
pub async fn load_running<S: GameStore + ?Sized>(store: &S) -> StoreResult<Option<bool>> {
    match store.config_get(RUNNING_KEY).await? {
        None => Ok(None),
        Some(raw) => match raw.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(StoreError::corrupt(RUNNING_KEY, format!("expected true/false, got {other:?}"))),
        },
    }
}

pub async fn save_running<S: GameStore + ?Sized>(store: &S, running: bool) -> StoreResult<()> {
    store
        .config_set(RUNNING_KEY, if running { "true" } else { "false" })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_each_outcome() {
        let mut stats = RoundStats::default();
        stats.record(RoundOutcome { detected: true, points_awarded: 17 });
        stats.record(RoundOutcome { detected: false, points_awarded: 0 });
        stats.record(RoundOutcome { detected: true, points_awarded: 3 });

        assert_eq!(
            stats,
            RoundStats { rounds: 3, detected: 2, undetected: 1, points_awarded: 20 }
        );
    }

    #[tokio::test]
    async fn running_flag_round_trips_and_rejects_garbage() {
        let store = InMemoryGameStore::new();
        assert_eq!(load_running(&store).await.unwrap(), None);

        save_running(&store, true).await.unwrap();
        assert_eq!(load_running(&store).await.unwrap(), Some(true));

        store.config_set(RUNNING_KEY, "maybe").await.unwrap();
        assert!(matches!(load_running(&store).await, Err(StoreError::Corrupt { .. })));
    }
}
