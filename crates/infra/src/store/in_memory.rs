use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use ninjabot_core::UserId;

use super::{GameStore, RoundOutcome, RoundStats, StoreResult};

#[derive(Debug, Default)]
struct State {
    scores: HashMap<UserId, i64>,
    config: HashMap<String, String>,
    blocked: HashSet<UserId>,
    stats: RoundStats,
}

/// In-memory store for tests and local development.
///
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    state: RwLock<State>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn increment_score(&self, user: UserId, points: i64) -> StoreResult<i64> {
        let mut state = self.state.write().await;
        let total = state.scores.entry(user).or_insert(0);
        *total += points;
        Ok(*total)
    }

    async fn scores(&self) -> StoreResult<HashMap<UserId, i64>> {
        Ok(self.state.read().await.scores.clone())
    }

    async fn delete_score(&self, user: UserId) -> StoreResult<()> {
        self.state.write().await.scores.remove(&user);
        Ok(())
    }

    async fn clear_scores(&self) -> StoreResult<()> {
        self.state.write().await.scores.clear();
        Ok(())
    }

    async fn config_get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.state.read().await.config.get(key).cloned())
    }

    async fn config_set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.state
            .write()
            .await
            .config
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn block_user(&self, user: UserId) -> StoreResult<()> {
        self.state.write().await.blocked.insert(user);
        Ok(())
    }

    async fn unblock_user(&self, user: UserId) -> StoreResult<()> {
        self.state.write().await.blocked.remove(&user);
        Ok(())
    }

    async fn blocked_users(&self) -> StoreResult<HashSet<UserId>> {
        Ok(self.state.read().await.blocked.clone())
    }

    async fn is_blocked(&self, user: UserId) -> StoreResult<bool> {
        Ok(self.state.read().await.blocked.contains(&user))
    }

    async fn record_round(&self, outcome: RoundOutcome) -> StoreResult<()> {
        self.state.write().await.stats.record(outcome);
        Ok(())
    }

    async fn stats(&self) -> StoreResult<RoundStats> {
        Ok(self.state.read().await.stats)
    }
}
