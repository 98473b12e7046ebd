//! Redis-backed store.
//!
//! Keys: `{namespace}:scoreboard`, `{namespace}:config`,
//! `{namespace}:blocked_users`, `{namespace}:stats`; all four are hashes.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use ninjabot_core::UserId;

use super::{GameStore, RoundOutcome, RoundStats, StoreError, StoreResult};

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// Open a managed connection and PING it, retrying with linear backoff.
///
/// Attempt `n` waits `n * backoff` before the next try. Gives up after
/// `attempts` tries with the last error.
pub async fn connect_with_retry(
    url: &str,
    attempts: u32,
    backoff: Duration,
) -> StoreResult<ConnectionManager> {
    let client = redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
    let attempts = attempts.max(1);

    let mut attempt = 1;
    loop {
        match try_connect(&client).await {
            Ok(conn) => {
                tracing::info!(attempt, "connected to redis");
                return Ok(conn);
            }
            Err(err) if attempt < attempts => {
                let wait = backoff * attempt;
                tracing::warn!(attempt, attempts, error = %err, wait_ms = wait.as_millis() as u64, "redis not reachable, retrying");
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(attempts, error = %err, "giving up connecting to redis");
                return Err(err);
            }
        }
    }
}

async fn try_connect(client: &redis::Client) -> StoreResult<ConnectionManager> {
    let mut conn = client.get_connection_manager().await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(conn)
}

/// Store over a shared redis connection manager.
#[derive(Clone)]
pub struct RedisGameStore {
    conn: ConnectionManager,
    scoreboard_key: String,
    config_key: String,
    blocked_key: String,
    stats_key: String,
}

impl core::fmt::Debug for RedisGameStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedisGameStore")
            .field("scoreboard_key", &self.scoreboard_key)
            .finish_non_exhaustive()
    }
}

impl RedisGameStore {
    pub fn new(conn: ConnectionManager, namespace: &str) -> Self {
        Self {
            conn,
            scoreboard_key: format!("{namespace}:scoreboard"),
            config_key: format!("{namespace}:config"),
            blocked_key: format!("{namespace}:blocked_users"),
            stats_key: format!("{namespace}:stats"),
        }
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

fn parse_user(key: &str, raw: &str) -> StoreResult<UserId> {
    raw.parse::<UserId>()
        .map_err(|e| StoreError::corrupt(key, e.to_string()))
}

#[async_trait]
impl GameStore for RedisGameStore {
    async fn increment_score(&self, user: UserId, points: i64) -> StoreResult<i64> {
        let total: i64 = self
            .conn()
            .hincr(&self.scoreboard_key, user.get(), points)
            .await?;
        Ok(total)
    }

    async fn scores(&self) -> StoreResult<HashMap<UserId, i64>> {
        let raw: HashMap<String, String> = self.conn().hgetall(&self.scoreboard_key).await?;
        raw.into_iter()
            .map(|(user, score)| {
                let user = parse_user(&self.scoreboard_key, &user)?;
                let score = score.parse::<i64>().map_err(|e| {
                    StoreError::corrupt(&self.scoreboard_key, format!("score {score:?}: {e}"))
                })?;
                Ok((user, score))
            })
            .collect()
    }

    async fn delete_score(&self, user: UserId) -> StoreResult<()> {
        let _: i64 = self.conn().hdel(&self.scoreboard_key, user.get()).await?;
        Ok(())
    }

    async fn clear_scores(&self) -> StoreResult<()> {
        let _: i64 = self.conn().del(&self.scoreboard_key).await?;
        Ok(())
    }

    async fn config_get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.conn().hget(&self.config_key, key).await?)
    }

    async fn config_set(&self, key: &str, value: &str) -> StoreResult<()> {
        let _: i64 = self.conn().hset(&self.config_key, key, value).await?;
        Ok(())
    }

    async fn block_user(&self, user: UserId) -> StoreResult<()> {
        let _: i64 = self.conn().hset(&self.blocked_key, user.get(), 1).await?;
        Ok(())
    }

    async fn unblock_user(&self, user: UserId) -> StoreResult<()> {
        let _: i64 = self.conn().hdel(&self.blocked_key, user.get()).await?;
        Ok(())
    }

    async fn blocked_users(&self) -> StoreResult<HashSet<UserId>> {
        let raw: Vec<String> = self.conn().hkeys(&self.blocked_key).await?;
        raw.iter().map(|u| parse_user(&self.blocked_key, u)).collect()
    }

    async fn is_blocked(&self, user: UserId) -> StoreResult<bool> {
        Ok(self.conn().hexists(&self.blocked_key, user.get()).await?)
    }

    async fn record_round(&self, outcome: RoundOutcome) -> StoreResult<()> {
        let result_field = if outcome.detected {
            RoundStats::DETECTED
        } else {
            RoundStats::UNDETECTED
        };

        redis::pipe()
            .atomic()
            .hincr(&self.stats_key, RoundStats::ROUNDS, 1)
            .ignore()
            .hincr(&self.stats_key, result_field, 1)
            .ignore()
            .hincr(&self.stats_key, RoundStats::POINTS_AWARDED, outcome.points_awarded)
            .ignore()
            .query_async::<_, ()>(&mut self.conn())
            .await?;
        Ok(())
    }

    async fn stats(&self) -> StoreResult<RoundStats> {
        let raw: HashMap<String, u64> = self.conn().hgetall(&self.stats_key).await?;
        let field = |name: &str| raw.get(name).copied().unwrap_or(0);
        Ok(RoundStats {
            rounds: field(RoundStats::ROUNDS),
            detected: field(RoundStats::DETECTED),
            undetected: field(RoundStats::UNDETECTED),
            points_awarded: field(RoundStats::POINTS_AWARDED),
        })
    }
}
