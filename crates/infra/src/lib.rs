//! Infrastructure layer: configuration, persistence, Redis.

pub mod config;
pub mod permissions;
pub mod store;

pub use config::{ConfigError, Resources, Settings};
pub use permissions::{ListEditError, add_to_list, remove_from_list, sync_permissions};
pub use store::{GameStore, InMemoryGameStore, RoundOutcome, RoundStats, StoreError, StoreResult};
#[cfg(feature = "redis")]
pub use store::{RedisGameStore, connect_with_retry};
