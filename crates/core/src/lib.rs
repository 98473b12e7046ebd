//! `ninjabot-core` - game domain primitives.
//!
//! This crate contains **pure domain** code (no IO, no async, no Discord types).

pub mod allow_deny;
pub mod emoji;
pub mod error;
pub mod id;
pub mod leaderboard;
pub mod names;
pub mod scoring;
pub mod state;

pub use allow_deny::{AllowDenyGroup, AllowDenySet, ListType, Permissions};
pub use emoji::NinjaEmoji;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ChannelId, EmojiId, GuildId, MessageId, RoleId, UserId};
pub use leaderboard::{Leaderboard, LeaderboardEntry, ordinal};
pub use scoring::{ReactionPoints, win_points};
pub use state::GameState;
