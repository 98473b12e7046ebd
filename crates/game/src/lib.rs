//! `ninjabot-game`
//!
//! **Responsibility:** the ninja game itself.
//!
//! - Runs rounds of sleeping, hunting and reacting on a background task
//! - Talks to the chat service only through [`ChatPlatform`]
//! - Listens to chat activity only through the event bus

pub mod config;
pub mod controller;
pub mod error;
pub mod phase;
pub mod platform;
pub mod readiness;
pub mod results;

#[cfg(test)]
mod testing;

pub use config::GameConfig;
pub use controller::GameController;
pub use error::{GameError, GameResult};
pub use platform::{ChatPlatform, PlatformError};
pub use readiness::GuildReadiness;
pub use results::{NINJA_THUMBNAIL_URL, RoundSummary};
