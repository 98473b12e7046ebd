//! Prefix commands.

pub mod admin;
pub mod confirm;
pub mod game;
pub mod ninja;
pub mod permissions;

use crate::context::Data;
use crate::errors::BotError;

/// Every top-level command the framework registers.
pub fn all() -> Vec<poise::Command<Data, BotError>> {
    vec![ninja::help(), ninja::ninja(), admin::admin()]
}
