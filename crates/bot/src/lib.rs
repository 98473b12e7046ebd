//! NinjaBot: the Discord side of the Ninja Duck game.

pub mod app;
pub mod authz;
pub mod commands;
pub mod context;
pub mod discord;
pub mod errors;
