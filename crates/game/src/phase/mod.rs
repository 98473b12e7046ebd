//! The three phases of a round.
//!
//! Each phase takes the cancellation token of the game task and returns
//! `GameError::Cancelled` when it fires. Phases that listen for chat events
//! get their own subscription, taken when the phase is entered.

pub mod hunting;
pub mod reaction;
pub mod sleeping;

pub use hunting::HuntingPhase;
pub use reaction::{ReactionPhase, ReactionRound};
pub use sleeping::SleepingPhase;
