use thiserror::Error;

use ninjabot_infra::StoreError;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("the game is already running")]
    AlreadyRunning,

    #[error("the game is not running")]
    NotRunning,

    /// The current phase was stopped before it completed.
    #[error("phase cancelled")]
    Cancelled,

    /// The event bus went away while a phase was listening.
    #[error("event bus closed")]
    BusClosed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

pub type GameResult<T> = Result<T, GameError>;
