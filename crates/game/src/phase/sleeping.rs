use std::time::Duration;

use chrono::{TimeDelta, Utc};
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{GameError, GameResult};

/// The quiet stretch between two appearances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepingPhase {
    duration: Duration,
}

impl SleepingPhase {
    /// `cooldown` plus a uniform `1..=max_jitter_secs` seconds; no jitter when the bound is 0.
    pub fn new<R: Rng + ?Sized>(cooldown: Duration, max_jitter_secs: u64, rng: &mut R) -> Self {
        let jitter = if max_jitter_secs == 0 {
            0
        } else {
            rng.gen_range(1..=max_jitter_secs)
        };
        Self {
            duration: cooldown.saturating_add(Duration::from_secs(jitter)),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub async fn run(self, cancel: &CancellationToken) -> GameResult<()> {
        let wake_at = TimeDelta::from_std(self.duration)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta));
        info!(
            sleep_secs = self.duration.as_secs(),
            wake_at = %wake_at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_default(),
            "ninja is sleeping"
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("sleeping phase cancelled");
                Err(GameError::Cancelled)
            }
            _ = tokio::time::sleep(self.duration) => Ok(()),
        }
    }
}
