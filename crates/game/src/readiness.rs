use tokio::sync::watch;
use tracing::{info, warn};

use ninjabot_core::GuildId;
use ninjabot_events::{ChatEvent, Subscription};

/// Whether the configured guild's cache is usable.
///
/// Set when the guild becomes available, cleared when it goes away. The game
/// waits on it before its first round.
#[derive(Debug, Clone)]
pub struct GuildReadiness {
    sender: watch::Sender<bool>,
}

impl Default for GuildReadiness {
    fn default() -> Self {
        Self::new()
    }
}

impl GuildReadiness {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn set_ready(&self) {
        self.sender.send_replace(true);
    }

    pub fn clear(&self) {
        self.sender.send_replace(false);
    }

    pub fn is_ready(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the guild is ready (immediately if it already is).
    pub async fn wait_ready(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|ready| *ready).await;
    }

    /// Track `GuildReady` and `GuildUnavailable` for `guild` until the bus closes.
    pub async fn follow(&self, mut events: Subscription<ChatEvent>, guild: GuildId) {
        while let Some(event) = events.recv().await {
            match event {
                ChatEvent::GuildReady(id) if id == guild => {
                    info!(guild_id = %id, "guild ready");
                    self.set_ready();
                }
                ChatEvent::GuildUnavailable(id) if id == guild => {
                    warn!(guild_id = %id, "guild unavailable, pausing until it returns");
                    self.clear();
                }
                _ => {}
            }
        }
    }
}
