//! Event publishing/subscription abstraction (mechanics only).
//!
//! The gateway adapter publishes every relevant chat event to the bus; game
//! phases subscribe while they are active and drop the subscription when they
//! finish. That replaces registering and unregistering listener callbacks.
//!
//! ## Delivery
//!
//! - **Broadcast**: each subscription sees every message published after it was created
//! - **Lossy under pressure**: a subscriber that falls too far behind skips the
//!   oldest messages instead of blocking publishers
//! - **No persistence**: events that nobody is listening for are dropped

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

/// Failure to hand a message to the transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("event transport failed: {0}")]
    Transport(String),
}

/// A subscription to an event stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let mut subscription = bus.subscribe();
///
/// while let Some(event) = subscription.recv().await {
///     process(event);
/// }
/// // bus dropped
/// ```
///
/// Subscriptions are meant for a single consumer task.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: broadcast::Receiver<M>,
}

impl<M: Clone> Subscription<M> {
    pub fn new(receiver: broadcast::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<M> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscription lagged; oldest events were dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// The trait requires `Send + Sync`; the gateway task publishes while game
/// tasks subscribe concurrently.
pub trait EventBus<M>: Send + Sync {
    fn publish(&self, message: M) -> Result<(), BusError>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    fn publish(&self, message: M) -> Result<(), BusError> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
