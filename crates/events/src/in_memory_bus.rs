//! In-process event bus.

use tokio::sync::broadcast;

use crate::bus::{BusError, EventBus, Subscription};

const DEFAULT_CAPACITY: usize = 256;

/// In-memory pub/sub bus over a tokio broadcast channel.
///
/// - No IO
/// - Best-effort fan-out
/// - Publishing with no subscribers is not an error
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    sender: broadcast::Sender<M>,
}

impl<M: Clone> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is how many messages a slow subscriber may fall behind.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }
}

impl<M: Clone> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    fn publish(&self, message: M) -> Result<(), BusError> {
        // Err only means nobody is subscribed right now.
        let _ = self.sender.send(message);
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        Subscription::new(self.sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_every_message() {
        let bus = InMemoryEventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(1u32).unwrap();
        bus.publish(2u32).unwrap();

        assert_eq!(a.recv().await, Some(1));
        assert_eq!(a.recv().await, Some(2));
        assert_eq!(b.recv().await, Some(1));
        assert_eq!(b.recv().await, Some(2));
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_messages() {
        let bus = InMemoryEventBus::new();
        bus.publish("early").unwrap();

        let mut sub = bus.subscribe();
        bus.publish("late").unwrap();
        assert_eq!(sub.recv().await, Some("late"));
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let bus: InMemoryEventBus<u8> = InMemoryEventBus::new();
        assert!(bus.publish(7).is_ok());
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_to_retained_messages() {
        let bus = InMemoryEventBus::with_capacity(2);
        let mut sub = bus.subscribe();

        for n in 0..5u32 {
            bus.publish(n).unwrap();
        }

        assert_eq!(sub.recv().await, Some(3));
        assert_eq!(sub.recv().await, Some(4));
    }

    #[tokio::test]
    async fn recv_ends_when_bus_is_dropped() {
        let bus: InMemoryEventBus<u8> = InMemoryEventBus::new();
        let mut sub = bus.subscribe();
        drop(bus);
        assert_eq!(sub.recv().await, None);
    }
}
