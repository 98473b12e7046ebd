//! Chat events and the bus that fans them out to game phases.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{BusError, EventBus, Subscription};
pub use event::{ChatEvent, MessageEvent, ReactionEmoji, ReactionEvent};
pub use in_memory_bus::InMemoryEventBus;
