//! Bridge from the external pub/sub channel into the [`EventHub`](crate::EventHub).

pub mod event_bridge;
pub mod source;

pub use event_bridge::EventBridge;
#[cfg(feature = "redis-pubsub")]
pub use source::RedisEventSource;
pub use source::EventSource;
