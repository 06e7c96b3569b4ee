//! # tana-realtime
//!
//! Receives domain events published by other services on a pub/sub channel
//! and fans them out to in-process subscribers (server-sent event streams).
//!
//! - [`EventHub`] is the single in-process broadcast point.
//! - [`EventBridge`] is the long-lived subscriber feeding the hub.

pub mod bridge;
pub mod hub;

pub use bridge::{EventBridge, EventSource};
pub use hub::EventHub;
