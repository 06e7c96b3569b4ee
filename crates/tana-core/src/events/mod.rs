//! Domain events received from the pub/sub channel.
//!
//! Events are published by other services, decoded by the event bridge
//! and fanned out in-process to live client connections.

use serde::{Deserialize, Serialize};

/// A decoded pub/sub message.
///
/// `type` is the discriminator consumers route on; `payload` is opaque to
/// this service and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type discriminator.
    #[serde(rename = "type")]
    pub kind: String,
    /// Event body.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event.
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Decode an event from a raw JSON message.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Decode an event from raw message bytes.
    pub fn decode_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }
}
