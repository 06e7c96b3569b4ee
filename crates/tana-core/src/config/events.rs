//! Pub/sub event bridge configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Event bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Whether the bridge task is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Redis URL of the pub/sub server. Falls back to the cache URL when empty.
    #[serde(default)]
    pub url: String,
    /// Name of the subscribed channel.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Capacity of the in-process broadcast buffer.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// What to do when the transport fails.
    #[serde(default)]
    pub on_transport_error: TransportFailurePolicy,
    /// First reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_initial")]
    pub reconnect_initial_ms: u64,
    /// Upper bound of the reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_ms: u64,
}

impl EventsConfig {
    /// First reconnect delay, never below one millisecond.
    pub fn reconnect_initial(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_ms.max(1))
    }

    /// Maximum reconnect delay, never below the first delay.
    pub fn reconnect_max(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_ms).max(self.reconnect_initial())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: String::new(),
            channel: default_channel(),
            buffer_size: default_buffer_size(),
            on_transport_error: TransportFailurePolicy::default(),
            reconnect_initial_ms: default_reconnect_initial(),
            reconnect_max_ms: default_reconnect_max(),
        }
    }
}

/// Behaviour of the event bridge after a transport-level receive failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailurePolicy {
    /// Stop the bridge and terminate the process, leaving the restart to
    /// the supervisor.
    #[default]
    Exit,
    /// Resubscribe with exponential backoff.
    Reconnect,
}

fn default_true() -> bool {
    true
}

fn default_channel() -> String {
    "events".to_string()
}

fn default_buffer_size() -> usize {
    1024
}

fn default_reconnect_initial() -> u64 {
    500
}

fn default_reconnect_max() -> u64 {
    30_000
}
