//! Session token configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sliding TTL of a session cache entry, in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Number of random bytes drawn for each token.
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Prefix of the cache key holding a session (`prefix + token`).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Deadline for each cache or repository call, in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
}

impl SessionConfig {
    /// Session TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 60 * 60)
    }

    /// Per-call deadline as a [`Duration`].
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            token_bytes: default_token_bytes(),
            key_prefix: default_key_prefix(),
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_token_bytes() -> usize {
    128
}

fn default_key_prefix() -> String {
    "session-".to_string()
}

fn default_operation_timeout() -> u64 {
    5_000
}
