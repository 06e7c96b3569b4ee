//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Build a response carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of probing one backing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, otherwise `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Cache reachability.
    pub cache: bool,
    /// User store reachability.
    pub database: bool,
    /// Connected event stream clients.
    pub event_subscribers: usize,
}
