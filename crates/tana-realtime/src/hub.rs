//! In-process event fan-out.

use tokio::sync::broadcast;
use tracing::trace;

use tana_core::events::Event;

/// Broadcast point between the event bridge and connected clients.
///
/// Backed by a bounded broadcast channel: a receiver that falls more than
/// `buffer_size` events behind observes a lag and skips ahead.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<Event>,
}

impl EventHub {
    /// Create a hub buffering up to `buffer_size` events per receiver.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Deliver an event to every current receiver. Returns how many
    /// receivers it reached; with none the event is discarded.
    pub fn publish(&self, event: Event) -> usize {
        let reached = self.tx.send(event).unwrap_or(0);
        trace!(receivers = reached, "Event published to hub");
        reached
    }

    /// Register a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn test_publish_reaches_all_receivers() {
        let hub = EventHub::new(8);
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_eq!(hub.receiver_count(), 2);

        let event = Event::new("message.created", json!({"id": 1}));
        assert_eq!(hub.publish(event.clone()), 2);

        assert_eq!(a.recv().await.unwrap(), event);
        assert_eq!(b.recv().await.unwrap(), event);
    }

    #[test]
    fn test_publish_without_receivers() {
        let hub = EventHub::new(8);
        assert_eq!(hub.publish(Event::new("ping", json!(null))), 0);
    }

    #[tokio::test]
    async fn test_slow_receiver_lags() {
        let hub = EventHub::new(2);
        let mut rx = hub.subscribe();
        for i in 0..4 {
            hub.publish(Event::new("tick", json!(i)));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(2))));
        assert_eq!(rx.recv().await.unwrap().payload, json!(2));
    }
}
