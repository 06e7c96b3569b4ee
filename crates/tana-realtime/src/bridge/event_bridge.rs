//! Long-lived subscriber that decodes pub/sub messages and publishes them
//! to the hub.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use tana_core::config::{EventsConfig, TransportFailurePolicy};
use tana_core::events::Event;
use tana_core::result::AppResult;

use super::source::EventSource;
use crate::hub::EventHub;

/// Where the bridge is in its subscribe/dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeState {
    /// Opening the subscription.
    Subscribing,
    /// Forwarding messages from an open subscription.
    Dispatching,
}

/// Subscribes to `events.channel` and forwards every decodable message to
/// the hub, in transport order, exactly once.
///
/// Delivery is at-most-once: messages published while the bridge is not
/// subscribed are lost.
#[derive(Debug)]
pub struct EventBridge<S> {
    source: S,
    hub: EventHub,
    config: EventsConfig,
}

impl<S: EventSource> EventBridge<S> {
    /// Create a bridge reading from `source` into `hub`.
    pub fn new(source: S, hub: EventHub, config: EventsConfig) -> Self {
        Self {
            source,
            hub,
            config,
        }
    }

    /// Run until shutdown is signalled.
    ///
    /// Returns `Ok(())` on shutdown. Under the `exit` policy the first
    /// transport failure is returned as an error instead.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> AppResult<()> {
        let channel = self.config.channel.clone();
        let mut state = BridgeState::Subscribing;
        let mut backoff = self.config.reconnect_initial();

        info!(channel = %channel, policy = ?self.config.on_transport_error, "Event bridge started");

        loop {
            let outcome = match state {
                BridgeState::Subscribing => {
                    let result = tokio::select! {
                        _ = shutdown_requested(&mut shutdown) => break,
                        result = self.source.subscribe(&channel) => result,
                    };
                    result.map(|()| {
                        info!(channel = %channel, "Subscribed to event channel");
                        backoff = self.config.reconnect_initial();
                        state = BridgeState::Dispatching;
                    })
                }
                BridgeState::Dispatching => {
                    let result = tokio::select! {
                        _ = shutdown_requested(&mut shutdown) => break,
                        result = self.source.next_message() => result,
                    };
                    result.map(|raw| self.dispatch(&raw))
                }
            };

            let Err(e) = outcome else {
                continue;
            };

            match self.config.on_transport_error {
                TransportFailurePolicy::Exit => {
                    error!(error = %e, "Event transport failed, stopping bridge");
                    return Err(e);
                }
                TransportFailurePolicy::Reconnect => {
                    warn!(
                        error = %e,
                        retry_in_ms = backoff.as_millis() as u64,
                        "Event transport failed, resubscribing"
                    );
                    state = BridgeState::Subscribing;
                    tokio::select! {
                        _ = shutdown_requested(&mut shutdown) => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                    backoff = next_backoff(backoff, self.config.reconnect_max());
                }
            }
        }

        info!("Event bridge stopped");
        Ok(())
    }

    fn dispatch(&self, raw: &[u8]) {
        match Event::decode_slice(raw) {
            Ok(event) => {
                debug!(kind = %event.kind, "Event received");
                self.hub.publish(event);
            }
            Err(e) => {
                debug!(error = %e, bytes = raw.len(), "Dropping malformed event");
            }
        }
    }
}

/// Double the delay, capped at `max`.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}

/// Resolves once shutdown is requested or the sender is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::sync::mpsc;

    use tana_core::error::{AppError, ErrorKind};

    use super::*;

    enum Step {
        Message(&'static str),
        Fail,
    }

    /// Replays scripted steps; idles once the script is exhausted.
    struct ScriptedSource {
        steps: mpsc::UnboundedReceiver<Step>,
        subscriptions: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn subscribe(&mut self, _channel: &str) -> AppResult<()> {
            self.subscriptions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn next_message(&mut self) -> AppResult<Vec<u8>> {
            match self.steps.recv().await {
                Some(Step::Message(raw)) => Ok(raw.as_bytes().to_vec()),
                Some(Step::Fail) => Err(AppError::transport("connection reset")),
                None => std::future::pending().await,
            }
        }
    }

    struct Harness {
        steps: mpsc::UnboundedSender<Step>,
        subscriptions: Arc<AtomicUsize>,
        hub: EventHub,
        shutdown: watch::Sender<bool>,
        task: tokio::task::JoinHandle<AppResult<()>>,
    }

    fn start(policy: TransportFailurePolicy) -> (Harness, tokio::sync::broadcast::Receiver<Event>) {
        let (steps_tx, steps_rx) = mpsc::unbounded_channel();
        let subscriptions = Arc::new(AtomicUsize::new(0));
        let hub = EventHub::new(16);
        let events = hub.subscribe();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let source = ScriptedSource {
            steps: steps_rx,
            subscriptions: subscriptions.clone(),
        };
        let config = EventsConfig {
            on_transport_error: policy,
            ..Default::default()
        };
        let task = tokio::spawn(EventBridge::new(source, hub.clone(), config).run(shutdown_rx));

        let harness = Harness {
            steps: steps_tx,
            subscriptions,
            hub,
            shutdown: shutdown_tx,
            task,
        };
        (harness, events)
    }

    #[tokio::test]
    async fn test_forwards_well_formed_and_drops_malformed() {
        let (h, mut events) = start(TransportFailurePolicy::Reconnect);

        h.steps.send(Step::Message("{not json")).unwrap();
        h.steps.send(Step::Message(r#"{"payload":{}}"#)).unwrap();
        h.steps
            .send(Step::Message(r#"{"type":"message.created","payload":{"id":7}}"#))
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event, Event::new("message.created", json!({"id": 7})));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        h.steps.send(Step::Message(r#"{"type":"ping"}"#)).unwrap();
        assert_eq!(events.recv().await.unwrap().kind, "ping");
        assert_eq!(h.subscriptions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_after_transport_failure() {
        let (h, mut events) = start(TransportFailurePolicy::Reconnect);

        h.steps.send(Step::Fail).unwrap();
        h.steps.send(Step::Message(r#"{"type":"after"}"#)).unwrap();

        assert_eq!(events.recv().await.unwrap().kind, "after");
        assert_eq!(h.subscriptions.load(Ordering::SeqCst), 2);
        assert!(!h.task.is_finished());
    }

    #[tokio::test]
    async fn test_exit_policy_returns_error() {
        let (h, _events) = start(TransportFailurePolicy::Exit);

        h.steps.send(Step::Fail).unwrap();

        let err = h.task.await.unwrap().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let (h, _events) = start(TransportFailurePolicy::Reconnect);

        h.shutdown.send(true).unwrap();

        h.task.await.unwrap().unwrap();
        assert_eq!(h.hub.receiver_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_backoff() {
        let (h, _events) = start(TransportFailurePolicy::Reconnect);

        h.steps.send(Step::Fail).unwrap();
        tokio::task::yield_now().await;
        h.shutdown.send(true).unwrap();

        h.task.await.unwrap().unwrap();
    }

    #[test]
    fn test_backoff_doubles_up_to_max() {
        let max = Duration::from_secs(30);
        assert_eq!(
            next_backoff(Duration::from_millis(500), max),
            Duration::from_secs(1)
        );
        assert_eq!(next_backoff(Duration::from_secs(20), max), max);
        assert_eq!(next_backoff(max, max), max);
    }

    #[test]
    fn test_zero_initial_delay_still_grows() {
        let config = EventsConfig {
            reconnect_initial_ms: 0,
            ..Default::default()
        };
        let first = config.reconnect_initial();
        assert!(first > Duration::ZERO);
        assert_eq!(
            next_backoff(first, config.reconnect_max()),
            Duration::from_millis(2)
        );
    }
}
