//! Pub/sub transports the bridge can subscribe through.

use async_trait::async_trait;

use tana_core::result::AppResult;

/// A subscription to one pub/sub channel.
///
/// Errors from either method are transport failures; the bridge decides
/// whether to resubscribe or give up.
#[async_trait]
pub trait EventSource: Send + 'static {
    /// (Re)open the subscription, dropping any previous one.
    async fn subscribe(&mut self, channel: &str) -> AppResult<()>;

    /// Wait for the next raw message payload.
    async fn next_message(&mut self) -> AppResult<Vec<u8>>;
}

#[cfg(feature = "redis-pubsub")]
mod redis_source {
    use async_trait::async_trait;
    use futures::StreamExt;
    use futures::stream::BoxStream;
    use tracing::debug;

    use tana_core::error::{AppError, ErrorKind};
    use tana_core::result::AppResult;

    use super::EventSource;

    /// Redis `SUBSCRIBE` on a dedicated connection.
    pub struct RedisEventSource {
        client: redis::Client,
        messages: Option<BoxStream<'static, redis::Msg>>,
    }

    impl std::fmt::Debug for RedisEventSource {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RedisEventSource")
                .field("subscribed", &self.messages.is_some())
                .finish()
        }
    }

    impl RedisEventSource {
        /// Prepare a source for the Redis server at `url`. No connection is
        /// made until [`EventSource::subscribe`].
        pub fn open(url: &str) -> AppResult<Self> {
            let client = redis::Client::open(url).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid pub/sub URL", e)
            })?;
            Ok(Self {
                client,
                messages: None,
            })
        }

        fn map_err(e: redis::RedisError) -> AppError {
            AppError::with_source(ErrorKind::Transport, format!("Pub/sub error: {e}"), e)
        }
    }

    #[async_trait]
    impl EventSource for RedisEventSource {
        async fn subscribe(&mut self, channel: &str) -> AppResult<()> {
            self.messages = None;

            let mut pubsub = self
                .client
                .get_async_pubsub()
                .await
                .map_err(Self::map_err)?;
            pubsub.subscribe(channel).await.map_err(Self::map_err)?;
            debug!(channel, "Redis SUBSCRIBE acknowledged");

            self.messages = Some(pubsub.into_on_message().boxed());
            Ok(())
        }

        async fn next_message(&mut self) -> AppResult<Vec<u8>> {
            let messages = self
                .messages
                .as_mut()
                .ok_or_else(|| AppError::transport("Pub/sub source is not subscribed"))?;

            match messages.next().await {
                Some(msg) => Ok(msg.get_payload_bytes().to_vec()),
                None => {
                    self.messages = None;
                    Err(AppError::transport("Pub/sub connection closed"))
                }
            }
        }
    }
}

#[cfg(feature = "redis-pubsub")]
pub use redis_source::RedisEventSource;
