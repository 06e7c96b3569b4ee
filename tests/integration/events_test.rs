//! Integration tests for the event bridge feeding the SSE endpoint.

mod helpers;

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

use tana_core::config::EventsConfig;
use tana_core::error::AppError;
use tana_core::result::AppResult;
use tana_realtime::{EventBridge, EventSource};

/// Pub/sub source fed from a test channel.
struct ChannelSource(mpsc::UnboundedReceiver<&'static str>);

#[async_trait]
impl EventSource for ChannelSource {
    async fn subscribe(&mut self, _channel: &str) -> AppResult<()> {
        Ok(())
    }

    async fn next_message(&mut self) -> AppResult<Vec<u8>> {
        self.0
            .recv()
            .await
            .map(|raw| raw.as_bytes().to_vec())
            .ok_or_else(|| AppError::transport("closed"))
    }
}

#[tokio::test]
async fn test_events_require_session() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/events", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_published_message_reaches_event_stream() {
    let app = helpers::TestApp::new();
    let token = app.sign_up("a@b.com").await;

    let (publish, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let bridge = EventBridge::new(ChannelSource(rx), app.hub.clone(), EventsConfig::default());
    let bridge_task = tokio::spawn(bridge.run(shutdown_rx));

    let req = Request::builder()
        .uri("/api/events")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/event-stream"
    );

    publish.send("garbage").unwrap();
    publish
        .send(r#"{"type":"message.created","payload":{"id":7}}"#)
        .unwrap();

    let mut body = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("event frame in time")
        .expect("stream open")
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();

    assert!(text.contains("event: message.created"), "{text}");
    assert!(text.contains(r#""payload":{"id":7}"#), "{text}");

    shutdown_tx.send(true).unwrap();
    bridge_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_line_break_in_event_type_keeps_stream_alive() {
    let app = helpers::TestApp::new();
    let token = app.sign_up("a@b.com").await;

    let (publish, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let bridge = EventBridge::new(ChannelSource(rx), app.hub.clone(), EventsConfig::default());
    let bridge_task = tokio::spawn(bridge.run(shutdown_rx));

    let req = Request::builder()
        .uri("/api/events")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    publish.send(r#"{"type":"a\nb","payload":1}"#).unwrap();
    publish
        .send(r#"{"type":"message.created","payload":{"id":8}}"#)
        .unwrap();

    let mut body = response.into_body().into_data_stream();
    let mut received = String::new();
    while !received.contains("event: message.created") {
        let frame = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .expect("event frame in time")
            .expect("stream open")
            .unwrap();
        received.push_str(&String::from_utf8(frame.to_vec()).unwrap());
    }

    assert!(received.contains(r#""type":"a\nb""#), "{received}");
    assert!(received.contains(r#""payload":{"id":8}"#), "{received}");

    shutdown_tx.send(true).unwrap();
    bridge_task.await.unwrap().unwrap();
}
