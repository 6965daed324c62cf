//! Delivery integration tests: client → processors → native transport → bridge.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rn_error_bridge::capabilities::StackStringParser;
use rn_error_bridge::event::{ErrorEvent, EventHint, StackFrame};
use rn_error_bridge::transport::{NativeBridge, Response, Status, Transport};
use rn_error_bridge::types::{Config, SymbolicationConfig, TransportConfig};
use rn_error_bridge::{DebugSymbolicator, Error, NativeTransport, ReportingClient, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Bridge whose deliveries block until the test opens the gate.
struct GatedBridge {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl NativeBridge for GatedBridge {
    async fn send_event(&self, _event: serde_json::Value) -> Result<Response> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Error::bridge(e.to_string()))?;
        Ok(Response::new(Status::Success))
    }
}

/// Bridge that takes a fixed time per delivery.
struct SlowBridge(Duration);

#[async_trait]
impl NativeBridge for SlowBridge {
    async fn send_event(&self, _event: serde_json::Value) -> Result<Response> {
        tokio::time::sleep(self.0).await;
        Ok(Response::new(Status::Success))
    }
}

/// Bridge recording every payload it receives.
#[derive(Default)]
struct RecordingBridge {
    seen: Mutex<Vec<serde_json::Value>>,
}

#[async_trait]
impl NativeBridge for RecordingBridge {
    async fn send_event(&self, event: serde_json::Value) -> Result<Response> {
        self.seen.lock().unwrap().push(event);
        Ok(Response::new(Status::Success))
    }
}

/// Helper: wait until `transport` reports `n` in-flight deliveries.
async fn wait_for_in_flight(transport: &NativeTransport, n: usize) {
    for _ in 0..200 {
        if transport.buffer().len() == n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {} in-flight deliveries, saw {}", n, transport.buffer().len());
}

#[tokio::test]
async fn test_full_buffer_fails_fast() {
    let gate = Arc::new(Semaphore::new(0));
    let transport = Arc::new(NativeTransport::new(
        Arc::new(GatedBridge { gate: gate.clone() }),
        &TransportConfig::default(),
    ));

    let pending: Vec<_> = (0..30)
        .map(|_| {
            let transport = transport.clone();
            tokio::spawn(async move { transport.send_event(ErrorEvent::default()).await })
        })
        .collect();
    wait_for_in_flight(&transport, 30).await;

    let overflow = tokio::time::timeout(
        Duration::from_millis(100),
        transport.send_event(ErrorEvent::default()),
    )
    .await
    .expect("31st send must not wait");
    assert!(matches!(overflow, Err(Error::BufferFull { capacity: 30 })));

    gate.add_permits(30);
    for handle in pending {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.status, Status::Success);
    }
    assert!(transport.buffer().is_empty());
}

#[tokio::test]
async fn test_close_drains_pending_deliveries() {
    let transport = Arc::new(NativeTransport::new(
        Arc::new(SlowBridge(Duration::from_millis(50))),
        &TransportConfig::default(),
    ));

    let pending: Vec<_> = (0..2)
        .map(|_| {
            let transport = transport.clone();
            tokio::spawn(async move { transport.send_event(ErrorEvent::default()).await })
        })
        .collect();
    wait_for_in_flight(&transport, 2).await;

    assert!(transport.close(Some(Duration::from_millis(5000))).await);
    assert!(transport.buffer().is_empty());
    for handle in pending {
        assert!(handle.await.unwrap().is_ok());
    }
}

#[tokio::test]
async fn test_close_reports_incomplete_drain() {
    let gate = Arc::new(Semaphore::new(0));
    let transport = Arc::new(NativeTransport::new(
        Arc::new(GatedBridge { gate: gate.clone() }),
        &TransportConfig::default(),
    ));
    let sender = transport.clone();
    let pending = tokio::spawn(async move { sender.send_event(ErrorEvent::default()).await });
    wait_for_in_flight(&transport, 1).await;

    assert!(!transport.close(Some(Duration::from_millis(20))).await);

    gate.add_permits(1);
    assert!(pending.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_hermes_event_end_to_end() {
    let config = Config::from_json(r#"{"client": {"release": "app@3.1.0"}}"#).unwrap();
    let bridge = Arc::new(RecordingBridge::default());
    let transport = Arc::new(NativeTransport::new(bridge.clone(), &config.transport));
    let mut client = ReportingClient::from_config(&config, transport);

    let symbolicator = DebugSymbolicator::builder(SymbolicationConfig::default())
        .stack_parser(Arc::new(StackStringParser))
        .build()
        .unwrap();
    assert!(client.add_integration(&symbolicator));
    assert!(!client.add_integration(&symbolicator));

    let hint: EventHint = serde_json::from_value(serde_json::json!({
        "originalException": {
            "message": "boom",
            "jsEngine": "hermes",
            "stack": "Error: boom\n    at onPress (address at index.android.bundle:1:4521)\n    at apply (native)\n    at dispatch (address at index.android.bundle:1:98)",
        }
    }))
    .unwrap();
    let event = ErrorEvent::with_exception("Error", "boom", vec![StackFrame::default()]);

    let response = client.capture_event(event, hint).await.unwrap().unwrap();
    assert_eq!(response.status, Status::Success);

    let seen = bridge.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let sent = &seen[0];
    assert_eq!(sent["platform"], "node");
    assert_eq!(sent["release"], "app@3.1.0");
    assert_eq!(sent["extra"]["jsEngine"], "hermes");
    assert_eq!(sent["event_id"].as_str().unwrap().len(), 32);

    let frames = sent["exception"]["values"][0]["stacktrace"]["frames"]
        .as_array()
        .unwrap();
    let functions: Vec<_> = frames.iter().map(|f| f["function"].as_str().unwrap()).collect();
    assert_eq!(functions, vec!["dispatch", "apply", "onPress"]);
    assert_eq!(frames[2]["in_app"], true);
    assert_eq!(frames[2]["platform"], "javascript");
    assert_eq!(frames[2]["lineno"], 1);
    assert_eq!(frames[1]["in_app"], false);
    assert!(frames[1].get("lineno").is_none());

    drop(seen);
    assert!(client.close(Some(Duration::from_secs(1))).await);
}
