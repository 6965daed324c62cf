//! Transport over the native bridge.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{DeliveryBuffer, Response, Transport};
use crate::event::ErrorEvent;
use crate::types::{Error, Result, TransportConfig};

/// Capabilities the native module advertises to script code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeConstants {
    pub native_client_available: bool,
    pub native_transport: bool,
}

/// The native module's exposed calls.
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// Hand a serialized event to the native reporting agent.
    async fn send_event(&self, event: serde_json::Value) -> Result<Response>;

    fn constants(&self) -> NativeConstants {
        NativeConstants {
            native_client_available: true,
            native_transport: true,
        }
    }
}

/// Delivers events through a [`NativeBridge`] with bounded concurrency.
pub struct NativeTransport {
    bridge: Arc<dyn NativeBridge>,
    buffer: DeliveryBuffer,
    closed: CancellationToken,
}

impl NativeTransport {
    pub fn new(bridge: Arc<dyn NativeBridge>, config: &TransportConfig) -> Self {
        Self {
            bridge,
            buffer: DeliveryBuffer::new(config.buffer_size),
            closed: CancellationToken::new(),
        }
    }

    pub fn buffer(&self) -> &DeliveryBuffer {
        &self.buffer
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

#[async_trait]
impl Transport for NativeTransport {
    async fn send_event(&self, event: ErrorEvent) -> Result<Response> {
        if self.is_closed() {
            return Err(Error::TransportClosed);
        }
        let constants = self.bridge.constants();
        if !constants.native_client_available {
            return Err(Error::bridge("native client unavailable"));
        }
        if !constants.native_transport {
            return Err(Error::bridge("native transport unavailable"));
        }

        let event_id = event.event_id;
        let payload = serde_json::to_value(&event)?;
        let bridge = self.bridge.clone();

        let handle = self
            .buffer
            .add(async move { bridge.send_event(payload).await })
            .map_err(|e| {
                tracing::warn!(event_id = ?event_id, "Dropping event: {}", e);
                e
            })?;
        tracing::debug!(in_flight = self.buffer.len(), "Event queued for native delivery");

        let response = handle
            .await
            .map_err(|e| Error::internal(format!("delivery task failed: {}", e)))??;
        tracing::debug!(status = ?response.status, "Native delivery finished");
        Ok(response)
    }

    async fn close(&self, timeout: Option<Duration>) -> bool {
        self.closed.cancel();
        self.buffer.drain(timeout).await
    }
}

impl fmt::Debug for NativeTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeTransport")
            .field("buffer", &self.buffer)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Status;
    use std::sync::Mutex;

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

    struct FailingBridge;

    #[async_trait]
    impl NativeBridge for FailingBridge {
        async fn send_event(&self, _event: serde_json::Value) -> Result<Response> {
            Err(Error::bridge("agent not started"))
        }
    }

    struct LimitedBridge(NativeConstants);

    #[async_trait]
    impl NativeBridge for LimitedBridge {
        async fn send_event(&self, _event: serde_json::Value) -> Result<Response> {
            Ok(Response::new(Status::Success))
        }

        fn constants(&self) -> NativeConstants {
            self.0
        }
    }

    #[tokio::test]
    async fn test_send_serializes_event() {
        let bridge = Arc::new(RecordingBridge::default());
        let transport = NativeTransport::new(bridge.clone(), &TransportConfig::default());
        let mut event = ErrorEvent::with_exception("Error", "boom", vec![]);
        event.platform = Some("node".into());

        let response = transport.send_event(event).await.unwrap();
        assert!(response.status.is_success());

        let seen = bridge.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["platform"], "node");
        assert_eq!(seen[0]["exception"]["values"][0]["value"], "boom");
    }

    #[tokio::test]
    async fn test_bridge_failure_surfaces() {
        let transport = NativeTransport::new(Arc::new(FailingBridge), &TransportConfig::default());
        let err = transport.send_event(ErrorEvent::default()).await.unwrap_err();
        assert!(matches!(err, Error::Bridge(_)));
        assert!(transport.buffer().is_empty());
    }

    #[tokio::test]
    async fn test_send_after_close_rejected() {
        let transport = NativeTransport::new(
            Arc::new(RecordingBridge::default()),
            &TransportConfig::default(),
        );
        assert!(transport.close(Some(Duration::from_millis(10))).await);
        let err = transport.send_event(ErrorEvent::default()).await.unwrap_err();
        assert!(matches!(err, Error::TransportClosed));
    }

    #[tokio::test]
    async fn test_unavailable_native_transport() {
        let bridge = LimitedBridge(NativeConstants {
            native_client_available: true,
            native_transport: false,
        });
        let transport = NativeTransport::new(Arc::new(bridge), &TransportConfig::default());
        let err = transport.send_event(ErrorEvent::default()).await.unwrap_err();
        assert!(matches!(err, Error::Bridge(ref msg) if msg.contains("transport")));
    }

    #[tokio::test]
    async fn test_unavailable_native_client() {
        let bridge = LimitedBridge(NativeConstants {
            native_client_available: false,
            native_transport: true,
        });
        let transport = NativeTransport::new(Arc::new(bridge), &TransportConfig::default());
        let err = transport.send_event(ErrorEvent::default()).await.unwrap_err();
        assert!(matches!(err, Error::Bridge(ref msg) if msg.contains("client")));
        assert!(transport.buffer().is_empty());
    }
}
