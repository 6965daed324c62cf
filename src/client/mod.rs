//! Reporting client.
//!
//! Owns the ordered processor list and the transport. Events pass through
//! every processor in registration order, then move into the transport.

mod processor;

pub use processor::{EventProcessor, EventProcessors, Integration};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::event::{ErrorEvent, EventHint};
use crate::transport::{Response, Transport};
use crate::types::{ClientOptions, Config, EventId, Result};

pub struct ReportingClient {
    options: ClientOptions,
    processors: EventProcessors,
    integrations: HashSet<&'static str>,
    transport: Arc<dyn Transport>,
    shutdown_timeout: Duration,
}

impl ReportingClient {
    pub fn new(options: ClientOptions, transport: Arc<dyn Transport>) -> Self {
        Self {
            options,
            processors: EventProcessors::new(),
            integrations: HashSet::new(),
            transport,
            shutdown_timeout: Duration::from_secs(2),
        }
    }

    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::new(config.client.clone(), transport)
            .with_shutdown_timeout(config.transport.shutdown_timeout)
    }

    /// Default drain timeout for [`close`](Self::close) without an explicit one.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn add_event_processor(&mut self, processor: Arc<dyn EventProcessor>) {
        self.processors.push(processor);
    }

    /// Install an integration. A name already installed is skipped.
    pub fn add_integration(&mut self, integration: &dyn Integration) -> bool {
        if !self.integrations.insert(integration.name()) {
            tracing::debug!(integration = integration.name(), "Integration already installed");
            return false;
        }
        integration.setup_once(&mut self.processors);
        tracing::info!(integration = integration.name(), "Integration installed");
        true
    }

    pub fn has_integration(&self, name: &str) -> bool {
        self.integrations.contains(name)
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Run `event` through the processors and hand it to the transport.
    ///
    /// `Ok(None)` means a processor dropped the event.
    pub async fn capture_event(&self, event: ErrorEvent, hint: EventHint) -> Result<Option<Response>> {
        let event = self.prepare_event(event, &hint);
        let event_id = event.event_id;

        let Some(event) = self.processors.apply(event, &hint).await else {
            tracing::debug!(event_id = ?event_id, "Event dropped by processor");
            return Ok(None);
        };

        let response = self.transport.send_event(event).await?;
        tracing::debug!(event_id = ?event_id, status = ?response.status, "Event delivered");
        Ok(Some(response))
    }

    /// Close the transport, waiting up to `timeout` (or the configured default).
    pub async fn close(&self, timeout: Option<Duration>) -> bool {
        self.transport
            .close(Some(timeout.unwrap_or(self.shutdown_timeout)))
            .await
    }

    fn prepare_event(&self, mut event: ErrorEvent, hint: &EventHint) -> ErrorEvent {
        if event.event_id.is_none() {
            event.event_id = Some(hint.event_id.unwrap_or_else(EventId::new));
        }
        if event.timestamp.is_none() {
            event.timestamp = Some(Utc::now());
        }
        if event.release.is_none() {
            event.release = self.options.release.clone();
        }
        if event.dist.is_none() {
            event.dist = self.options.dist.clone();
        }
        if event.environment.is_none() {
            event.environment = self.options.environment.clone();
        }
        event
    }
}

impl std::fmt::Debug for ReportingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingClient")
            .field("options", &self.options)
            .field("processors", &self.processors)
            .field("integrations", &self.integrations)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Status;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryTransport {
        sent: Mutex<Vec<ErrorEvent>>,
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn send_event(&self, event: ErrorEvent) -> Result<Response> {
            self.sent.lock().unwrap().push(event);
            Ok(Response::new(Status::Success))
        }

        async fn close(&self, _timeout: Option<Duration>) -> bool {
            true
        }
    }

    struct Dropper;

    #[async_trait]
    impl EventProcessor for Dropper {
        async fn process(&self, _event: ErrorEvent, _hint: &EventHint) -> Option<ErrorEvent> {
            None
        }
    }

    struct OnlyOnce;

    impl Integration for OnlyOnce {
        fn name(&self) -> &'static str {
            "OnlyOnce"
        }

        fn setup_once(&self, processors: &mut EventProcessors) {
            processors.push(Arc::new(Dropper));
        }
    }

    fn options() -> ClientOptions {
        ClientOptions {
            release: Some("app@2.0.0".into()),
            dist: Some("42".into()),
            environment: Some("staging".into()),
            ..ClientOptions::default()
        }
    }

    #[tokio::test]
    async fn test_capture_fills_defaults_and_delivers() {
        let transport = Arc::new(MemoryTransport::default());
        let client = ReportingClient::new(options(), transport.clone());

        let response = client
            .capture_event(ErrorEvent::default(), EventHint::default())
            .await
            .unwrap();
        assert_eq!(response.map(|r| r.status), Some(Status::Success));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].event_id.is_some());
        assert!(sent[0].timestamp.is_some());
        assert_eq!(sent[0].release.as_deref(), Some("app@2.0.0"));
        assert_eq!(sent[0].dist.as_deref(), Some("42"));
        assert_eq!(sent[0].environment.as_deref(), Some("staging"));
    }

    #[tokio::test]
    async fn test_event_values_win_over_options() {
        let transport = Arc::new(MemoryTransport::default());
        let client = ReportingClient::new(options(), transport.clone());
        let hint_id = EventId::new();
        let event = ErrorEvent {
            release: Some("app@1.0.0".into()),
            ..ErrorEvent::default()
        };

        client
            .capture_event(
                event,
                EventHint {
                    event_id: Some(hint_id),
                    original_exception: None,
                },
            )
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].release.as_deref(), Some("app@1.0.0"));
        assert_eq!(sent[0].event_id, Some(hint_id));
    }

    #[tokio::test]
    async fn test_dropped_event_not_sent() {
        let transport = Arc::new(MemoryTransport::default());
        let mut client = ReportingClient::new(options(), transport.clone());
        client.add_event_processor(Arc::new(Dropper));

        let response = client
            .capture_event(ErrorEvent::default(), EventHint::default())
            .await
            .unwrap();
        assert!(response.is_none());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_integration_installed_once() {
        let mut client = ReportingClient::new(options(), Arc::new(MemoryTransport::default()));
        assert!(client.add_integration(&OnlyOnce));
        assert!(!client.add_integration(&OnlyOnce));
        assert!(client.has_integration("OnlyOnce"));
        assert_eq!(client.processor_count(), 1);
    }
}
