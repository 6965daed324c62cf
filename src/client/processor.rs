//! Event processor and integration contracts.

use async_trait::async_trait;
use std::sync::Arc;

use crate::event::{ErrorEvent, EventHint};

/// Hook run on every captured event before delivery.
///
/// Returning `None` drops the event.
#[async_trait]
pub trait EventProcessor: Send + Sync {
    async fn process(&self, event: ErrorEvent, hint: &EventHint) -> Option<ErrorEvent>;
}

/// Pluggable feature that installs processors into a client.
pub trait Integration: Send + Sync {
    /// Stable name; a client installs each name at most once.
    fn name(&self) -> &'static str;

    fn setup_once(&self, processors: &mut EventProcessors);
}

/// Ordered processor list owned by a client.
#[derive(Default)]
pub struct EventProcessors {
    processors: Vec<Arc<dyn EventProcessor>>,
}

impl EventProcessors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, processor: Arc<dyn EventProcessor>) {
        self.processors.push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run processors in registration order, stopping at the first drop.
    pub async fn apply(&self, mut event: ErrorEvent, hint: &EventHint) -> Option<ErrorEvent> {
        for processor in &self.processors {
            event = processor.process(event, hint).await?;
        }
        Some(event)
    }
}

impl std::fmt::Debug for EventProcessors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventProcessors")
            .field("len", &self.processors.len())
            .finish()
    }
}
