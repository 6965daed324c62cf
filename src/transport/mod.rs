//! Event delivery.
//!
//! Enriched events leave the process through a [`Transport`]. The native
//! transport hands them across the bridge to the platform reporting agent,
//! with at most a fixed number of deliveries in flight.

mod buffer;
mod native;

pub use buffer::DeliveryBuffer;
pub use native::{NativeBridge, NativeConstants, NativeTransport};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::event::ErrorEvent;
use crate::types::Result;

/// Outbound event sink.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one event. The event is owned by the transport from here on.
    async fn send_event(&self, event: ErrorEvent) -> Result<Response>;

    /// Stop accepting events and wait for pending ones, up to `timeout`.
    /// Returns whether everything drained.
    async fn close(&self, timeout: Option<Duration>) -> bool;
}

/// Delivery outcome category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Unknown,
    Skipped,
    Success,
    RateLimit,
    Invalid,
    Failed,
}

impl Status {
    pub fn from_http_code(code: u16) -> Self {
        match code {
            200..=299 => Status::Success,
            429 => Status::RateLimit,
            400..=499 => Status::Invalid,
            500..=599 => Status::Failed,
            _ => Status::Unknown,
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

/// Result of one delivery as reported by the native side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Response {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            reason: None,
        }
    }

    pub fn with_reason(status: Status, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
        }
    }
}
