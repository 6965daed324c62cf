//! Error event model.
//!
//! The JSON shape of [`ErrorEvent`] is what crosses the native bridge, so
//! every optional field is omitted when empty rather than sent as `null`.

mod enums;
mod frame;

pub use enums::{JsEngine, Level, PLATFORM_JAVASCRIPT, PLATFORM_NODE};
pub use frame::{RawStackFrame, StackFrame};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::EventId;

/// Error event handed from capture through processors to the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprint: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionValues>,
}

impl ErrorEvent {
    /// Event with a single exception carrying `frames` as its stacktrace.
    pub fn with_exception(
        exception_type: impl Into<String>,
        value: impl Into<String>,
        frames: Vec<StackFrame>,
    ) -> Self {
        Self {
            exception: Some(ExceptionValues {
                values: vec![Exception {
                    exception_type: Some(exception_type.into()),
                    value: Some(value.into()),
                    stacktrace: Some(Stacktrace { frames }),
                    ..Exception::default()
                }],
            }),
            ..Self::default()
        }
    }

    /// Frames of the primary exception, if it has a stacktrace.
    pub fn frames(&self) -> Option<&[StackFrame]> {
        self.exception
            .as_ref()
            .and_then(|e| e.values.first())
            .and_then(|e| e.stacktrace.as_ref())
            .map(|s| s.frames.as_slice())
    }

    /// Replace the primary exception's frames with `frames` in reverse order.
    ///
    /// Raw traces list the innermost call first; the backend expects it last.
    /// Does nothing and returns `false` when the event has no stacktrace slot.
    pub fn replace_frames(&mut self, mut frames: Vec<StackFrame>) -> bool {
        let Some(stacktrace) = self
            .exception
            .as_mut()
            .and_then(|e| e.values.first_mut())
            .and_then(|e| e.stacktrace.as_mut())
        else {
            return false;
        };
        frames.reverse();
        stacktrace.frames = frames;
        true
    }
}

/// Container for the exception chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionValues {
    #[serde(default)]
    pub values: Vec<Exception>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacktrace {
    #[serde(default)]
    pub frames: Vec<StackFrame>,
}

/// Breadcrumb recorded before the error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Value>,
}

/// Capture-time hint passed alongside an event to every processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_exception: Option<OriginalException>,
}

impl EventHint {
    pub fn with_exception(exception: OriginalException) -> Self {
        Self {
            event_id: None,
            original_exception: Some(exception),
        }
    }
}

/// The thrown value as the runtime reported it.
///
/// Fields the bridge does not interpret are kept in `other` so host stack
/// parsers can still read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalException {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_engine: Option<JsEngine>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, Value>,
}
