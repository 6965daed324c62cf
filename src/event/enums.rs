//! Enumerations carried on error events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform tag for frames resolved to application source.
pub const PLATFORM_JAVASCRIPT: &str = "javascript";

/// Platform tag that stops the backend from re-applying source maps.
pub const PLATFORM_NODE: &str = "node";

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
    Fatal,
}

/// JavaScript engine that produced a stack trace.
///
/// Identifiers are matched exactly. Anything else, including a differently
/// cased known name, is kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JsEngine {
    /// Bytecode-compiling engine; its traces need format conversion only.
    Hermes,
    JavaScriptCore,
    V8,
    Unknown(String),
}

impl JsEngine {
    pub fn as_str(&self) -> &str {
        match self {
            JsEngine::Hermes => "hermes",
            JsEngine::JavaScriptCore => "jsc",
            JsEngine::V8 => "v8",
            JsEngine::Unknown(name) => name,
        }
    }

    /// Engines whose raw frames can be converted without a dev-server round-trip.
    pub fn supports_direct_conversion(&self) -> bool {
        matches!(self, JsEngine::Hermes)
    }
}

impl From<String> for JsEngine {
    fn from(name: String) -> Self {
        match name.as_str() {
            "hermes" => JsEngine::Hermes,
            "jsc" => JsEngine::JavaScriptCore,
            "v8" => JsEngine::V8,
            _ => JsEngine::Unknown(name),
        }
    }
}

impl From<&str> for JsEngine {
    fn from(name: &str) -> Self {
        JsEngine::from(name.to_string())
    }
}

impl From<JsEngine> for String {
    fn from(engine: JsEngine) -> Self {
        match engine {
            JsEngine::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
