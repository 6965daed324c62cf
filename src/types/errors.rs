//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the bridge.
#[derive(Error, Debug)]
pub enum Error {
    /// The host stack parser could not read the thrown value.
    #[error("stack parse error: {0}")]
    StackParse(String),

    /// The dev-server symbolication call failed.
    #[error("symbolication error: {0}")]
    Symbolication(String),

    /// Fetching source lines for a frame failed.
    #[error("source context error: {0}")]
    SourceContext(String),

    /// Delivery buffer is at capacity; the send was rejected without waiting.
    #[error("delivery buffer full: {capacity} operations in flight")]
    BufferFull { capacity: usize },

    /// The transport was closed and accepts no more events.
    #[error("transport closed")]
    TransportClosed,

    /// The native bridge call failed.
    #[error("native bridge error: {0}")]
    Bridge(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Internal errors (task join failures and the like).
    #[error("internal error: {0}")]
    Internal(String),

    /// HTTP errors from dev-server requests.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error only degrades enrichment and should never block delivery.
    pub fn is_recoverable_enrichment(&self) -> bool {
        matches!(
            self,
            Error::StackParse(_) | Error::Symbolication(_) | Error::SourceContext(_) | Error::Http(_)
        )
    }
}

// Convenience constructors
impl Error {
    pub fn stack_parse(msg: impl Into<String>) -> Self {
        Self::StackParse(msg.into())
    }

    pub fn symbolication(msg: impl Into<String>) -> Self {
        Self::Symbolication(msg.into())
    }

    pub fn source_context(msg: impl Into<String>) -> Self {
        Self::SourceContext(msg.into())
    }

    pub fn bridge(msg: impl Into<String>) -> Self {
        Self::Bridge(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
