//! Core types for the bridge.
//!
//! - **IDs**: `EventId`
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for client, symbolication, transport

mod config;
mod errors;
mod ids;

pub use config::{
    ClientOptions, Config, ObservabilityConfig, SymbolicationConfig, TransportConfig,
};
pub use errors::{Error, Result};
pub use ids::EventId;
