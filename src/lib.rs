//! # RN Error Bridge - error event enrichment for mobile JS runtimes
//!
//! Sits between an error-reporting client and a mobile app runtime:
//! - Enriches captured errors with normalized, source-mapped stack frames
//! - Symbolicates against the local dev server in development builds
//! - Converts Hermes frames directly in release builds
//! - Delivers events to the native reporting agent with bounded concurrency
//!
//! ## Architecture
//!
//! ```text
//!  capture_event(event, hint)
//!          │
//!          ▼
//!  ┌───────────────────┐      ┌──────────────────────────┐
//!  │  ReportingClient  │─────▶│ DebugSymbolicator        │
//!  │  (processor list) │      │  StackParser             │
//!  └─────────┬─────────┘      │  Symbolicator ─▶ dev srv │
//!            │                │  FrameNormalizer         │
//!            ▼                └──────────────────────────┘
//!  ┌───────────────────┐
//!  │  NativeTransport  │──▶ DeliveryBuffer (30 in flight) ──▶ NativeBridge
//!  └───────────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod capabilities;
pub mod client;
pub mod event;
pub mod frames;
pub mod symbolicator;
pub mod transport;
pub mod types;

// Internal utilities
pub mod observability;

pub use client::ReportingClient;
pub use symbolicator::DebugSymbolicator;
pub use transport::NativeTransport;
pub use types::{Config, Error, Result};
