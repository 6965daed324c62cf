//! Frame normalization.
//!
//! Maps raw engine frames onto the backend frame shape, decides which frames
//! belong to the application, and in development builds attaches source
//! context fetched from the dev server.

mod context;

pub use context::{add_context_to_frame, bare_filename, snip_line, SourceContextFetcher};

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;

use crate::capabilities::{DevServer, DevServerLocator};
use crate::event::{RawStackFrame, StackFrame, PLATFORM_JAVASCRIPT, PLATFORM_NODE};
use crate::types::SymbolicationConfig;

/// Path rules deciding whether a frame is application code.
#[derive(Debug, Clone)]
pub struct InAppRules {
    pub vendor_markers: Vec<String>,
    pub native_code_marker: String,
}

impl InAppRules {
    pub fn from_config(config: &SymbolicationConfig) -> Self {
        Self {
            vendor_markers: config.vendor_markers.clone(),
            native_code_marker: config.native_code_marker.clone(),
        }
    }

    /// A frame is in-app when it has a non-zero line and column and a file
    /// outside vendor directories and engine-native placeholders.
    pub fn is_in_app(&self, raw: &RawStackFrame) -> bool {
        let has_position = matches!(raw.column, Some(c) if c != 0)
            && matches!(raw.line_number, Some(l) if l != 0);
        if !has_position {
            return false;
        }
        match raw.file.as_deref() {
            Some(file) => {
                !self.vendor_markers.iter().any(|m| file.contains(m.as_str()))
                    && !file.contains(self.native_code_marker.as_str())
            }
            None => false,
        }
    }

    /// Convert one frame without touching the network.
    pub fn normalize_frame(&self, raw: RawStackFrame) -> StackFrame {
        let in_app = self.is_in_app(&raw);
        StackFrame {
            colno: raw.column,
            filename: raw.file,
            function: raw.method_name,
            in_app: Some(in_app),
            lineno: if in_app { raw.line_number } else { None },
            platform: Some(if in_app { PLATFORM_JAVASCRIPT } else { PLATFORM_NODE }.to_string()),
            ..StackFrame::default()
        }
    }
}

impl Default for InAppRules {
    fn default() -> Self {
        Self::from_config(&SymbolicationConfig::default())
    }
}

/// Normalizes frame batches, optionally enriching in-app frames with source context.
#[derive(Clone)]
pub struct FrameNormalizer {
    rules: InAppRules,
    development: bool,
    source_context: Option<SourceContextFetcher>,
    dev_server: Option<Arc<dyn DevServerLocator>>,
}

impl FrameNormalizer {
    pub fn new(rules: InAppRules, development: bool) -> Self {
        Self {
            rules,
            development,
            source_context: None,
            dev_server: None,
        }
    }

    /// Enable source-context fetches against the located dev server.
    pub fn with_source_context(
        mut self,
        fetcher: SourceContextFetcher,
        dev_server: Arc<dyn DevServerLocator>,
    ) -> Self {
        self.source_context = Some(fetcher);
        self.dev_server = Some(dev_server);
        self
    }

    /// Normalize every frame concurrently; output order matches input order.
    pub async fn normalize(&self, frames: Vec<RawStackFrame>) -> Vec<StackFrame> {
        let server = self.context_server();
        let server = server.as_ref();
        join_all(frames.into_iter().map(|raw| self.normalize_one(raw, server))).await
    }

    async fn normalize_one(&self, raw: RawStackFrame, server: Option<&DevServer>) -> StackFrame {
        let mut frame = self.rules.normalize_frame(raw);
        if !frame.is_in_app() {
            return frame;
        }
        if let (Some(fetcher), Some(server)) = (&self.source_context, server) {
            if let Err(e) = fetcher.add_source_context(server, &mut frame).await {
                tracing::warn!(
                    error = %e,
                    filename = frame.filename.as_deref().unwrap_or(""),
                    "Unable to add source context"
                );
            }
        }
        frame
    }

    /// Dev server to fetch context from, only in development builds.
    fn context_server(&self) -> Option<DevServer> {
        if !self.development || self.source_context.is_none() {
            return None;
        }
        match self.dev_server.as_ref().and_then(|l| l.dev_server()) {
            Some(server) if server.bundle_loaded_from_server => Some(server),
            Some(_) => {
                tracing::debug!("Bundle not served by the dev server, skipping source context");
                None
            }
            None => {
                tracing::debug!("Dev server URL unavailable, skipping source context");
                None
            }
        }
    }
}

impl fmt::Debug for FrameNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameNormalizer")
            .field("rules", &self.rules)
            .field("development", &self.development)
            .field("source_context", &self.source_context.is_some())
            .field("dev_server", &self.dev_server.is_some())
            .finish()
    }
}
