//! Host-runtime capabilities.
//!
//! The mobile runtime supplies stack parsing, dev-server symbolication and
//! dev-server discovery. Each is injected as an optional trait object when the
//! enrichment hook is built; a missing capability degrades enrichment but never
//! blocks delivery.

mod stack_parser;

pub use stack_parser::StackStringParser;

use async_trait::async_trait;

use crate::event::{OriginalException, RawStackFrame};
use crate::types::Result;

/// Turns a thrown value into raw engine frames, innermost call first.
#[cfg_attr(test, mockall::automock)]
pub trait StackParser: Send + Sync {
    fn parse(&self, exception: &OriginalException) -> Result<Vec<RawStackFrame>>;
}

/// Resolves bundled positions to original source positions via the dev server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Symbolicator: Send + Sync {
    /// `Ok(None)` means the server answered without a stack.
    async fn symbolicate(&self, stack: &[RawStackFrame]) -> Result<Option<Vec<RawStackFrame>>>;
}

/// Locates the local development server.
#[cfg_attr(test, mockall::automock)]
pub trait DevServerLocator: Send + Sync {
    fn dev_server(&self) -> Option<DevServer>;
}

/// Development server the bundle was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServer {
    /// Base URL, including the trailing slash, e.g. `http://localhost:8081/`.
    pub url: String,
    pub bundle_loaded_from_server: bool,
}

impl DevServer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bundle_loaded_from_server: true,
        }
    }
}

/// Locator for a dev server at a fixed address.
#[derive(Debug, Clone)]
pub struct StaticDevServer(pub DevServer);

impl DevServerLocator for StaticDevServer {
    fn dev_server(&self) -> Option<DevServer> {
        Some(self.0.clone())
    }
}
