//! On-device stack symbolication.
//!
//! `DebugSymbolicator` is an integration that installs one event processor.
//! For every event whose hint carries the thrown value it:
//!
//! 1. copies `componentStack` / `jsEngine` into `extra`
//! 2. in development builds, symbolicates against the dev server and drops
//!    internal bridge/renderer frames; otherwise, for engines that need only a
//!    format conversion, normalizes the raw frames directly
//! 3. forces the event platform to `node` so the backend does not re-apply
//!    source maps to frames that are already resolved
//!
//! No failure inside the processor escapes it: the event is always returned.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::capabilities::{DevServerLocator, StackParser, Symbolicator};
use crate::client::{EventProcessor, EventProcessors, Integration};
use crate::event::{ErrorEvent, EventHint, OriginalException, RawStackFrame, PLATFORM_NODE};
use crate::frames::{FrameNormalizer, InAppRules, SourceContextFetcher};
use crate::types::{Error, Result, SymbolicationConfig};

/// Integration name.
pub const INTEGRATION_NAME: &str = "DebugSymbolicator";

/// Event enrichment hook for symbolicated JS stack traces.
#[derive(Clone)]
pub struct DebugSymbolicator {
    stack_parser: Option<Arc<dyn StackParser>>,
    symbolicator: Option<Arc<dyn Symbolicator>>,
    internal_callsites: Regex,
    normalizer: FrameNormalizer,
    development: bool,
}

impl DebugSymbolicator {
    pub fn builder(config: SymbolicationConfig) -> DebugSymbolicatorBuilder {
        DebugSymbolicatorBuilder::new(config)
    }

    /// Enrich `event` using the thrown value carried by `hint`.
    pub async fn enrich(&self, mut event: ErrorEvent, hint: &EventHint) -> ErrorEvent {
        let Some(original) = hint.original_exception.as_ref() else {
            return event;
        };

        let stack = self.parse_stack(original);
        annotate_extra(&mut event, original);

        if self.development {
            if let Some(stack) = stack {
                self.symbolicate(&mut event, &stack).await;
            }
        } else if original
            .js_engine
            .as_ref()
            .is_some_and(|engine| engine.supports_direct_conversion())
        {
            if let Some(stack) = stack {
                let frames = self.normalizer.normalize(stack).await;
                event.replace_frames(frames);
            }
        }

        event.platform = Some(PLATFORM_NODE.to_string());
        event
    }

    fn parse_stack(&self, original: &OriginalException) -> Option<Vec<RawStackFrame>> {
        let Some(parser) = &self.stack_parser else {
            tracing::debug!("No stack parser installed, frames left as captured");
            return None;
        };
        match parser.parse(original) {
            Ok(stack) => Some(stack),
            Err(e) => {
                log_enrichment_failure("Unable to parse stack trace", &e);
                None
            }
        }
    }

    /// Symbolicate on the device through the dev server. Mutates `event`.
    async fn symbolicate(&self, event: &mut ErrorEvent, stack: &[RawStackFrame]) {
        let Some(symbolicator) = &self.symbolicator else {
            tracing::warn!("Unable to symbolicate stack trace: no symbolicator installed");
            return;
        };

        match symbolicator.symbolicate(stack).await {
            Ok(Some(pretty)) => {
                let kept = self.without_internal_callsites(pretty);
                let frames = self.normalizer.normalize(kept).await;
                if !event.replace_frames(frames) {
                    tracing::debug!("Event has no stacktrace, symbolicated frames discarded");
                }
            }
            Ok(None) => tracing::error!("The stack is null"),
            Err(e) => log_enrichment_failure("Unable to symbolicate stack trace", &e),
        }
    }

    /// Drop frames without a file or pointing at framework dispatch internals.
    fn without_internal_callsites(&self, frames: Vec<RawStackFrame>) -> Vec<RawStackFrame> {
        frames
            .into_iter()
            .filter(|frame| {
                frame
                    .file
                    .as_deref()
                    .is_some_and(|file| !self.internal_callsites.is_match(file))
            })
            .collect()
    }
}

/// Expected enrichment failures are warnings; anything else points at a host bug.
fn log_enrichment_failure(context: &str, e: &Error) {
    if e.is_recoverable_enrichment() {
        tracing::warn!(error = %e, "{}: {}", context, e);
    } else {
        tracing::error!(error = %e, "{}: {}", context, e);
    }
}

/// Copy runtime metadata into `extra`. The structured contexts field is not
/// understood by every native agent, so extras are used instead.
fn annotate_extra(event: &mut ErrorEvent, original: &OriginalException) {
    if let Some(component_stack) = &original.component_stack {
        event
            .extra
            .insert("componentStack".to_string(), Value::String(component_stack.clone()));
    }
    if let Some(engine) = &original.js_engine {
        event
            .extra
            .insert("jsEngine".to_string(), Value::String(engine.to_string()));
    }
}

#[async_trait]
impl EventProcessor for DebugSymbolicator {
    async fn process(&self, event: ErrorEvent, hint: &EventHint) -> Option<ErrorEvent> {
        Some(self.enrich(event, hint).await)
    }
}

impl Integration for DebugSymbolicator {
    fn name(&self) -> &'static str {
        INTEGRATION_NAME
    }

    fn setup_once(&self, processors: &mut EventProcessors) {
        processors.push(Arc::new(self.clone()));
    }
}

impl fmt::Debug for DebugSymbolicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSymbolicator")
            .field("stack_parser", &self.stack_parser.is_some())
            .field("symbolicator", &self.symbolicator.is_some())
            .field("internal_callsites", &self.internal_callsites.as_str())
            .field("normalizer", &self.normalizer)
            .field("development", &self.development)
            .finish()
    }
}

/// Builder injecting the host capabilities.
pub struct DebugSymbolicatorBuilder {
    config: SymbolicationConfig,
    stack_parser: Option<Arc<dyn StackParser>>,
    symbolicator: Option<Arc<dyn Symbolicator>>,
    dev_server: Option<Arc<dyn DevServerLocator>>,
}

impl DebugSymbolicatorBuilder {
    pub fn new(config: SymbolicationConfig) -> Self {
        Self {
            config,
            stack_parser: None,
            symbolicator: None,
            dev_server: None,
        }
    }

    pub fn stack_parser(mut self, parser: Arc<dyn StackParser>) -> Self {
        self.stack_parser = Some(parser);
        self
    }

    pub fn symbolicator(mut self, symbolicator: Arc<dyn Symbolicator>) -> Self {
        self.symbolicator = Some(symbolicator);
        self
    }

    pub fn dev_server(mut self, locator: Arc<dyn DevServerLocator>) -> Self {
        self.dev_server = Some(locator);
        self
    }

    pub fn build(self) -> Result<DebugSymbolicator> {
        let internal_callsites = self.config.internal_callsites_regex()?;
        let development = self.config.development;

        let mut normalizer = FrameNormalizer::new(InAppRules::from_config(&self.config), development);
        if let (true, Some(locator)) = (development, self.dev_server) {
            let fetcher = SourceContextFetcher::new(
                self.config.source_fetch_timeout,
                self.config.context_lines,
            )?;
            normalizer = normalizer.with_source_context(fetcher, locator);
        }

        tracing::debug!(
            development,
            stack_parser = self.stack_parser.is_some(),
            symbolicator = self.symbolicator.is_some(),
            "DebugSymbolicator configured"
        );

        Ok(DebugSymbolicator {
            stack_parser: self.stack_parser,
            symbolicator: self.symbolicator,
            internal_callsites,
            normalizer,
            development,
        })
    }
}

impl fmt::Debug for DebugSymbolicatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSymbolicatorBuilder")
            .field("config", &self.config)
            .field("stack_parser", &self.stack_parser.is_some())
            .field("symbolicator", &self.symbolicator.is_some())
            .field("dev_server", &self.dev_server.is_some())
            .finish()
    }
}
