//! Source context for in-app frames.
//!
//! Fetches the original file from the dev server and attaches the lines
//! around the reported position.

use std::time::Duration;

use crate::capabilities::DevServer;
use crate::event::StackFrame;
use crate::types::{Error, Result};

/// Lines up to this length are attached verbatim.
const MAX_LINE_LEN: usize = 150;
/// Width of the window kept from longer lines.
const SNIP_WINDOW: usize = 140;

/// Strip directory components (and trailing slashes) from a frame filename.
pub fn bare_filename(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Attach up to `context_lines` lines around `frame.lineno` from `lines`.
///
/// The line index is clamped into the file, so a line number past the end
/// points at the last line and a missing one at the first.
pub fn add_context_to_frame(lines: &[&str], frame: &mut StackFrame, context_lines: usize) {
    if lines.is_empty() {
        return;
    }
    let max = lines.len();
    let lineno = frame.lineno.unwrap_or(0) as usize;
    let source_line = lineno.saturating_sub(1).min(max);

    frame.pre_context = lines[source_line.saturating_sub(context_lines)..source_line]
        .iter()
        .map(|l| snip_line(l, 0))
        .collect();

    let colno = frame.colno.unwrap_or(0) as usize;
    frame.context_line = Some(snip_line(lines[source_line.min(max - 1)], colno));

    let post_start = (source_line + 1).min(max);
    let post_end = (source_line + 1 + context_lines).min(max);
    frame.post_context = lines[post_start..post_end.max(post_start)]
        .iter()
        .map(|l| snip_line(l, 0))
        .collect();
}

/// Cut long lines down to a window around `colno`, marking the cuts with `{snip}`.
pub fn snip_line(line: &str, colno: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    if len <= MAX_LINE_LEN {
        return line.to_string();
    }

    let colno = colno.min(len);
    let mut start = colno.saturating_sub(60);
    if start < 5 {
        start = 0;
    }
    let mut end = (start + SNIP_WINDOW).min(len);
    if end > len - 5 {
        end = len;
    }
    if end == len {
        start = end.saturating_sub(SNIP_WINDOW);
    }

    let mut out: String = chars[start..end].iter().collect();
    if start > 0 {
        out = format!("{{snip}} {}", out);
    }
    if end < len {
        out.push_str(" {snip}");
    }
    out
}

/// HTTP fetcher for dev-server source files.
#[derive(Debug, Clone)]
pub struct SourceContextFetcher {
    http: reqwest::Client,
    context_lines: usize,
}

impl SourceContextFetcher {
    pub fn new(timeout: Duration, context_lines: usize) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            context_lines,
        })
    }

    /// URL the dev server serves `filename` under.
    pub fn source_url(server: &DevServer, filename: &str) -> String {
        format!("{}{}", server.url, bare_filename(filename))
    }

    /// GET the frame's source file and attach its context lines.
    pub async fn add_source_context(&self, server: &DevServer, frame: &mut StackFrame) -> Result<()> {
        let filename = frame
            .filename
            .as_deref()
            .ok_or_else(|| Error::source_context("frame has no filename"))?;
        let url = Self::source_url(server, filename);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_context(format!(
                "GET {} returned {}",
                url, status
            )));
        }
        let content = response.text().await?;
        let lines: Vec<&str> = content.split('\n').collect();

        tracing::trace!(url = %url, lines = lines.len(), "Fetched source for frame");
        add_context_to_frame(&lines, frame, self.context_lines);
        Ok(())
    }
}
