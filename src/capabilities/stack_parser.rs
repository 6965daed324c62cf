//! Fallback stack parser for the textual `stack` property.
//!
//! Handles the two line shapes mobile JS engines emit:
//! ```text
//!     at method (file:line:col)        V8 / Hermes
//!     at file:line:col
//! method@file:line:col                 JavaScriptCore
//! ```
//! Hermes release builds prefix locations with `address at `; engine-internal
//! frames show up as `native` or `[native code]`.

use super::StackParser;
use crate::event::{OriginalException, RawStackFrame};
use crate::types::{Error, Result};

const NATIVE_CODE: &str = "[native code]";

/// Parses `OriginalException::stack` line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackStringParser;

impl StackParser for StackStringParser {
    fn parse(&self, exception: &OriginalException) -> Result<Vec<RawStackFrame>> {
        let stack = exception
            .stack
            .as_deref()
            .ok_or_else(|| Error::stack_parse("exception has no stack"))?;
        Ok(stack.lines().filter_map(parse_line).collect())
    }
}

fn parse_line(line: &str) -> Option<RawStackFrame> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("at ") {
        return Some(parse_v8_frame(rest.trim()));
    }
    let (method, location) = line.split_once('@')?;
    let mut frame = parse_location(location);
    if !method.is_empty() {
        frame.method_name = Some(method.to_string());
    }
    Some(frame)
}

fn parse_v8_frame(rest: &str) -> RawStackFrame {
    match rest.strip_suffix(')').and_then(|r| r.rsplit_once(" (")) {
        Some((method, location)) => {
            let mut frame = parse_location(location);
            frame.method_name = Some(method.to_string());
            frame
        }
        None => parse_location(rest),
    }
}

fn parse_location(location: &str) -> RawStackFrame {
    let location = location.strip_prefix("address at ").unwrap_or(location);
    if location == "native" || location == NATIVE_CODE {
        return RawStackFrame {
            file: Some(NATIVE_CODE.to_string()),
            ..RawStackFrame::default()
        };
    }

    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let head = parts.next();
    match (head, middle.and_then(|m| m.parse().ok()), last.and_then(|l| l.parse().ok())) {
        (Some(file), Some(line), Some(column)) => RawStackFrame {
            file: Some(file.to_string()),
            line_number: Some(line),
            column: Some(column),
            method_name: None,
        },
        _ => match location.rsplit_once(':') {
            Some((file, line)) if line.parse::<u32>().is_ok() => RawStackFrame {
                file: Some(file.to_string()),
                line_number: line.parse().ok(),
                ..RawStackFrame::default()
            },
            _ => RawStackFrame {
                file: Some(location.to_string()),
                ..RawStackFrame::default()
            },
        },
    }
}
