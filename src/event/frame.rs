//! Raw engine frames and normalized stack frames.

use serde::{Deserialize, Serialize};

/// Frame as reported by the JS engine or the dev-server symbolicator.
///
/// All fields are optional; engines disagree on which ones they fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStackFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
}

impl RawStackFrame {
    pub fn new(
        file: impl Into<String>,
        method_name: impl Into<String>,
        line_number: u32,
        column: u32,
    ) -> Self {
        Self {
            file: Some(file.into()),
            line_number: Some(line_number),
            column: Some(column),
            method_name: Some(method_name.into()),
        }
    }
}

/// Normalized frame in the reporting backend's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_app: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_line: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_context: Vec<String>,
}

impl StackFrame {
    pub fn is_in_app(&self) -> bool {
        self.in_app.unwrap_or(false)
    }

    pub fn has_context(&self) -> bool {
        self.context_line.is_some()
    }
}
