//! Messages a tool yields back to the host

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key-value mapping the host hands to providers and tools
pub type ParameterMap = serde_json::Map<String, Value>;

/// A single message produced by a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ToolMessage {
    /// Human-readable text shown to the end user
    Text(String),
    /// Structured result object
    Json(Value),
    /// Named variable exposed to downstream workflow steps
    Variable { name: String, value: Value },
}

impl ToolMessage {
    pub fn text(text: impl Into<String>) -> Self {
        ToolMessage::Text(text.into())
    }

    pub fn json(value: Value) -> Self {
        ToolMessage::Json(value)
    }

    pub fn variable(name: impl Into<String>, value: impl Into<Value>) -> Self {
        ToolMessage::Variable {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolMessage::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ToolMessage::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Read a string parameter, treating missing, non-string and blank values as absent
pub fn string_param(params: &ParameterMap, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a string parameter verbatim, treating missing, non-string and blank values as absent
pub fn raw_string_param(params: &ParameterMap, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
