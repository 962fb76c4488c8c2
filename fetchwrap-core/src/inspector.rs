//! Error-envelope inspection of response bodies.
//!
//! A body is either absent (JSON falsy) or present. A present object with an
//! `errors` key always yields a [`GraphQLError`], even when the list is empty;
//! anything else is a success.

use crate::error::{ErrorCode, FetchError, GraphQLError, Result};
use serde_json::Value;
use tracing::debug;

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `null`, `false`, `0` or `""`.
    Absent,
    Present(Value),
}

impl ResponseBody {
    pub fn from_value(value: Value) -> Self {
        if is_falsy(&value) {
            ResponseBody::Absent
        } else {
            ResponseBody::Present(value)
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map(Self::from_value)
            .map_err(FetchError::Decode)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// One entry of the `errors` list, reduced to the two fields that matter.
#[derive(Debug, Default, PartialEq)]
struct ErrorEntry {
    message: Option<String>,
    code: Option<ErrorCode>,
}

impl ErrorEntry {
    fn from_value(value: &Value) -> Self {
        let message = match value.get("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        let code = value
            .get("extensions")
            .and_then(|ext| ext.get("code"))
            .filter(|code| !is_falsy(code))
            .map(|code| match code {
                Value::String(s) => ErrorCode::Text(s.clone()),
                Value::Number(n) => ErrorCode::Number(n.clone()),
                other => ErrorCode::Text(other.to_string()),
            });
        Self { message, code }
    }
}

/// Derives the normalized error from a parsed body, or `None` on success.
pub fn extract_error(body: &ResponseBody) -> Option<GraphQLError> {
    let value = match body {
        ResponseBody::Absent => return Some(GraphQLError::unknown()),
        ResponseBody::Present(value) => value,
    };

    let errors = value.as_object()?.get("errors")?;
    let entries: Vec<ErrorEntry> = errors
        .as_array()
        .map(|list| list.iter().map(ErrorEntry::from_value).collect())
        .unwrap_or_default();

    let joined: String = entries
        .iter()
        .filter_map(|entry| entry.message.as_deref())
        .collect();
    let message = if joined.is_empty() {
        errors.to_string()
    } else {
        joined
    };

    let status_code = entries
        .first()
        .and_then(|entry| entry.code.clone())
        .unwrap_or_else(ErrorCode::fallback);

    debug!(count = entries.len(), code = %status_code, "error envelope found");
    Some(GraphQLError::new(message, status_code))
}

/// Parses `bytes` as JSON and extracts the normalized error.
pub fn inspect(bytes: &[u8]) -> Result<Option<GraphQLError>> {
    let body = ResponseBody::parse(bytes)?;
    Ok(extract_error(&body))
}
