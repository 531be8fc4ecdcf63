//! Field remapping and response unwrapping
//!
//! Backends name fields their own way (`full_name`, `createdAt`, ...). A
//! [`FieldMapping`] declares backend name -> local name once per endpoint; it
//! is applied to every decoded object and reversed for outgoing payloads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys probed for a list when the endpoint declares no envelope
pub const DEFAULT_ENVELOPE_KEYS: &[&str] = &["data", "results", "items"];

/// Backend field name -> local field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    fields: IndexMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `backend` to `local`
    pub fn rename(mut self, backend: impl Into<String>, local: impl Into<String>) -> Self {
        self.fields.insert(backend.into(), local.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn local_name<'a>(&'a self, backend: &'a str) -> &'a str {
        self.fields.get(backend).map(String::as_str).unwrap_or(backend)
    }

    pub fn backend_name<'a>(&'a self, local: &'a str) -> &'a str {
        self.fields
            .iter()
            .find(|(_, l)| l.as_str() == local)
            .map(|(b, _)| b.as_str())
            .unwrap_or(local)
    }

    /// Rename keys of a decoded object (or of every object in an array)
    pub fn to_local(&self, value: Value) -> Value {
        self.remap(value, |key| self.local_name(key).to_string())
    }

    /// Rename keys of an outgoing payload
    pub fn to_backend(&self, value: Value) -> Value {
        self.remap(value, |key| self.backend_name(key).to_string())
    }

    fn remap(&self, value: Value, rename: impl Fn(&str) -> String + Copy) -> Value {
        if self.is_empty() {
            return value;
        }
        match value {
            Value::Object(object) => Value::Object(
                object
                    .into_iter()
                    .map(|(key, v)| (rename(&key), v))
                    .collect::<Map<String, Value>>(),
            ),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.remap(v, rename)).collect())
            }
            other => other,
        }
    }
}

/// Pull the record array out of a list response
///
/// With an explicit envelope key only that key is read. Otherwise a bare array
/// is taken as-is and the [`DEFAULT_ENVELOPE_KEYS`] are probed in order.
pub fn unwrap_list(body: Value, envelope: Option<&str>) -> Option<Vec<Value>> {
    match (body, envelope) {
        (Value::Array(items), None) => Some(items),
        (Value::Object(mut object), Some(key)) => match object.remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        (Value::Object(mut object), None) => DEFAULT_ENVELOPE_KEYS
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }),
        _ => None,
    }
}

/// Pull a single record out of a response (`{"data": {...}}` or a bare object)
pub fn unwrap_record(body: Value) -> Value {
    match body {
        Value::Object(mut object) if object.len() == 1 && object.contains_key("data") => {
            object.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Message carried by an error body
///
/// Probes `message`, `error`, `detail` (strings) and then the first entry of
/// `errors` (a string or an object with a `message`).
pub fn error_message(body: &Value) -> Option<String> {
    for key in ["message", "error", "detail"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return Some(text.to_string());
            }
        }
    }

    match body.get("errors")? {
        Value::Array(errors) => errors.first().and_then(|first| match first {
            Value::String(s) => Some(s.clone()),
            other => other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        // {"errors": {"phone": ["taken"]}}
        Value::Object(fields) => fields.values().next().and_then(|v| match v {
            Value::Array(messages) => messages.first().and_then(Value::as_str).map(str::to_string),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }),
        _ => None,
    }
}
