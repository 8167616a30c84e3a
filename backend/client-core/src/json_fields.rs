//! Fail-soft accessors for untyped API payloads.
//!
//! API bodies are handled as `serde_json::Value`. These helpers return `None`
//! when a field is missing or has an unexpected type instead of erroring, so
//! callers decide what absence means.

use serde_json::{Map, Value};

pub fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

pub fn get_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

pub fn get_bool(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

pub fn get_object<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}

pub fn get_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(Value::as_array)
}

/// String field, or the `id` of a nested object under the same key.
///
/// Cards report their column either as `column_id` or as `column: {id}`.
pub fn get_nested_id<'a>(value: &'a Value, id_key: &str, object_key: &str) -> Option<&'a str> {
    get_str(value, id_key)
        .filter(|id| !id.is_empty())
        .or_else(|| value.get(object_key).and_then(|inner| get_str(inner, "id")))
        .filter(|id| !id.is_empty())
}
