// Tolerant payload decoding
//
// Unknown fields are ignored, explicit nulls and oddly-typed fields become None.
// A decode failure (None) is reserved for bodies that are not JSON at all or
// whose top-level shape cannot yield the target.

use serde_json::{Map, Value};

use crate::outcome::SamplePayload;

/// Decode a single item: a bare object, or the first element of an array
pub fn decode_sample(text: &str) -> Option<SamplePayload> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(obj) => Some(sample_from_object(&obj)),
        Value::Array(items) => match items.first()? {
            Value::Object(obj) => Some(sample_from_object(obj)),
            _ => None,
        },
        _ => None,
    }
}

/// Decode a collection: an array, or a bare object wrapped into one element
///
/// Array elements that are not objects are skipped.
pub fn decode_sample_list(text: &str) -> Option<Vec<SamplePayload>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(sample_from_object)
                .collect(),
        ),
        Value::Object(obj) => Some(vec![sample_from_object(&obj)]),
        _ => None,
    }
}

fn sample_from_object(obj: &Map<String, Value>) -> SamplePayload {
    SamplePayload {
        id: obj.get("id").and_then(int_field),
        title: obj.get("title").and_then(text_field),
        body: obj.get("body").and_then(text_field),
    }
}

fn int_field(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
