//! Query-string serialization.
//!
//! Nested objects are flattened with dots (`user.name=x`), arrays with
//! indices (`ids[0]=1`, brackets escaped). `null` becomes an empty value and
//! empty containers produce nothing. Keys and values are escaped with the
//! RFC 3986 unreserved set.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Number, Value};

/// Characters escaped in keys and values.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters escaped by the whole-string pass (`encodeURIComponent`).
const URI_COMPONENT: &AsciiSet = &QUERY_COMPONENT
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

/// Serialize a structured value.
///
/// Objects and arrays are flattened into `key=value` pairs joined with `&`;
/// any other top-level value yields an empty string. With `encode` the whole
/// result is percent-encoded once more as a single unit.
pub fn serialize(value: &Value, encode: bool) -> String {
    let mut pairs = Vec::new();
    match value {
        Value::Object(map) => collect_map(map, &mut pairs),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect(i.to_string(), item, &mut pairs);
            }
        }
        _ => {}
    }
    finish(pairs, encode)
}

/// Serialize a query mapping.
pub fn serialize_params(params: &Map<String, Value>, encode: bool) -> String {
    let mut pairs = Vec::new();
    collect_map(params, &mut pairs);
    finish(pairs, encode)
}

fn finish(pairs: Vec<String>, encode: bool) -> String {
    let query = pairs.join("&");
    if encode {
        utf8_percent_encode(&query, URI_COMPONENT).to_string()
    } else {
        query
    }
}

fn collect_map(map: &Map<String, Value>, out: &mut Vec<String>) {
    for (key, value) in map {
        collect(key.clone(), value, out);
    }
}

fn collect(prefix: String, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => out.push(format!("{}=", escape(&prefix))),
        Value::Bool(b) => out.push(format!("{}={}", escape(&prefix), b)),
        Value::Number(n) => out.push(format!("{}={}", escape(&prefix), number_to_string(n))),
        Value::String(s) => out.push(format!("{}={}", escape(&prefix), escape(s))),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect(format!("{}[{}]", prefix, i), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                collect(format!("{}.{}", prefix, key), item, out);
            }
        }
    }
}

fn escape(s: &str) -> String {
    utf8_percent_encode(s, QUERY_COMPONENT).to_string()
}

// Integral floats print without a fraction (`2.0` → `2`).
fn number_to_string(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}
