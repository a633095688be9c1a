//! Transport responses.
//!
//! # Responsibilities
//! - Carry status, headers and decoded body back from the transport
//! - Decode body text according to the requested `ReturnType`
//!
//! # Design Decisions
//! - Bodies that are not valid JSON are kept as text and logged, never
//!   turned into failures

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::ReturnType;

/// Response returned by a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
}

impl TransportResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            data,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decode a response body.
pub fn decode_body(text: String, return_type: ReturnType) -> Value {
    match return_type {
        ReturnType::Text => Value::String(text),
        ReturnType::Json => {
            if text.is_empty() {
                return Value::Null;
            }
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        body_len = text.len(),
                        "Can not parse response data as JSON, keeping raw text"
                    );
                    Value::String(text)
                }
            }
        }
    }
}
