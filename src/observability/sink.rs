//! Diagnostic sink.
//!
//! Receives dev-mode request/response payloads and every classified
//! failure. The default implementation forwards to `tracing`.

use std::fmt;

use serde_json::Value;

use crate::error::ErrorInfo;
use crate::observability::logging::LogFormat;

/// Destination of diagnostic output.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    /// Log a labelled payload (`"Request"`, `"Response"`).
    fn log(&self, payload: &Value, label: &str);

    /// Log a classified failure.
    fn error(&self, info: &ErrorInfo);
}

/// Sink writing through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    format: LogFormat,
}

impl TracingSink {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }
}

impl DiagnosticSink for TracingSink {
    fn log(&self, payload: &Value, label: &str) {
        tracing::info!(label, payload = %self.format.render(payload), "Diagnostic");
    }

    fn error(&self, info: &ErrorInfo) {
        let payload = serde_json::to_value(info).unwrap_or(Value::Null);
        tracing::error!(
            status = ?info.status(),
            error = %self.format.render(&payload),
            "Request failed"
        );
    }
}
