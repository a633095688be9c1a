//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request pipeline produces:
//!     → logging.rs (subscriber setup, payload formatting strategy)
//!     → sink.rs (dev-mode request/response logs, classified errors)
//!     → metrics.rs (request counters, latency histogram)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → any installed `metrics` recorder
//! ```
//!
//! # Design Decisions
//! - Structured `tracing` events everywhere; the sink is the only place
//!   that renders payloads
//! - Payload rendering is chosen once, at construction
//! - Metrics are no-ops until the embedding application installs a recorder

pub mod logging;
pub mod metrics;
pub mod sink;

pub use logging::LogFormat;
pub use sink::{DiagnosticSink, TracingSink};
