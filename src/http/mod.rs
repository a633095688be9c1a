//! HTTP request pipeline.
//!
//! # Data Flow
//! ```text
//! RequestOptions (call site)
//!     → client.rs (validate, merge over defaults snapshot, format)
//!     → hooks.rs (before-request gate)
//!     → request.rs (proxy base, cache-busting, headers, body encoding)
//!     → dispatch.rs (request interceptor → transport → response interceptor)
//!     → transport.rs (wire call, error classification)
//!     → response.rs (status, headers, decoded body)
//!     → after-response hook or auto-resolve / sink + on-error + reject
//! ```

pub mod client;
pub mod dispatch;
pub mod hooks;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{global, prepare, request, settings, HttpRequest, HttpRequestBuilder};
pub use dispatch::Dispatcher;
pub use hooks::{Canceller, Settle};
pub use request::{normalize, ResolvedRequest, X_REQUESTED_WITH};
pub use response::TransportResponse;
pub use transport::{ReqwestTransport, Transport};
