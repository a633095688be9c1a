//! Body and query encoding.
//!
//! # Data Flow
//! ```text
//! params (JSON object)            data (JSON value, form-urlencoded POST)
//!     → query.rs (dot-notation pairs, RFC 3986 escaping)
//!     → optional whole-string encodeURIComponent pass
//!     → query suffix / request body
//! ```
//!
//! # Design Decisions
//! - Encoding is a pure function: identical input, identical output
//! - Only serialization lives here; responses are decoded by the transport

pub mod query;

pub use query::{serialize, serialize_params};
