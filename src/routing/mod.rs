//! URL resolution and proxy routing.
//!
//! # Data Flow
//! ```text
//! merged options
//!     → resolver.rs (trim, slash normalization, base + path, query suffix)
//!     → proxy.rs (replace base with proxy path when enabled)
//!     → final URL string
//! ```
//!
//! # Design Decisions
//! - Pure string transforms; no parsing, no network access
//! - Formatting is idempotent so it can run at every stage
//! - Proxying replaces the base URL, never appends to it

pub mod proxy;
pub mod resolver;

pub use proxy::{proxy_host, resolve_proxy_base_url, ProxyHostOptions};
pub use resolver::{build_url, fix_base_url, fix_url, is_blank};
