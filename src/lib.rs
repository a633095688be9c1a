//! Configurable HTTP request facade.
//!
//! Resolves declarative request options (merged over process-wide
//! defaults) into a concrete request, routes it through an optional local
//! proxy path, runs user hooks around an injected transport and reduces the
//! outcome to a single `Result`.

pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::{ConfigStore, RequestOptions};
pub use error::{ErrorInfo, RequestError, RequestResult};
pub use http::{prepare, request, settings, HttpRequest};
pub use routing::{proxy_host, ProxyHostOptions};
