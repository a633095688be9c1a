//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → store.rs (merged over built-in defaults)
//!
//! Per request:
//!     store.rs snapshot (owned copy)
//!     → merged under call-site options
//!     → request pipeline
//!
//! On settings update:
//!     partial options merged into a new snapshot
//!     → atomic swap
//!     → visible to requests started afterwards
//! ```
//!
//! # Design Decisions
//! - Defaults are never reset, only merged into
//! - In-flight requests keep the snapshot they started with
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;

pub use loader::{load_defaults, ConfigError};
pub use schema::{
    ContentType, HttpMethod, ProxyUrl, RequestBody, RequestOptions, ReturnType,
};
pub use store::ConfigStore;
