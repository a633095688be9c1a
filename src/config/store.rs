//! Live defaults.

use std::path::Path;

use arc_swap::ArcSwap;

use crate::config::loader::{load_defaults, ConfigError};
use crate::config::schema::RequestOptions;

/// Holder of the defaults merged beneath every request.
#[derive(Debug)]
pub struct ConfigStore {
    defaults: ArcSwap<RequestOptions>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Store seeded with the built-in defaults.
    pub fn new() -> Self {
        Self::with_defaults(RequestOptions::builtin_defaults())
    }

    /// Store seeded with exactly `defaults`.
    pub fn with_defaults(defaults: RequestOptions) -> Self {
        Self {
            defaults: ArcSwap::from_pointee(defaults),
        }
    }

    /// Built-in defaults updated with the contents of a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file_defaults = load_defaults(path)?;
        let store = Self::new();
        store.update(file_defaults);
        tracing::info!(path = ?path, "Defaults loaded");
        Ok(store)
    }

    /// Shallow-merge `partial` into the defaults.
    pub fn update(&self, partial: RequestOptions) {
        self.defaults.rcu(|current| current.merged_with(&partial));
        tracing::debug!("Defaults updated");
    }

    /// Owned copy of the current defaults.
    pub fn snapshot(&self) -> RequestOptions {
        self.defaults.load().as_ref().clone()
    }
}
