//! Defaults validation.
//!
//! # Responsibilities
//! - Semantic validation of loaded defaults (serde handles syntactic)
//! - Check that an enabled proxy has somewhere to go
//! - Check base URL shape and scheme
//! - Check transport option values
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: RequestOptions → Result<(), Vec<ValidationError>>
//! - Only runs on file-loaded defaults; runtime updates are trusted

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyUrl, RequestOptions};
use crate::http::transport::TIMEOUT_OPTION;

/// A semantic problem in loaded defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("proxy_url must not be blank when enable_proxy is set")]
    BlankProxyUrl,

    #[error("base_url '{0}' contains whitespace")]
    BaseUrlWhitespace(String),

    #[error("base_url '{url}' uses unsupported scheme '{scheme}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("timeout must be a positive number of milliseconds, got {0}")]
    InvalidTimeout(String),
}

/// Validate defaults, collecting every problem found.
pub fn validate_defaults(options: &RequestOptions) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if options.enable_proxy.unwrap_or(false) {
        let blank = match &options.proxy_url {
            Some(ProxyUrl::Static(url)) => url.trim().is_empty(),
            Some(ProxyUrl::Dynamic(_)) => false,
            None => true,
        };
        if blank {
            errors.push(ValidationError::BlankProxyUrl);
        }
    }

    if let Some(base_url) = &options.base_url {
        if let Err(e) = check_base_url(base_url.trim()) {
            errors.push(e);
        }
    }

    if let Some(timeout) = options.extra.get(TIMEOUT_OPTION) {
        if !matches!(timeout.as_u64(), Some(ms) if ms > 0) {
            errors.push(ValidationError::InvalidTimeout(timeout.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(base_url: &str) -> Result<(), ValidationError> {
    if base_url.chars().any(char::is_whitespace) {
        return Err(ValidationError::BaseUrlWhitespace(base_url.to_string()));
    }

    // Relative roots and bare hosts are joined as-is.
    if !base_url.contains("://") {
        return Ok(());
    }

    let url = Url::parse(base_url).map_err(|e| ValidationError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::UnsupportedScheme {
            url: base_url.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}
