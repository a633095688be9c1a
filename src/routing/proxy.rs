//! Proxy path derivation.
//!
//! # Responsibilities
//! - Compute the base URL of a proxied request from `proxy_url`
//! - Derive dev-server proxy paths (`/proxy/api.example.com`) from a base
//!   URL or domain, e.g. for building proxy routing tables
//!
//! # Design Decisions
//! - Proxy paths are always rooted (leading slash)
//! - Only the scheme and one trailing slash are stripped from hosts; ports
//!   and root paths are kept

use crate::config::{ProxyUrl, RequestOptions};
use crate::routing::resolver::is_blank;

/// Base URL of a proxied request.
///
/// Uses the literal `proxy_url`, or the result of calling it with `options`
/// when it is a function, rooted with a leading slash.
pub fn resolve_proxy_base_url(options: &RequestOptions) -> String {
    let proxy_url = match &options.proxy_url {
        Some(ProxyUrl::Static(url)) => url.clone(),
        Some(ProxyUrl::Dynamic(f)) => f(options),
        None => String::new(),
    };

    let proxy_url = proxy_url.trim();
    if proxy_url.starts_with('/') {
        proxy_url.to_string()
    } else {
        format!("/{}", proxy_url)
    }
}

/// Settings for [`proxy_host`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyHostOptions {
    /// Path prefix of the proxy route.
    pub prefix: String,
    /// Fallback host when the options carry no base URL.
    pub domain: Option<String>,
}

impl Default for ProxyHostOptions {
    fn default() -> Self {
        Self {
            prefix: "/proxy".to_string(),
            domain: None,
        }
    }
}

impl ProxyHostOptions {
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }
}

/// Proxy path for the host of `options.base_url` (or `props.domain`).
///
/// Returns the bare prefix when neither is set.
pub fn proxy_host(options: &RequestOptions, props: &ProxyHostOptions) -> String {
    let base_url = if !is_blank(options.base_url.as_deref()) {
        options.base_url.as_deref().unwrap_or_default()
    } else if !is_blank(props.domain.as_deref()) {
        props.domain.as_deref().unwrap_or_default()
    } else {
        return props.prefix.clone();
    };

    let host = base_url
        .strip_prefix("https://")
        .or_else(|| base_url.strip_prefix("http://"))
        .unwrap_or(base_url);
    let host = host.strip_suffix('/').unwrap_or(host);

    format!("{}/{}", props.prefix, host)
}
