//! Request URL construction.
//!
//! # Responsibilities
//! - Normalize `base_url` (trim, no trailing slash)
//! - Normalize `url` (trim, exactly one leading slash)
//! - Join them and append the serialized query mapping
//!
//! # Design Decisions
//! - Blank base and path means "nowhere to go": `None`, not an error
//! - Empty strings stay empty; only non-empty paths gain a slash

use crate::codec::serialize_params;
use crate::config::RequestOptions;
use crate::routing::proxy::resolve_proxy_base_url;

/// True for `None`, empty and whitespace-only strings.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|s| s.trim().is_empty()).unwrap_or(true)
}

/// Trim and strip trailing slashes.
pub fn fix_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Trim and ensure exactly one leading slash.
pub fn fix_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    format!("/{}", url.trim_start_matches('/'))
}

/// Compute the navigable URL for `options`.
///
/// Returns `None` when both `base_url` and `url` are blank. When
/// `enable_proxy` is set the base URL is replaced by the proxy base. With
/// `encode` the query string is percent-encoded as one unit.
pub fn build_url(options: &RequestOptions, encode: bool) -> Option<String> {
    if is_blank(options.base_url.as_deref()) && is_blank(options.url.as_deref()) {
        return None;
    }

    let base_url = if options.enable_proxy.unwrap_or(false) {
        resolve_proxy_base_url(options)
    } else {
        options
            .base_url
            .as_deref()
            .map(fix_base_url)
            .unwrap_or_default()
    };

    let mut url = options.url.as_deref().map(fix_url).unwrap_or_default();
    if let Some(params) = options.params.as_ref().filter(|p| !p.is_empty()) {
        url.push('?');
        url.push_str(&serialize_params(params, encode));
    }

    Some(base_url + &url)
}
