//! Request normalization.
//!
//! # Responsibilities
//! - Reject calls without options or without a url
//! - Merge call options over a defaults snapshot and fix their formatting
//! - Resolve the transport-ready request: proxy base, cache-busting
//!   timestamp, marker header, content type, body encoding
//!
//! # Design Decisions
//! - The merge produces a new value; defaults are never aliased
//! - Resolution is split from preparation so the before-request hook sees
//!   formatted options and its output is resolved afterwards
//! - Caller headers are kept; the marker header is added on top

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::codec::{serialize, serialize_params};
use crate::config::{ContentType, HttpMethod, RequestBody, RequestOptions, ReturnType};
use crate::error::RequestError;
use crate::routing::{fix_base_url, fix_url, is_blank, resolve_proxy_base_url};

/// Header marking requests as programmatic.
pub const X_REQUESTED_WITH: &str = "X-Requested-With";

pub const CONTENT_TYPE: &str = "Content-Type";

/// Query key of the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "t";

/// A fully resolved, transport-ready request.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    /// Base URL joined with the path, without query string.
    pub url: String,
    pub params: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
    pub return_type: ReturnType,
    /// Additional transport options.
    pub extra: Map<String, Value>,
    /// Cancellation token of the call, attached at dispatch.
    pub cancel: Option<CancellationToken>,
}

impl ResolvedRequest {
    /// Serialized query mapping, empty when there are no params.
    pub fn query_string(&self) -> String {
        serialize_params(&self.params, false)
    }

    /// The URL with its query string.
    pub fn full_url(&self) -> String {
        if self.params.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, self.query_string())
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Mandatory-field checks on the raw call options.
pub fn validate(options: &RequestOptions) -> Result<(), RequestError> {
    if options.is_empty() {
        return Err(RequestError::OptionsRequired);
    }
    if is_blank(options.url.as_deref()) {
        return Err(RequestError::UrlRequired);
    }
    Ok(())
}

/// Fix URL slashes in place. Content types are lower-cased when built.
pub fn format_options(options: &mut RequestOptions) {
    options.base_url = options.base_url.as_deref().map(fix_base_url);
    options.url = options.url.as_deref().map(fix_url);
}

/// Validate, merge over `defaults` and format.
pub fn prepare_options(
    defaults: &RequestOptions,
    call: &RequestOptions,
) -> Result<RequestOptions, RequestError> {
    validate(call)?;
    let mut effective = defaults.merged_with(call);
    format_options(&mut effective);
    Ok(effective)
}

/// Resolve prepared options into a transport-ready request.
pub fn resolve(options: &RequestOptions) -> ResolvedRequest {
    let method = options.method.unwrap_or(HttpMethod::Get);

    let base_url = if options.enable_proxy.unwrap_or(false) {
        resolve_proxy_base_url(options)
    } else {
        options
            .base_url
            .as_deref()
            .map(fix_base_url)
            .unwrap_or_default()
    };
    let url = base_url + &options.url.as_deref().map(fix_url).unwrap_or_default();

    let mut params = options.params.clone().unwrap_or_default();
    if !options.cache.unwrap_or(false) {
        params.insert(CACHE_BUST_PARAM.to_string(), Value::from(timestamp_millis()));
    }

    let mut headers = options.headers.clone().unwrap_or_default();
    set_header(&mut headers, X_REQUESTED_WITH, "XMLHttpRequest");

    let mut body = options.data.clone();
    if method == HttpMethod::Post {
        if let Some(content_type) = &options.content_type {
            set_header(&mut headers, CONTENT_TYPE, content_type.as_str());

            if *content_type == ContentType::FormUrlencoded {
                let encoded = match body.as_ref().filter(|b| !b.is_empty()) {
                    Some(RequestBody::Json(value)) => Some(serialize(value, false)),
                    _ => None,
                };
                if let Some(encoded) = encoded {
                    body = Some(RequestBody::Encoded(encoded));
                }
            }
        }
    }

    ResolvedRequest {
        method,
        url,
        params,
        headers,
        body,
        return_type: options.return_type.unwrap_or_default(),
        extra: options.extra.clone(),
        cancel: None,
    }
}

/// Validate, merge, format and resolve in one step, without hooks.
pub fn normalize(
    defaults: &RequestOptions,
    call: &RequestOptions,
) -> Result<ResolvedRequest, RequestError> {
    let options = prepare_options(defaults, call)?;
    Ok(resolve(&options))
}

/// Set `name`, replacing any existing header of the same name in any case.
fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
