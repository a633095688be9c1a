//! Request option definitions.
//!
//! `RequestOptions` is both the call-site input and the shape of the
//! process-wide defaults. Every field is optional so that a merge can tell
//! "unset" apart from "set to the default value". Data fields derive Serde
//! traits for loading defaults from config files; hooks are never
//! deserialized.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http::hooks::{
    AfterResponseHook, BeforeRequestHook, CancelFactory, OnErrorHook, RequestInterceptor,
    ResponseInterceptor,
};

/// HTTP method of a request.
///
/// Parsed case-insensitively; rendered upper-case on the wire and
/// lower-case in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// Error returned when a method name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct InvalidMethod(pub String);

impl HttpMethod {
    /// Lower-case name, as used in formatted options.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            _ => Err(InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = InvalidMethod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared content type of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlencoded,
    /// `multipart/form-data`
    Multipart,
    /// `text/plain`
    Text,
    /// Any other MIME type, stored lower-cased.
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Json => "application/json",
            ContentType::FormUrlencoded => "application/x-www-form-urlencoded",
            ContentType::Multipart => "multipart/form-data",
            ContentType::Text => "text/plain",
            ContentType::Other(mime) => mime,
        }
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        let mime = value.trim().to_ascii_lowercase();
        match mime.as_str() {
            "application/json" => ContentType::Json,
            "application/x-www-form-urlencoded" => ContentType::FormUrlencoded,
            "multipart/form-data" => ContentType::Multipart,
            "text/plain" => ContentType::Text,
            _ => ContentType::Other(mime),
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        ContentType::from(value.as_str())
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.as_str().to_string()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the transport decodes a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Parse as JSON, keeping the raw text when it is not valid JSON.
    #[default]
    Json,
    /// Keep the raw text.
    Text,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RequestBody {
    /// Structured value, sent as JSON or form-encoded depending on the
    /// content type.
    Json(Value),
    /// Pre-built form pairs. Never re-encoded.
    Form(Vec<(String, String)>),
    /// Already encoded body text.
    Encoded(String),
}

impl RequestBody {
    /// True when there is nothing worth sending.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Json(value) => match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                _ => false,
            },
            RequestBody::Form(pairs) => pairs.is_empty(),
            RequestBody::Encoded(text) => text.is_empty(),
        }
    }
}

impl Serialize for RequestBody {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequestBody::Json(value) => value.serialize(serializer),
            RequestBody::Form(pairs) => serializer.collect_map(pairs.iter().map(|(k, v)| (k, v))),
            RequestBody::Encoded(text) => serializer.serialize_str(text),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Function computing a proxy base URL from the effective options.
pub type ProxyUrlFn = Arc<dyn Fn(&RequestOptions) -> String + Send + Sync>;

/// Where proxied requests are sent.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub enum ProxyUrl {
    Static(String),
    Dynamic(ProxyUrlFn),
}

impl ProxyUrl {
    /// Build a dynamic proxy URL from a closure.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&RequestOptions) -> String + Send + Sync + 'static,
    {
        ProxyUrl::Dynamic(Arc::new(f))
    }
}

impl From<String> for ProxyUrl {
    fn from(value: String) -> Self {
        ProxyUrl::Static(value)
    }
}

impl From<&str> for ProxyUrl {
    fn from(value: &str) -> Self {
        ProxyUrl::Static(value.to_string())
    }
}

impl fmt::Debug for ProxyUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyUrl::Static(url) => f.debug_tuple("Static").field(url).finish(),
            ProxyUrl::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

/// Options describing a request, or the defaults merged beneath it.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Request path, joined onto `base_url`.
    pub url: Option<String>,

    /// Origin and root path of the target service.
    pub base_url: Option<String>,

    pub method: Option<HttpMethod>,

    /// Extra request headers. Replaced as a whole on merge.
    pub headers: Option<BTreeMap<String, String>>,

    /// Query mapping. Replaced as a whole on merge.
    pub params: Option<Map<String, Value>>,

    pub data: Option<RequestBody>,

    pub content_type: Option<ContentType>,

    /// Allow caching; when false a `t` timestamp is added to the query.
    pub cache: Option<bool>,

    pub return_type: Option<ReturnType>,

    /// Route the request through `proxy_url` instead of `base_url`.
    pub enable_proxy: Option<bool>,

    pub proxy_url: Option<ProxyUrl>,

    /// Log requests and responses through the diagnostic sink.
    pub is_dev: Option<bool>,

    /// Additional transport options, merged per key.
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub cancel: Option<CancelFactory>,

    #[serde(skip)]
    pub before_request: Option<BeforeRequestHook>,

    #[serde(skip)]
    pub request_interceptor: Option<RequestInterceptor>,

    #[serde(skip)]
    pub response_interceptor: Option<ResponseInterceptor>,

    #[serde(skip)]
    pub after_response: Option<AfterResponseHook>,

    #[serde(skip)]
    pub on_error: Option<OnErrorHook>,
}

impl RequestOptions {
    /// Options for a request to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// The built-in defaults every store starts from.
    pub fn builtin_defaults() -> Self {
        Self {
            method: Some(HttpMethod::Get),
            content_type: Some(ContentType::Json),
            return_type: Some(ReturnType::Json),
            proxy_url: Some(ProxyUrl::from("/proxy")),
            enable_proxy: Some(false),
            is_dev: Some(false),
            ..Self::default()
        }
    }

    /// True when no field at all is set.
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.base_url.is_none()
            && self.method.is_none()
            && self.headers.is_none()
            && self.params.is_none()
            && self.data.is_none()
            && self.content_type.is_none()
            && self.cache.is_none()
            && self.return_type.is_none()
            && self.enable_proxy.is_none()
            && self.proxy_url.is_none()
            && self.is_dev.is_none()
            && self.extra.is_empty()
            && self.cancel.is_none()
            && self.before_request.is_none()
            && self.request_interceptor.is_none()
            && self.response_interceptor.is_none()
            && self.after_response.is_none()
            && self.on_error.is_none()
    }

    /// Shallow merge: every field set in `over` wins, the rest comes from
    /// `self`. Neither input is modified.
    pub fn merged_with(&self, over: &RequestOptions) -> RequestOptions {
        let mut extra = self.extra.clone();
        for (key, value) in &over.extra {
            extra.insert(key.clone(), value.clone());
        }

        RequestOptions {
            url: over.url.clone().or_else(|| self.url.clone()),
            base_url: over.base_url.clone().or_else(|| self.base_url.clone()),
            method: over.method.or(self.method),
            headers: over.headers.clone().or_else(|| self.headers.clone()),
            params: over.params.clone().or_else(|| self.params.clone()),
            data: over.data.clone().or_else(|| self.data.clone()),
            content_type: over
                .content_type
                .clone()
                .or_else(|| self.content_type.clone()),
            cache: over.cache.or(self.cache),
            return_type: over.return_type.or(self.return_type),
            enable_proxy: over.enable_proxy.or(self.enable_proxy),
            proxy_url: over.proxy_url.clone().or_else(|| self.proxy_url.clone()),
            is_dev: over.is_dev.or(self.is_dev),
            extra,
            cancel: over.cancel.clone().or_else(|| self.cancel.clone()),
            before_request: over
                .before_request
                .clone()
                .or_else(|| self.before_request.clone()),
            request_interceptor: over
                .request_interceptor
                .clone()
                .or_else(|| self.request_interceptor.clone()),
            response_interceptor: over
                .response_interceptor
                .clone()
                .or_else(|| self.response_interceptor.clone()),
            after_response: over
                .after_response
                .clone()
                .or_else(|| self.after_response.clone()),
            on_error: over.on_error.clone().or_else(|| self.on_error.clone()),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn data(mut self, data: impl Into<RequestBody>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<ContentType>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn enable_proxy(mut self, enable: bool) -> Self {
        self.enable_proxy = Some(enable);
        self
    }

    pub fn proxy_url(mut self, proxy_url: impl Into<ProxyUrl>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn dev(mut self, is_dev: bool) -> Self {
        self.is_dev = Some(is_dev);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("url", &self.url)
            .field("base_url", &self.base_url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("data", &self.data)
            .field("content_type", &self.content_type)
            .field("cache", &self.cache)
            .field("return_type", &self.return_type)
            .field("enable_proxy", &self.enable_proxy)
            .field("proxy_url", &self.proxy_url)
            .field("is_dev", &self.is_dev)
            .field("extra", &self.extra)
            .field("cancel", &self.cancel.is_some())
            .field("before_request", &self.before_request.is_some())
            .field("request_interceptor", &self.request_interceptor.is_some())
            .field("response_interceptor", &self.response_interceptor.is_some())
            .field("after_response", &self.after_response.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
