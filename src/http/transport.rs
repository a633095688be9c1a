//! Wire transport.
//!
//! # Responsibilities
//! - Define the `Transport` seam the dispatcher calls
//! - Perform resolved requests with `reqwest`
//! - Classify failures once: server status vs. transport error
//!
//! # Design Decisions
//! - Relative (proxy) URLs are resolved against a configured origin
//! - Cancellation races the whole call; a cancelled call is a transport error
//! - Unknown extra options are ignored, not rejected

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use url::Url;

use crate::config::{HttpMethod, RequestBody};
use crate::error::ErrorInfo;
use crate::http::request::ResolvedRequest;
use crate::http::response::{decode_body, TransportResponse};

/// Extra option: per-request timeout in milliseconds.
pub const TIMEOUT_OPTION: &str = "timeout";

/// Performs the network call for a resolved request.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `request`. Non-2xx answers are `ErrorInfo::Server`.
    async fn send(&self, request: ResolvedRequest) -> Result<TransportResponse, ErrorInfo>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
    origin: Option<Url>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            origin: None,
        }
    }

    /// Origin that relative URLs (such as proxy paths) are resolved against.
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// Absolute target URL of `request`, query string included.
    pub fn target_url(&self, request: &ResolvedRequest) -> Result<Url, ErrorInfo> {
        let full_url = request.full_url();
        match Url::parse(&full_url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.origin {
                Some(origin) => origin.join(&full_url).map_err(|e| {
                    ErrorInfo::Transport(format!("Invalid URL '{}': {}", full_url, e))
                }),
                None => Err(ErrorInfo::Transport(format!(
                    "Relative URL '{}' requires an origin",
                    full_url
                ))),
            },
            Err(e) => Err(ErrorInfo::Transport(format!(
                "Invalid URL '{}': {}",
                full_url, e
            ))),
        }
    }

    fn build(&self, request: &ResolvedRequest) -> Result<reqwest::RequestBuilder, ErrorInfo> {
        let url = self.target_url(request)?;
        let mut builder = self.client.request(to_method(request.method), url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(pairs)) => builder.form(pairs),
            Some(RequestBody::Encoded(text)) => builder.body(text.clone()),
            None => builder,
        };

        for (key, value) in &request.extra {
            match key.as_str() {
                TIMEOUT_OPTION => match value.as_u64() {
                    Some(ms) if ms > 0 => builder = builder.timeout(Duration::from_millis(ms)),
                    _ => tracing::warn!(value = %value, "Ignoring invalid timeout option"),
                },
                _ => tracing::debug!(option = %key, "Ignoring unsupported transport option"),
            }
        }

        Ok(builder)
    }

    async fn execute(&self, request: ResolvedRequest) -> Result<TransportResponse, ErrorInfo> {
        let builder = self.build(&request)?;
        let response = builder
            .send()
            .await
            .map_err(|e| ErrorInfo::Transport(describe(&e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let text = response
            .text()
            .await
            .map_err(|e| ErrorInfo::Transport(describe(&e)))?;

        let response = TransportResponse {
            status,
            headers,
            data: decode_body(text, request.return_type),
        };

        if response.is_success() {
            Ok(response)
        } else {
            Err(ErrorInfo::Server(response))
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ResolvedRequest) -> Result<TransportResponse, ErrorInfo> {
        match request.cancel.clone() {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ErrorInfo::Transport("Request cancelled".to_string())),
                    result = self.execute(request) => result,
                }
            }
            None => self.execute(request).await,
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

/// An error with its source chain, `outer: inner: root`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}
