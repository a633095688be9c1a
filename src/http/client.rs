//! Request facade.
//!
//! # Responsibilities
//! - Own the defaults store, transport and diagnostic sink
//! - Run the pipeline: validate → merge → format → before-request → dispatch
//! - Compute navigable URLs without sending anything (`prepare`)
//! - Provide a process-wide instance behind free functions

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::config::{ConfigStore, RequestOptions};
use crate::error::RequestResult;
use crate::http::dispatch::Dispatcher;
use crate::http::hooks::{settled, Settle};
use crate::http::request::{format_options, prepare_options};
use crate::http::transport::{ReqwestTransport, Transport};
use crate::observability::{DiagnosticSink, LogFormat, TracingSink};
use crate::routing::{build_url, is_blank};

/// Configurable HTTP request facade.
#[derive(Debug)]
pub struct HttpRequest {
    store: ConfigStore,
    dispatcher: Dispatcher,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequest {
    /// Facade with built-in defaults, the reqwest transport and a tracing sink.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Merge `partial` into the defaults used by subsequent requests.
    pub fn settings(&self, partial: RequestOptions) {
        self.store.update(partial);
    }

    /// Copy of the current defaults.
    pub fn defaults(&self) -> RequestOptions {
        self.store.snapshot()
    }

    /// The URL `options` would navigate to, or `None` when neither a base
    /// URL nor a path is given. No cache-busting parameter is added.
    pub fn prepare(&self, options: &RequestOptions, encode: bool) -> Option<String> {
        if options.is_empty() {
            return None;
        }
        if is_blank(options.base_url.as_deref()) && is_blank(options.url.as_deref()) {
            return None;
        }

        let mut effective = self.store.snapshot().merged_with(options);
        format_options(&mut effective);
        build_url(&effective, encode)
    }

    /// Perform a request and return the response data.
    ///
    /// Fails with `OptionsRequired`/`UrlRequired` before any network
    /// activity, with `Rejected` when a hook rejects, and with `Server` or
    /// `Transport` for classified transport failures.
    pub async fn request(&self, options: RequestOptions) -> RequestResult<Value> {
        let options = match prepare_options(&self.store.snapshot(), &options) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected request options");
                return Err(e);
            }
        };

        let options = match options.before_request.clone() {
            Some(hook) => {
                let (settle, rx) = Settle::channel();
                hook(settle, options);
                settled(rx).await?
            }
            None => options,
        };

        self.dispatcher.dispatch(options).await
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug, Default)]
pub struct HttpRequestBuilder {
    defaults: Option<RequestOptions>,
    transport: Option<Arc<dyn Transport>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    log_format: LogFormat,
}

impl HttpRequestBuilder {
    /// Defaults merged over the built-in ones.
    pub fn defaults(mut self, defaults: RequestOptions) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Payload format of the default tracing sink.
    pub fn log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    pub fn build(self) -> HttpRequest {
        let store = ConfigStore::new();
        if let Some(defaults) = self.defaults {
            store.update(defaults);
        }

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::new(self.log_format)));

        HttpRequest {
            store,
            dispatcher: Dispatcher::new(transport, sink),
        }
    }
}

static GLOBAL: OnceLock<HttpRequest> = OnceLock::new();

/// The process-wide facade behind the free functions.
pub fn global() -> &'static HttpRequest {
    GLOBAL.get_or_init(HttpRequest::new)
}

/// Update the process-wide defaults.
pub fn settings(partial: RequestOptions) {
    global().settings(partial);
}

/// [`HttpRequest::prepare`] on the process-wide facade.
pub fn prepare(options: &RequestOptions, encode: bool) -> Option<String> {
    global().prepare(options, encode)
}

/// [`HttpRequest::request`] on the process-wide facade.
pub async fn request(options: RequestOptions) -> RequestResult<Value> {
    global().request(options).await
}
