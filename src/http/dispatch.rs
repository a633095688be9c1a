//! Request dispatch and outcome reduction.
//!
//! # Responsibilities
//! - Resolve prepared options and attach the call's cancellation token
//! - Run request/response interceptors around the transport call
//! - Reduce the outcome: after-response hook or auto-resolve on success;
//!   sink, on-error hook and rejection on failure
//! - Record dispatch metrics

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::config::RequestOptions;
use crate::error::{ErrorInfo, RequestResult};
use crate::http::hooks::{settled, Canceller, Settle};
use crate::http::request::{resolve, ResolvedRequest};
use crate::http::response::TransportResponse;
use crate::http::transport::Transport;
use crate::observability::metrics;
use crate::observability::DiagnosticSink;

/// Sends resolved requests and settles their outcome.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { transport, sink }
    }

    /// Resolve `options`, send them and reduce the outcome.
    pub async fn dispatch(&self, options: RequestOptions) -> RequestResult<Value> {
        let start_time = Instant::now();
        let is_dev = options.is_dev.unwrap_or(false);

        if is_dev {
            self.sink.log(&request_summary(&options), "Request");
        }

        let request = resolve(&options);
        let method = request.method;

        tracing::debug!(
            method = %method,
            url = %request.url,
            "Dispatching request"
        );

        match self.send(request, &options).await {
            Ok(response) => {
                metrics::record_request(method.as_str(), metrics::OUTCOME_SUCCESS, start_time);

                if is_dev {
                    self.sink.log(&response.data, "Response");
                }

                match &options.after_response {
                    Some(hook) => {
                        let (settle, rx) = Settle::channel();
                        hook(settle, response.data, &options);
                        settled(rx).await
                    }
                    None => Ok(response.data),
                }
            }
            Err(info) => {
                metrics::record_request(method.as_str(), metrics::outcome_label(&info), start_time);

                self.sink.error(&info);
                if let Some(hook) = &options.on_error {
                    hook(&info);
                }
                Err(info.into())
            }
        }
    }

    /// Interceptors and transport call.
    async fn send(
        &self,
        mut request: ResolvedRequest,
        options: &RequestOptions,
    ) -> Result<TransportResponse, ErrorInfo> {
        if let Some(factory) = &options.cancel {
            let token = CancellationToken::new();
            factory(Canceller::new(token.clone()));
            request.cancel = Some(token);
        }

        if let Some(interceptor) = &options.request_interceptor {
            if let Some(replaced) = interceptor(&request).map_err(ErrorInfo::Transport)? {
                request = replaced;
            }
        }

        let response = self.transport.send(request).await?;

        match &options.response_interceptor {
            Some(interceptor) => Ok(interceptor(&response)
                .map_err(ErrorInfo::Transport)?
                .unwrap_or(response)),
            None => Ok(response),
        }
    }
}

fn request_summary(options: &RequestOptions) -> Value {
    json!({
        "url": options.url,
        "base_url": options.base_url,
        "method": options.method,
        "data": options.data,
        "params": options.params,
    })
}
