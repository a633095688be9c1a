//! Request lifecycle hooks.
//!
//! # Responsibilities
//! - Define the hook function types carried by `RequestOptions`
//! - Provide `Settle`, the single-use resolve/reject continuation handed to
//!   `before_request` and `after_response`
//! - Provide `Canceller`, handed to the `cancel` factory
//!
//! # Design Decisions
//! - A hook that receives a `Settle` owns the outcome of the call; the
//!   pipeline waits until it is used
//! - `Settle` is consumed on use, so a call settles at most once
//! - A `Settle` dropped unused leaves the call pending
//! - Interceptors return `Ok(None)` to keep the value they were given

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::config::RequestOptions;
use crate::error::{ErrorInfo, RequestError};
use crate::http::request::ResolvedRequest;
use crate::http::response::TransportResponse;

/// Runs before dispatch; settles with the options to send.
pub type BeforeRequestHook = Arc<dyn Fn(Settle<RequestOptions>, RequestOptions) + Send + Sync>;

/// Rewrites the outgoing request right before the transport call.
pub type RequestInterceptor =
    Arc<dyn Fn(&ResolvedRequest) -> Result<Option<ResolvedRequest>, String> + Send + Sync>;

/// Rewrites the raw transport response before it is reduced.
pub type ResponseInterceptor =
    Arc<dyn Fn(&TransportResponse) -> Result<Option<TransportResponse>, String> + Send + Sync>;

/// Takes over resolution of a successful call.
pub type AfterResponseHook = Arc<dyn Fn(Settle<Value>, Value, &RequestOptions) + Send + Sync>;

/// Observes classified failures.
pub type OnErrorHook = Arc<dyn Fn(&ErrorInfo) + Send + Sync>;

/// Receives the canceller of each call.
pub type CancelFactory = Arc<dyn Fn(Canceller) + Send + Sync>;

/// Resolve/reject continuation of a pending call.
#[derive(Debug)]
pub struct Settle<T> {
    tx: oneshot::Sender<Result<T, RequestError>>,
}

impl<T> Settle<T> {
    /// Create a continuation and the receiver the pipeline waits on.
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<T, RequestError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Continue with `value`.
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Abort with a caller-supplied reason, passed through verbatim.
    pub fn reject(self, reason: impl Into<Value>) {
        let _ = self.tx.send(Err(RequestError::Rejected(reason.into())));
    }

    /// Abort with an already classified error.
    pub fn fail(self, error: RequestError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Wait for a continuation to be used.
///
/// Never completes if the `Settle` is dropped without settling.
pub(crate) async fn settled<T>(
    rx: oneshot::Receiver<Result<T, RequestError>>,
) -> Result<T, RequestError> {
    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::debug!("Hook dropped its continuation; call stays pending");
            std::future::pending().await
        }
    }
}

/// Aborts an in-flight call.
#[derive(Debug, Clone)]
pub struct Canceller {
    token: CancellationToken,
}

impl Canceller {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Cancel the call. The transport fails it with a transport error.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl RequestOptions {
    pub fn on_cancel<F>(mut self, f: F) -> Self
    where
        F: Fn(Canceller) + Send + Sync + 'static,
    {
        self.cancel = Some(Arc::new(f));
        self
    }

    pub fn before_request<F>(mut self, f: F) -> Self
    where
        F: Fn(Settle<RequestOptions>, RequestOptions) + Send + Sync + 'static,
    {
        self.before_request = Some(Arc::new(f));
        self
    }

    pub fn request_interceptor<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolvedRequest) -> Result<Option<ResolvedRequest>, String> + Send + Sync + 'static,
    {
        self.request_interceptor = Some(Arc::new(f));
        self
    }

    pub fn response_interceptor<F>(mut self, f: F) -> Self
    where
        F: Fn(&TransportResponse) -> Result<Option<TransportResponse>, String>
            + Send
            + Sync
            + 'static,
    {
        self.response_interceptor = Some(Arc::new(f));
        self
    }

    pub fn after_response<F>(mut self, f: F) -> Self
    where
        F: Fn(Settle<Value>, Value, &RequestOptions) + Send + Sync + 'static,
    {
        self.after_response = Some(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorInfo) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_settle_resolve() {
        let (settle, rx) = Settle::channel();
        settle.resolve(json!({"ok": true}));
        assert_eq!(settled(rx).await.unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_settle_reject_passes_value_through() {
        let (settle, rx) = Settle::<Value>::channel();
        settle.reject("not logged in");
        match settled(rx).await {
            Err(RequestError::Rejected(value)) => assert_eq!(value, json!("not logged in")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_settle_from_another_task() {
        let (settle, rx) = Settle::channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            settle.resolve(7u32);
        });
        assert_eq!(settled(rx).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_dropped_settle_never_completes() {
        let (settle, rx) = Settle::<Value>::channel();
        drop(settle);
        let waited = tokio::time::timeout(Duration::from_millis(50), settled(rx)).await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_canceller() {
        let token = CancellationToken::new();
        let canceller = Canceller::new(token.clone());
        assert!(!canceller.is_cancelled());
        canceller.cancel();
        assert!(token.is_cancelled());
    }
}
