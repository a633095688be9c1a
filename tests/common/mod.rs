//! Shared utilities for pipeline and transport tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http_request::http::{HttpRequest, ResolvedRequest, Transport, TransportResponse};
use http_request::observability::DiagnosticSink;
use http_request::ErrorInfo;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Transport that records every request and answers from a script.
///
/// Without a scripted outcome it answers 200 with `{"url": <full url>}`.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub seen: Mutex<Vec<ResolvedRequest>>,
    outcome: Mutex<Option<Result<TransportResponse, ErrorInfo>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(info: ErrorInfo) -> Arc<Self> {
        let transport = Self::default();
        *transport.outcome.lock().unwrap() = Some(Err(info));
        Arc::new(transport)
    }

    pub fn responding(response: TransportResponse) -> Arc<Self> {
        let transport = Self::default();
        *transport.outcome.lock().unwrap() = Some(Ok(response));
        Arc::new(transport)
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last(&self) -> ResolvedRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ResolvedRequest) -> Result<TransportResponse, ErrorInfo> {
        let default = TransportResponse::new(200, json!({ "url": request.full_url() }));
        self.seen.lock().unwrap().push(request);
        self.outcome.lock().unwrap().clone().unwrap_or(Ok(default))
    }
}

/// Sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub logs: Mutex<Vec<(String, Value)>>,
    pub errors: Mutex<Vec<ErrorInfo>>,
}

impl RecordingSink {
    pub fn labels(&self) -> Vec<String> {
        self.logs.lock().unwrap().iter().map(|(label, _)| label.clone()).collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn log(&self, payload: &Value, label: &str) {
        self.logs.lock().unwrap().push((label.to_string(), payload.clone()));
    }

    fn error(&self, info: &ErrorInfo) {
        self.errors.lock().unwrap().push(info.clone());
    }
}

/// Facade wired to the given fakes.
pub fn client(transport: Arc<RecordingTransport>, sink: Arc<RecordingSink>) -> HttpRequest {
    HttpRequest::builder().transport(transport).sink(sink).build()
}

/// Start a backend that accepts connections and never answers.
pub async fn start_stalled_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start a backend that answers one request with `{}` and hands back the
/// raw request head it received.
pub async fn start_capturing_backend() -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }

        let response = "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}";
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        let _ = tx.send(String::from_utf8_lossy(&received).into_owned());
    });

    (addr, rx)
}

/// Header lines of a raw request head named `name`, in any case.
pub fn header_lines(head: &str, name: &str) -> Vec<String> {
    head.lines()
        .filter(|line| {
            line.split_once(':')
                .map(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .map(str::to_string)
        .collect()
}
