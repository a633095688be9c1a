//! End-to-end pipeline tests against a recording transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_request::config::{ContentType, HttpMethod, ProxyUrl, RequestBody};
use http_request::http::{TransportResponse, X_REQUESTED_WITH};
use http_request::{ErrorInfo, RequestError, RequestOptions};
use serde_json::json;

mod common;
use common::{client, RecordingSink, RecordingTransport};

#[tokio::test]
async fn test_blank_url_fails_before_transport() {
    let transport = RecordingTransport::new();
    let sink = Arc::new(RecordingSink::default());
    let client = client(transport.clone(), sink.clone());

    let err = client
        .request(RequestOptions::new("   ").base_url("https://api.example.com"))
        .await
        .unwrap_err();
    assert_eq!(err, RequestError::UrlRequired);
    assert_eq!(err.to_string(), "url is required.");

    let err = client.request(RequestOptions::default()).await.unwrap_err();
    assert_eq!(err, RequestError::OptionsRequired);

    assert_eq!(transport.calls(), 0);
    assert!(sink.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cache_busting_differs_between_calls() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());

    client.request(RequestOptions::new("/items")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    client.request(RequestOptions::new("/items")).await.unwrap();

    let seen = transport.seen.lock().unwrap();
    let first = seen[0].params.get("t").and_then(|t| t.as_u64()).unwrap();
    let second = seen[1].params.get("t").and_then(|t| t.as_u64()).unwrap();
    assert!(second > first);

    drop(seen);
    client
        .request(RequestOptions::new("/items").cache(true))
        .await
        .unwrap();
    assert!(transport.last().params.get("t").is_none());
}

#[tokio::test]
async fn test_proxy_function_sees_merged_options() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());
    client.settings(RequestOptions::default().base_url("https://api.example.com"));

    let options = RequestOptions::new("users")
        .cache(true)
        .enable_proxy(true)
        .proxy_url(ProxyUrl::dynamic(|opts| {
            let host = opts.base_url.as_deref().unwrap_or_default();
            format!("dev/{}", host.trim_start_matches("https://"))
        }));

    let data = client.request(options).await.unwrap();
    assert_eq!(data, json!({"url": "/dev/api.example.com/users"}));
}

#[tokio::test]
async fn test_server_error_rejects_with_response() {
    let response = TransportResponse::new(404, json!({"message": "no such user"}))
        .with_header("content-type", "application/json");
    let transport = RecordingTransport::failing(ErrorInfo::Server(response.clone()));
    let sink = Arc::new(RecordingSink::default());
    let client = client(transport, sink.clone());

    let seen: Arc<Mutex<Vec<ErrorInfo>>> = Arc::default();
    let hook_seen = seen.clone();
    let options = RequestOptions::new("/users/7")
        .on_error(move |info| hook_seen.lock().unwrap().push(info.clone()));

    let err = client.request(options).await.unwrap_err();
    assert_eq!(err, RequestError::Server(response.clone()));
    assert_eq!(*seen.lock().unwrap(), vec![ErrorInfo::Server(response)]);
    assert_eq!(sink.errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_transport_error_rejects_with_message() {
    let transport = RecordingTransport::failing(ErrorInfo::Transport("connection refused".into()));
    let sink = Arc::new(RecordingSink::default());
    let client = client(transport, sink.clone());

    let err = client.request(RequestOptions::new("/users")).await.unwrap_err();
    assert_eq!(err, RequestError::Transport("connection refused".into()));
    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(
        *sink.errors.lock().unwrap(),
        vec![ErrorInfo::Transport("connection refused".into())]
    );
}

#[tokio::test]
async fn test_after_response_transforms() {
    let transport = RecordingTransport::responding(TransportResponse::new(200, json!({"id": 1})));
    let client = client(transport, Arc::default());

    let options = RequestOptions::new("/users/1").after_response(|settle, data, options| {
        settle.resolve(json!({"user": data, "path": options.url}));
    });
    let data = client.request(options).await.unwrap();
    assert_eq!(data, json!({"user": {"id": 1}, "path": "/users/1"}));
}

#[tokio::test]
async fn test_after_response_can_reject() {
    let transport = RecordingTransport::responding(TransportResponse::new(200, json!({"code": 40})));
    let client = client(transport, Arc::default());

    let options = RequestOptions::new("/users/1").after_response(|settle, data, _| {
        if data["code"] != 0 {
            settle.reject(data);
        } else {
            settle.resolve(data);
        }
    });
    let err = client.request(options).await.unwrap_err();
    assert_eq!(err, RequestError::Rejected(json!({"code": 40})));
}

#[tokio::test]
async fn test_unsettled_after_response_stays_pending() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());

    let options = RequestOptions::new("/users").after_response(|settle, _, _| drop(settle));
    let outcome = tokio::time::timeout(Duration::from_millis(100), client.request(options)).await;

    assert!(outcome.is_err());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_before_request_reject_skips_transport() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());

    let options = RequestOptions::new("/admin").before_request(|settle, _| settle.reject("blocked"));
    let err = client.request(options).await.unwrap_err();

    assert_eq!(err, RequestError::Rejected(json!("blocked")));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_before_request_mutates_from_another_task() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());

    let options = RequestOptions::new("/me").before_request(|settle, options| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            settle.resolve(options.header("Authorization", "Bearer abc").cache(true));
        });
    });
    client.request(options).await.unwrap();

    let request = transport.last();
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header(X_REQUESTED_WITH), Some("XMLHttpRequest"));
    assert!(request.params.is_empty());
}

#[tokio::test]
async fn test_call_options_override_settings() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());
    client.settings(
        RequestOptions::default()
            .base_url("https://a.example.com")
            .header("X-Default", "1")
            .cache(true),
    );
    client.settings(RequestOptions::default().method(HttpMethod::Put));

    client
        .request(RequestOptions::new("/x").header("X-Call", "2"))
        .await
        .unwrap();

    let request = transport.last();
    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(request.url, "https://a.example.com/x");
    assert_eq!(request.header("X-Call"), Some("2"));
    assert_eq!(request.header("X-Default"), None);
}

#[tokio::test]
async fn test_form_post_is_encoded() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());

    let options = RequestOptions::new("/login")
        .method(HttpMethod::Post)
        .content_type(ContentType::FormUrlencoded)
        .data(json!({"user": "ann", "note": "a b"}));
    client.request(options).await.unwrap();

    let request = transport.last();
    assert_eq!(
        request.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        request.body,
        Some(RequestBody::Encoded("note=a%20b&user=ann".into()))
    );
}

#[tokio::test]
async fn test_dev_mode_logs_request_and_response() {
    let transport = RecordingTransport::new();
    let sink = Arc::new(RecordingSink::default());
    let client = client(transport, sink.clone());

    client
        .request(RequestOptions::new("/a").cache(true).dev(true))
        .await
        .unwrap();
    assert_eq!(sink.labels(), vec!["Request", "Response"]);

    let logs = sink.logs.lock().unwrap();
    assert_eq!(logs[0].1["url"], json!("/a"));
    assert_eq!(logs[1].1, json!({"url": "/a"}));
    drop(logs);

    client.request(RequestOptions::new("/b")).await.unwrap();
    assert_eq!(sink.labels().len(), 2);
}

#[tokio::test]
async fn test_cancelled_before_send_is_visible_to_transport() {
    let transport = RecordingTransport::new();
    let client = client(transport.clone(), Arc::default());

    let options = RequestOptions::new("/slow").on_cancel(|canceller| canceller.cancel());
    client.request(options).await.unwrap();

    let token = transport.last().cancel.expect("token attached");
    assert!(token.is_cancelled());
}

#[test]
fn test_global_facade() {
    http_request::settings(RequestOptions::default().base_url("https://global.example.com/"));
    let url = http_request::prepare(&RequestOptions::new("/docs").param("page", 2), false);
    assert_eq!(url.as_deref(), Some("https://global.example.com/docs?page=2"));
}
