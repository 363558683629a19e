//! End-to-end gateway behavior against a recording HTTP fake.

use async_trait::async_trait;
use bridge_desktop::MemorySecureStore;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::multipart::{FilePart, MultipartForm};
use bytes::Bytes;
use core_auth::{Session, SessionStore};
use core_gateway::{ApiRequest, GatewayError, HttpGateway};
use core_runtime::events::{CoreEvent, EventBus, NotificationKind};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Records every request and answers with a fixed status and body.
struct RecordingHttpClient {
    status: Option<u16>,
    body: &'static str,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    fn answering(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status: Some(status),
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            status: None,
            body: "",
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        match self.status {
            Some(status) => Ok(HttpResponse {
                status,
                headers: HashMap::new(),
                body: Bytes::from_static(self.body.as_bytes()),
            }),
            None => Err(BridgeError::Transport("connection refused".to_string())),
        }
    }
}

fn setup(http: Arc<RecordingHttpClient>) -> (HttpGateway, SessionStore, EventBus) {
    let sessions = SessionStore::new(Arc::new(MemorySecureStore::new()));
    let events = EventBus::new(32);
    let gateway = HttpGateway::new(http, sessions.clone(), events.clone(), "https://shop.test/api");
    (gateway, sessions, events)
}

fn notifications(events: Vec<CoreEvent>) -> Vec<NotificationKind> {
    events
        .into_iter()
        .filter_map(|event| match event {
            CoreEvent::Notification(n) => Some(n.kind),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_multipart_body_is_normalized_on_the_wire() {
    let http = RecordingHttpClient::answering(201, r#"{"id":3}"#);
    let (gateway, _, _) = setup(http.clone());

    let form = MultipartForm::new()
        .text("name", "Shoe")
        .text("isActive", "on")
        .file("image", FilePart::new("shoe.png", "image/png", vec![0x89u8, 0x50]));
    gateway.post("/products", form).await.unwrap();

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let content_type = requests[0].header_value("Content-Type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let wire = String::from_utf8_lossy(requests[0].body.as_ref().unwrap()).into_owned();
    assert!(wire.contains("name=\"status\"\r\n\r\nACTIVE\r\n"));
    assert!(!wire.contains("name=\"isActive\""));
    assert!(wire.contains("filename=\"shoe.png\""));
}

#[tokio::test]
async fn test_get_and_delete_bodies_are_not_rewritten() {
    let http = RecordingHttpClient::answering(200, "{}");
    let (gateway, _, _) = setup(http.clone());

    gateway.get("/users").await.unwrap();
    gateway.delete("/users/4").await.unwrap();

    let requests = http.requests();
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert_eq!(requests[1].url, "https://shop.test/api/users/4");
    assert!(requests.iter().all(|r| r.body.is_none()));
}

#[tokio::test]
async fn test_wrapped_session_token_is_sent() {
    let http = RecordingHttpClient::answering(200, "[]");
    let (gateway, sessions, _) = setup(http.clone());

    let session: Session = serde_json::from_value(json!({"token": {"token": "abc"}})).unwrap();
    sessions.set(&session).await.unwrap();
    gateway.get("/orders").await.unwrap();

    assert_eq!(
        http.requests()[0].header_value("Authorization"),
        Some("Bearer abc")
    );
}

#[tokio::test]
async fn test_each_status_class_notifies_exactly_once() {
    let cases = [
        (401, NotificationKind::AuthenticationRequired),
        (403, NotificationKind::AuthorizationDenied),
        (404, NotificationKind::NotFound),
        (500, NotificationKind::ServerFault),
        (502, NotificationKind::ServerFault),
    ];

    for (status, kind) in cases {
        let http = RecordingHttpClient::answering(status, r#"{"message":"nope"}"#);
        let (gateway, _, events) = setup(http);
        let mut stream = events.stream();

        let error = gateway.get("/brands/1").await.unwrap_err();

        assert_eq!(error.status(), Some(status));
        assert_eq!(error.body().unwrap().body, json!({"message": "nope"}));
        assert_eq!(notifications(stream.drain()), vec![kind], "status {}", status);
    }
}

#[tokio::test]
async fn test_concurrent_failures_are_independent() {
    let http = RecordingHttpClient::unreachable();
    let (gateway, _, events) = setup(http.clone());
    let mut stream = events.stream();

    let calls = (0..3).map(|_| gateway.get("/stats"));
    let results = futures::future::join_all(calls).await;

    assert!(results
        .iter()
        .all(|r| matches!(r, Err(GatewayError::Connectivity(_)))));
    assert_eq!(http.requests().len(), 3);
    assert_eq!(
        notifications(stream.drain()),
        vec![NotificationKind::Connectivity; 3]
    );
}

#[tokio::test]
async fn test_logout_between_requests_drops_the_header() {
    let http = RecordingHttpClient::answering(200, "null");
    let (gateway, sessions, _) = setup(http.clone());

    sessions.set(&Session::new("abc", None)).await.unwrap();
    gateway.get("/users").await.unwrap();
    sessions.logout().await.unwrap();
    let body: Value = gateway.get("/users").await.unwrap();

    let requests = http.requests();
    assert!(requests[0].header_value("Authorization").is_some());
    assert!(requests[1].header_value("Authorization").is_none());
    assert_eq!(body, Value::Null);
}

fn header_count(request: &HttpRequest, name: &str) -> usize {
    request
        .headers
        .keys()
        .filter(|key| key.eq_ignore_ascii_case(name))
        .count()
}

#[tokio::test]
async fn test_caller_headers_are_replaced_regardless_of_case() {
    let http = RecordingHttpClient::answering(200, "{}");
    let (gateway, sessions, _) = setup(http.clone());
    sessions.set(&Session::new("abc", None)).await.unwrap();

    let request = ApiRequest::new(HttpMethod::Post, "/brands")
        .header("authorization", "Basic zzz")
        .header("accept", "text/csv")
        .header("content-type", "text/plain")
        .body(json!({"name": "Acme"}));
    gateway.send(request).await.unwrap();

    let sent = &http.requests()[0];
    assert_eq!(header_count(sent, "Authorization"), 1);
    assert_eq!(header_count(sent, "Accept"), 1);
    assert_eq!(header_count(sent, "Content-Type"), 1);
    assert_eq!(sent.header_value("Authorization"), Some("Bearer abc"));
    assert_eq!(sent.header_value("Accept"), Some("application/json"));
    assert_eq!(sent.header_value("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_caller_authorization_kept_without_session() {
    let http = RecordingHttpClient::answering(200, "{}");
    let (gateway, _, _) = setup(http.clone());

    let request = ApiRequest::new(HttpMethod::Get, "/brands").header("authorization", "Basic zzz");
    gateway.send(request).await.unwrap();

    let sent = &http.requests()[0];
    assert_eq!(header_count(sent, "Authorization"), 1);
    assert_eq!(sent.header_value("Authorization"), Some("Basic zzz"));
}
