//! Console flows end to end, with HTTP mocked and sessions in memory.

use async_trait::async_trait;
use bridge_desktop::MemorySecureStore;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::multipart::FilePart;
use bridge_traits::storage::SecureStore;
use bytes::Bytes;
use core_auth::{LEGACY_TOKEN_KEY, SESSION_KEY};
use core_runtime::events::{NotificationKind, SessionEvent};
use core_service::{
    AdminConfig, AdminConsole, AuthState, CoreError, CoreEvent, DashboardStats, NewVariant,
    OrderStatus,
};
use mockall::mock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

fn sent_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_ref().unwrap()).unwrap()
}

fn console(mock_http: MockHttpClient) -> (AdminConsole, Arc<MemorySecureStore>) {
    let store = Arc::new(MemorySecureStore::new());
    let config = AdminConfig::builder()
        .origin("https://admin.shop.test")
        .http_client(Arc::new(mock_http))
        .secure_store(store.clone())
        .build()
        .unwrap();
    (AdminConsole::new(config).unwrap(), store)
}

#[tokio::test]
async fn test_login_persists_session() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Post
                && request.url == "https://admin.shop.test/api/auth/login"
                && sent_json(request) == json!({"email": "admin@shop.test", "password": "pw"})
        })
        .returning(|_| {
            Ok(response(
                201,
                r#"{"access_token":"jwt-1","user":{"id":1,"email":"admin@shop.test","role":"admin"}}"#,
            ))
        });

    let (console, store) = console(mock_http);
    let mut events = console.subscribe();
    assert_eq!(console.state().await.unwrap(), AuthState::Anonymous);

    let session = console.auth().login("admin@shop.test", "pw").await.unwrap();

    assert_eq!(session.token(), Some("jwt-1"));
    assert!(console.auth().is_logged_in().await.unwrap());
    assert_eq!(console.state().await.unwrap(), AuthState::Authenticated);
    assert_eq!(
        store.get_secret(LEGACY_TOKEN_KEY).await.unwrap(),
        Some(b"jwt-1".to_vec())
    );
    assert_eq!(
        events.drain(),
        vec![CoreEvent::Session(SessionEvent::SignedIn {
            email: Some("admin@shop.test".into())
        })]
    );
}

#[tokio::test]
async fn test_login_failure_uses_server_message() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .returning(|_| Ok(response(401, r#"{"message":"Invalid credentials"}"#)));

    let (console, _) = console(mock_http);

    let error = console.auth().login("admin@shop.test", "bad").await.unwrap_err();

    assert!(matches!(
        error,
        CoreError::LoginFailed { ref message } if message == "Invalid credentials"
    ));
    assert!(!console.auth().is_logged_in().await.unwrap());
}

#[tokio::test]
async fn test_login_without_token_fails_generically() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .returning(|_| Ok(response(200, r#"{"user":{"email":"a@b.c"}}"#)));

    let (console, _) = console(mock_http);

    let error = console.auth().login("a@b.c", "pw").await.unwrap_err();
    assert_eq!(error.to_string(), "Login failed");
}

#[tokio::test]
async fn test_logout_clears_both_keys() {
    let (console, store) = console(MockHttpClient::new());
    store.set_secret(SESSION_KEY, br#"{"token":"abc"}"#).await.unwrap();
    store.set_secret(LEGACY_TOKEN_KEY, b"abc").await.unwrap();
    assert_eq!(console.state().await.unwrap(), AuthState::Authenticated);

    console.auth().logout().await.unwrap();

    assert!(store.get_secret(SESSION_KEY).await.unwrap().is_none());
    assert!(store.get_secret(LEGACY_TOKEN_KEY).await.unwrap().is_none());
    assert_eq!(console.state().await.unwrap(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_unauthorized_request_keeps_session() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .returning(|_| Ok(response(401, r#"{"message":"Unauthorized"}"#)));

    let (console, store) = console(mock_http);
    store.set_secret(SESSION_KEY, br#"{"token":"stale"}"#).await.unwrap();
    let mut events = console.subscribe();

    let users = console.resource::<Value>("users").unwrap();
    assert!(users.list().await.is_err());

    assert_eq!(console.state().await.unwrap(), AuthState::Authenticated);
    let kinds: Vec<NotificationKind> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            CoreEvent::Notification(n) => Some(n.kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![NotificationKind::AuthenticationRequired]);
}

#[tokio::test]
async fn test_dashboard_falls_back_on_server_fault() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .returning(|_| Ok(response(500, "")));

    let (console, _) = console(mock_http);

    assert_eq!(console.dashboard().stats().await, DashboardStats::fallback());
}

#[tokio::test]
async fn test_dashboard_maps_stats() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| request.url == "https://admin.shop.test/api/stats")
        .returning(|_| {
            Ok(response(
                200,
                r#"{"users":3,"products":5,"orders":2,"categories":1,"sales":[{"date":"2024-05-10","revenue":40,"revenues":40}]}"#,
            ))
        });

    let (console, _) = console(mock_http);
    let stats = console.dashboard().stats().await;

    assert_eq!(stats.users, 3.0);
    assert_eq!(stats.sales_today, 40.0);
    assert_eq!(stats.chart[0].name, "Fri");
}

#[tokio::test]
async fn test_order_transition() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Patch
                && request.url == "https://admin.shop.test/api/orders/15/status"
                && sent_json(request) == json!({"status": "FULFILLED"})
        })
        .returning(|_| Ok(response(200, r#"{"id":15,"status":"FULFILLED"}"#)));

    let (console, _) = console(mock_http);
    let order = console
        .orders()
        .unwrap()
        .transition(15, OrderStatus::Fulfilled)
        .await
        .unwrap();

    assert_eq!(order["status"], "FULFILLED");
}

#[tokio::test]
async fn test_product_toggle_unwraps_product() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Patch
                && request.url == "https://admin.shop.test/api/products/8/toggle"
        })
        .returning(|_| Ok(response(200, r#"{"product":{"id":8,"status":"ACTIVE"}}"#)));

    let (console, _) = console(mock_http);
    let product = console.products().unwrap().toggle(8).await.unwrap();

    assert_eq!(product, json!({"id": 8, "status": "ACTIVE"}));
}

#[tokio::test]
async fn test_variants_read_falls_back_to_empty() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::Transport("connection reset".into())));

    let (console, _) = console(mock_http);
    assert!(console.products().unwrap().variants_for(3).await.is_empty());
}

#[tokio::test]
async fn test_add_variant_payload() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.url == "https://admin.shop.test/api/variants"
                && sent_json(request)["salePrice"] == json!(25.0)
        })
        .returning(|_| Ok(response(201, r#"{"id":100}"#)));

    let (console, _) = console(mock_http);
    let variant = NewVariant::priced_from(3, "Blue", "#0000ff", 5.0, 20.0, 4);
    let created = console.products().unwrap().add_variant(&variant).await.unwrap();

    assert_eq!(created["id"], 100);
}

#[tokio::test]
async fn test_upload_post_image_returns_url() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.url == "https://admin.shop.test/api/uploads/posts"
                && request
                    .header_value("Content-Type")
                    .is_some_and(|value| value.starts_with("multipart/form-data"))
        })
        .returning(|_| Ok(response(201, r#"{"url":"/uploads/posts/a.png"}"#)));

    let (console, _) = console(mock_http);
    let url = console
        .media()
        .upload_post_image(FilePart::new("a.png", "image/png", vec![1u8, 2]))
        .await
        .unwrap();

    assert_eq!(url, "/uploads/posts/a.png");
    assert_eq!(
        console.asset_url(&url),
        "https://admin.shop.test/uploads/posts/a.png"
    );
    assert_eq!(console.asset_url(""), "/placeholder.png");
}

#[tokio::test]
async fn test_add_youtube_requires_url() {
    let mut mock_http = MockHttpClient::new();
    mock_http.expect_execute().times(0);

    let (console, _) = console(mock_http);
    let error = console.media().add_youtube("Intro", " ", None).await.unwrap_err();

    assert!(matches!(error, CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn test_add_youtube_payload() {
    let mut mock_http = MockHttpClient::new();
    mock_http
        .expect_execute()
        .times(1)
        .withf(|request| {
            request.url == "https://admin.shop.test/api/media/youtube"
                && sent_json(request)
                    == json!({
                        "title": "Intro",
                        "youtubeUrl": "https://youtube.com/watch?v=x",
                        "productId": 4
                    })
        })
        .returning(|_| Ok(response(201, "{}")));

    let (console, _) = console(mock_http);
    console
        .media()
        .add_youtube("Intro", "https://youtube.com/watch?v=x", Some(4.into()))
        .await
        .unwrap();
}
