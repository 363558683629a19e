//! HTTP Gateway
//!
//! The single outbound channel to the storefront backend.
//!
//! ## Request phase
//!
//! - `Accept: application/json` on every request
//! - `Authorization: Bearer <token>` when [`SessionStore::get_token`]
//!   resolves one
//! - bodies of `POST`, `PUT` and `PATCH` are run through
//!   [`normalize`](crate::normalizer::normalize)
//!
//! ## Response phase
//!
//! A 2xx response yields its decoded body. Anything else is classified into
//! a [`GatewayError`], exactly one [`Notification`] is emitted on the
//! [`EventBus`] (validation failures excepted), and the error is returned
//! with the server body intact.
//!
//! Requests are issued once. There is no retry, deduplication or
//! cancellation at this layer; concurrent calls are independent.

use crate::body::RequestBody;
use crate::classify::{classify_response, classify_transport, decode_body, notification_for};
use crate::error::{GatewayError, Result};
use crate::normalizer::normalize;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_auth::SessionStore;
use core_runtime::config::{join_url, AdminConfig};
use core_runtime::events::{CoreEvent, EventBus};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A request addressed relative to the backend base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// Set a header; names are compared without regard to case.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }
}

/// Authenticated, normalizing REST gateway.
///
/// Cloning is cheap; clones share the HTTP client, session store and event
/// bus.
#[derive(Clone)]
pub struct HttpGateway {
    http: Arc<dyn HttpClient>,
    sessions: SessionStore,
    events: EventBus,
    base_url: String,
}

impl HttpGateway {
    pub fn new(
        http: Arc<dyn HttpClient>,
        sessions: SessionStore,
        events: EventBus,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Initializing HttpGateway");
        Self {
            http,
            sessions,
            events,
            base_url,
        }
    }

    /// Gateway over the bridges and base URL of a resolved configuration.
    pub fn from_config(config: &AdminConfig, sessions: SessionStore, events: EventBus) -> Self {
        Self::new(
            Arc::clone(&config.http_client),
            sessions,
            events,
            config.api_base_url.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(ApiRequest::new(HttpMethod::Get, path)).await
    }

    /// `GET` decoded into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get(path).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Decode {
            context: format!("response of GET {}", path),
            source: e,
        })
    }

    pub async fn post(&self, path: &str, body: impl Into<RequestBody>) -> Result<Value> {
        self.send(ApiRequest::new(HttpMethod::Post, path).body(body))
            .await
    }

    pub async fn put(&self, path: &str, body: impl Into<RequestBody>) -> Result<Value> {
        self.send(ApiRequest::new(HttpMethod::Put, path).body(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: impl Into<RequestBody>) -> Result<Value> {
        self.send(ApiRequest::new(HttpMethod::Patch, path).body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(ApiRequest::new(HttpMethod::Delete, path)).await
    }

    /// Issue `request` and return the decoded success body.
    ///
    /// # Errors
    ///
    /// - HTTP-classified variants of [`GatewayError`] for non-2xx responses
    /// - [`GatewayError::Connectivity`] when no response was received
    /// - [`GatewayError::Encode`] when the JSON body cannot be serialized
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        let http_request = self.prepare(request).await?;

        let response = match self.http.execute(http_request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request failed before a response was received");
                return Err(self.fail(classify_transport(e)));
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "Request rejected by server");
            return Err(self.fail(classify_response(&response)));
        }

        debug!(status = response.status, "Request succeeded");
        Ok(decode_body(&response.body))
    }

    async fn prepare(&self, request: ApiRequest) -> Result<HttpRequest> {
        let ApiRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let mut http_request = headers.into_iter().fold(
            HttpRequest::new(method, join_url(&self.base_url, &path)),
            |request, (key, value)| request.header(key, value),
        );
        http_request = http_request.header("Accept", "application/json");

        if let Some(token) = self.resolve_token().await {
            http_request = http_request.bearer_token(token);
        }

        let body = if method.is_mutating() {
            normalize(body)
        } else {
            body
        };

        match body {
            RequestBody::Empty => Ok(http_request),
            RequestBody::Json(value) => http_request
                .json(&value)
                .map_err(|e| GatewayError::Encode(e.to_string())),
            RequestBody::Multipart(form) => Ok(http_request.multipart(&form)),
        }
    }

    // A storage failure must not block the request; it goes out anonymous.
    async fn resolve_token(&self) -> Option<String> {
        match self.sessions.get_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read session token, sending request without it");
                None
            }
        }
    }

    fn fail(&self, error: GatewayError) -> GatewayError {
        if let Some(notification) = notification_for(&error) {
            let delivered = self.events.emit(CoreEvent::Notification(notification));
            debug!(delivered, "Failure notification emitted");
        }
        error
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}
