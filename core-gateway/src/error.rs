//! Error types for gateway operations

use bridge_traits::error::BridgeError;
use core_runtime::events::NotificationKind;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Body of a failed response, kept exactly as the server sent it.
///
/// JSON bodies are parsed; any other non-empty body is kept as a string and
/// an empty body is `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub status: u16,
    pub body: Value,
}

impl ErrorBody {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Server-supplied message, if any.
    ///
    /// Reads `message` as a string, or joins a `message` array of strings
    /// with `", "`. A bare string body is its own message.
    pub fn message(&self) -> Option<String> {
        match &self.body {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(text)) => Some(text.clone()),
                Some(Value::Array(items)) => {
                    let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                    (!parts.is_empty()).then(|| parts.join(", "))
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_null()
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "status {}: {}", self.status, message),
            None => write!(f, "status {}", self.status),
        }
    }
}

/// Gateway errors
///
/// HTTP-classified variants carry the server body unchanged so callers can
/// render field-level validation messages themselves.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A 4xx response other than 401, 403 or 404
    #[error("Request rejected ({0})")]
    Validation(ErrorBody),

    /// 401
    #[error("Authentication required ({0})")]
    AuthenticationRequired(ErrorBody),

    /// 403
    #[error("Authorization denied ({0})")]
    AuthorizationDenied(ErrorBody),

    /// 404
    #[error("Not found ({0})")]
    NotFound(ErrorBody),

    /// 5xx
    #[error("Server fault ({0})")]
    ServerFault(ErrorBody),

    /// No response was received
    #[error("Connectivity failure: {0}")]
    Connectivity(#[source] BridgeError),

    /// The resource does not bind the requested operation
    #[error("Operation '{operation}' is not supported by '{entity}'")]
    UnsupportedOperation { entity: String, operation: String },

    /// A successful body did not match the requested type
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(String),
}

impl GatewayError {
    /// The server body of an HTTP-classified failure.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            GatewayError::Validation(body)
            | GatewayError::AuthenticationRequired(body)
            | GatewayError::AuthorizationDenied(body)
            | GatewayError::NotFound(body)
            | GatewayError::ServerFault(body) => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.body().map(|body| body.status)
    }

    /// Server message when available, otherwise the error's own text.
    pub fn message(&self) -> String {
        self.body()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| self.to_string())
    }

    /// The notification class raised for this failure, if any.
    ///
    /// Validation failures are left to the caller to display.
    pub fn notification_kind(&self) -> Option<NotificationKind> {
        match self {
            GatewayError::AuthenticationRequired(_) => {
                Some(NotificationKind::AuthenticationRequired)
            }
            GatewayError::AuthorizationDenied(_) => Some(NotificationKind::AuthorizationDenied),
            GatewayError::NotFound(_) => Some(NotificationKind::NotFound),
            GatewayError::ServerFault(_) => Some(NotificationKind::ServerFault),
            GatewayError::Connectivity(_) => Some(NotificationKind::Connectivity),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
