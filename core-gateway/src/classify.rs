//! Failure classification
//!
//! Maps a failed exchange to a [`GatewayError`] and the single notification
//! shown to the user for it.

use crate::error::{ErrorBody, GatewayError};
use bridge_traits::error::BridgeError;
use bridge_traits::http::HttpResponse;
use core_runtime::events::{Notification, NotificationKind};
use serde_json::Value;

/// Decode a response body without failing: JSON when it parses, the text
/// otherwise, `Null` when empty.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Classify a non-2xx response.
pub fn classify_response(response: &HttpResponse) -> GatewayError {
    classify_status(response.status, decode_body(&response.body))
}

pub fn classify_status(status: u16, body: Value) -> GatewayError {
    let body = ErrorBody::new(status, body);
    match status {
        401 => GatewayError::AuthenticationRequired(body),
        403 => GatewayError::AuthorizationDenied(body),
        404 => GatewayError::NotFound(body),
        s if s >= 500 => GatewayError::ServerFault(body),
        _ => GatewayError::Validation(body),
    }
}

/// A request that never produced a response.
pub fn classify_transport(error: BridgeError) -> GatewayError {
    GatewayError::Connectivity(error)
}

/// User-facing text for a notification class.
pub fn notification_message(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::AuthenticationRequired => "Log-in to continue.",
        NotificationKind::AuthorizationDenied => {
            "You do not have permission to perform this operation."
        }
        NotificationKind::NotFound => "No data found.",
        NotificationKind::ServerFault => "System error, please try again later.",
        NotificationKind::Connectivity => "Server connection error!",
    }
}

/// The notification for `error`, or `None` when the caller handles it.
pub fn notification_for(error: &GatewayError) -> Option<Notification> {
    error
        .notification_kind()
        .map(|kind| Notification::new(kind, notification_message(kind)))
}
