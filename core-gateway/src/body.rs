//! Outgoing request bodies.

use bridge_traits::multipart::MultipartForm;
use serde_json::Value;

/// Body of a gateway request, before normalization and encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Sent as `multipart/form-data`; used whenever a file is attached.
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }

    /// JSON value of the body, if it is a JSON body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        RequestBody::Multipart(form)
    }
}

impl From<Option<Value>> for RequestBody {
    fn from(value: Option<Value>) -> Self {
        value.map(RequestBody::Json).unwrap_or_default()
    }
}
