//! Payload Normalization
//!
//! Forms in the console edit an `isActive` toggle, while the backend stores
//! a `status` enum. Every outgoing body is rewritten here before it leaves
//! the gateway:
//!
//! - `isActive` is removed
//! - `status` is set to [`STATUS_ACTIVE`] when the value is truthy under
//!   [`is_truthy`], otherwise to [`STATUS_INACTIVE`]
//!
//! The rewrite applies identically to JSON objects and multipart forms and
//! is idempotent: once `isActive` is gone a second pass changes nothing.

use crate::body::RequestBody;
use bridge_traits::multipart::{FormValue, MultipartForm};
use serde_json::{Map, Value};

pub const IS_ACTIVE_FIELD: &str = "isActive";
pub const STATUS_FIELD: &str = "status";
pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_INACTIVE: &str = "INACTIVE";

/// Truthiness of an `isActive` value.
///
/// Accepted forms: boolean `true`, the number `1`, or a string equal
/// (ignoring ASCII case) to `"true"`, `"1"` or `"on"`. Everything else,
/// including `null`, is false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() == Some(1.0),
        Value::String(text) => is_truthy_text(text),
        _ => false,
    }
}

/// [`is_truthy`] for the text value of a form field.
pub fn is_truthy_text(text: &str) -> bool {
    text.eq_ignore_ascii_case("true") || text == "1" || text.eq_ignore_ascii_case("on")
}

fn status_for(active: bool) -> &'static str {
    if active {
        STATUS_ACTIVE
    } else {
        STATUS_INACTIVE
    }
}

/// Normalize a JSON body. Non-object values pass through unchanged.
pub fn normalize_json(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_object(map)),
        other => other,
    }
}

fn normalize_object(mut map: Map<String, Value>) -> Map<String, Value> {
    if let Some(flag) = map.remove(IS_ACTIVE_FIELD) {
        map.insert(
            STATUS_FIELD.to_string(),
            Value::String(status_for(is_truthy(&flag)).to_string()),
        );
    }
    map
}

/// Normalize a multipart form.
///
/// The first `isActive` entry decides the status (a file entry counts as
/// false). All `isActive` entries are dropped and exactly one `status`
/// entry remains. Other fields keep their values and relative order.
pub fn normalize_form(mut form: MultipartForm) -> MultipartForm {
    let flag = form
        .get(IS_ACTIVE_FIELD)
        .map(|value| value.as_text().is_some_and(is_truthy_text));
    let Some(active) = flag else {
        return form;
    };

    form.remove(IS_ACTIVE_FIELD);
    form.set(STATUS_FIELD, FormValue::Text(status_for(active).to_string()));
    form
}

/// Apply the generic rewrite to any request body.
pub fn normalize(body: RequestBody) -> RequestBody {
    match body {
        RequestBody::Json(value) => RequestBody::Json(normalize_json(value)),
        RequestBody::Multipart(form) => RequestBody::Multipart(normalize_form(form)),
        RequestBody::Empty => RequestBody::Empty,
    }
}

/// Per-resource normalization layered on top of the generic rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadPolicy {
    /// Only the generic `isActive` rewrite.
    #[default]
    Generic,
    /// Writes always carry a `status`; a missing or falsy one becomes
    /// [`STATUS_INACTIVE`].
    RequireStatus,
}

impl PayloadPolicy {
    pub fn apply(&self, body: RequestBody) -> RequestBody {
        let body = normalize(body);
        match self {
            PayloadPolicy::Generic => body,
            PayloadPolicy::RequireStatus => require_status(body),
        }
    }
}

fn require_status(body: RequestBody) -> RequestBody {
    match body {
        RequestBody::Json(Value::Object(mut map)) => {
            if !map.get(STATUS_FIELD).is_some_and(is_present) {
                map.insert(
                    STATUS_FIELD.to_string(),
                    Value::String(STATUS_INACTIVE.to_string()),
                );
            }
            RequestBody::Json(Value::Object(map))
        }
        RequestBody::Multipart(mut form) => {
            let present = form.get(STATUS_FIELD).is_some_and(|value| match value {
                FormValue::Text(text) => !text.is_empty(),
                FormValue::File(_) => true,
            });
            if !present {
                form.set(STATUS_FIELD, FormValue::Text(STATUS_INACTIVE.to_string()));
            }
            RequestBody::Multipart(form)
        }
        other => other,
    }
}

// Non-empty, non-zero, non-false.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::multipart::FilePart;
    use serde_json::json;

    #[test]
    fn test_truthy_forms() {
        for value in [
            json!(true),
            json!(1),
            json!(1.0),
            json!("true"),
            json!("TRUE"),
            json!("1"),
            json!("On"),
        ] {
            assert!(is_truthy(&value), "{} should be truthy", value);
        }
        for value in [
            json!(false),
            json!(0),
            json!(2),
            json!("yes"),
            json!(""),
            json!(null),
            json!([1]),
            json!({}),
        ] {
            assert!(!is_truthy(&value), "{} should be falsy", value);
        }
    }

    #[test]
    fn test_json_is_active_becomes_status() {
        let out = normalize_json(json!({"name": "Shoe", "isActive": false}));
        assert_eq!(out, json!({"name": "Shoe", "status": "INACTIVE"}));

        let out = normalize_json(json!({"name": "Shoe", "isActive": "on", "status": "INACTIVE"}));
        assert_eq!(out, json!({"name": "Shoe", "status": "ACTIVE"}));
    }

    #[test]
    fn test_json_without_is_active_is_untouched() {
        let body = json!({"name": "Shoe", "status": "DRAFT"});
        assert_eq!(normalize_json(body.clone()), body);
    }

    #[test]
    fn test_non_object_passes_through() {
        for value in [json!(null), json!([{"isActive": true}]), json!("isActive"), json!(3)] {
            assert_eq!(normalize_json(value.clone()), value);
        }
    }

    #[test]
    fn test_json_idempotent() {
        let once = normalize_json(json!({"isActive": 1, "slug": "a"}));
        assert_eq!(normalize_json(once.clone()), once);
    }

    #[test]
    fn test_form_idempotent() {
        let forms = [
            MultipartForm::new()
                .text("name", "Shoe")
                .text("isActive", "on")
                .text("status", "INACTIVE")
                .text("isActive", "false"),
            MultipartForm::new().text("isActive", "0"),
            MultipartForm::new().text("name", "Shoe"),
        ];

        for form in forms {
            let once = normalize_form(form);
            assert_eq!(normalize_form(once.clone()), once);
        }

        let once = normalize_form(
            MultipartForm::new()
                .text("isActive", "on")
                .text("isActive", "false"),
        );
        assert_eq!(once.get("status").and_then(FormValue::as_text), Some("ACTIVE"));
        assert_eq!(once.get_all("status").len(), 1);
    }

    #[test]
    fn test_form_replaces_status_entries() {
        let form = MultipartForm::new()
            .text("name", "Shoe")
            .text("status", "ACTIVE")
            .text("isActive", "false")
            .file("image", FilePart::new("a.png", "image/png", vec![1u8, 2, 3]))
            .text("status", "ACTIVE")
            .text("isActive", "true");

        let out = normalize_form(form);

        assert!(!out.contains("isActive"));
        assert_eq!(out.get_all("status").len(), 1);
        assert_eq!(out.get("status").and_then(FormValue::as_text), Some("INACTIVE"));
        assert_eq!(out.get("name").and_then(FormValue::as_text), Some("Shoe"));
        assert!(out.get("image").is_some_and(FormValue::is_file));
    }

    #[test]
    fn test_form_without_is_active_is_untouched() {
        let form = MultipartForm::new().text("name", "Shoe");
        let out = normalize_form(form.clone());
        assert_eq!(out.parts(), form.parts());
    }

    #[test]
    fn test_form_file_is_active_is_falsy() {
        let form = MultipartForm::new()
            .file("isActive", FilePart::new("x", "text/plain", b"true".to_vec()));
        let out = normalize_form(form);
        assert_eq!(out.get("status").and_then(FormValue::as_text), Some("INACTIVE"));
    }

    #[test]
    fn test_require_status_defaults_inactive() {
        let out = PayloadPolicy::RequireStatus.apply(RequestBody::Json(json!({"name": "Shoe"})));
        assert_eq!(out, RequestBody::Json(json!({"name": "Shoe", "status": "INACTIVE"})));

        let out = PayloadPolicy::RequireStatus.apply(RequestBody::Json(json!({"status": ""})));
        assert_eq!(out, RequestBody::Json(json!({"status": "INACTIVE"})));

        let out =
            PayloadPolicy::RequireStatus.apply(RequestBody::Json(json!({"status": "ACTIVE"})));
        assert_eq!(out, RequestBody::Json(json!({"status": "ACTIVE"})));

        let out = PayloadPolicy::RequireStatus.apply(RequestBody::Json(json!({"isActive": "1"})));
        assert_eq!(out, RequestBody::Json(json!({"status": "ACTIVE"})));
    }

    #[test]
    fn test_require_status_on_form() {
        let form = MultipartForm::new().text("name", "Shoe");
        let out = PayloadPolicy::RequireStatus.apply(RequestBody::Multipart(form));
        let RequestBody::Multipart(form) = out else {
            panic!("expected multipart body");
        };
        assert_eq!(form.get("status").and_then(FormValue::as_text), Some("INACTIVE"));
    }

    #[test]
    fn test_generic_policy_leaves_missing_status() {
        let out = PayloadPolicy::Generic.apply(RequestBody::Json(json!({"name": "Shoe"})));
        assert_eq!(out, RequestBody::Json(json!({"name": "Shoe"})));
        assert_eq!(PayloadPolicy::RequireStatus.apply(RequestBody::Empty), RequestBody::Empty);
    }
}
