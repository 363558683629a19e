//! Field declarations for entity forms and tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input kind of a field. The set is closed; match it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    /// One of an ordered list of distinct options
    Select { options: Vec<String> },
    Boolean,
    /// Image or video reference, uploaded as a file
    Media,
}

impl FieldKind {
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Select { .. } => "select",
            FieldKind::Boolean => "boolean",
            FieldKind::Media => "media",
        }
    }

    /// Value of the field on a blank record.
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Text | FieldKind::Textarea => Value::String(String::new()),
            FieldKind::Number => Value::from(0),
            FieldKind::Select { options } => {
                Value::String(options.first().cloned().unwrap_or_default())
            }
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::Media => Value::Null,
        }
    }

    /// Shape check for a value entered for this field.
    ///
    /// `null` (unset) is accepted by every kind. Numbers and booleans also
    /// accept the string forms HTML inputs submit.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            FieldKind::Text | FieldKind::Textarea => value.is_string(),
            FieldKind::Number => match value {
                Value::Number(_) => true,
                Value::String(text) => text.trim().parse::<f64>().is_ok(),
                _ => false,
            },
            FieldKind::Select { options } => value
                .as_str()
                .is_some_and(|text| options.iter().any(|option| option == text)),
            FieldKind::Boolean => match value {
                Value::Bool(_) => true,
                Value::Number(number) => matches!(number.as_f64(), Some(n) if n == 0.0 || n == 1.0),
                Value::String(text) => ["true", "false", "on", "off", "1", "0"]
                    .iter()
                    .any(|form| text.eq_ignore_ascii_case(form)),
                _ => false,
            },
            FieldKind::Media => value.is_string() || value.is_object(),
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, FieldKind::Media)
    }
}

/// A single field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn textarea(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Textarea)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn select<I, S>(key: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, label, FieldKind::select(options))
    }

    pub fn boolean(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Boolean)
    }

    pub fn media(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Media)
    }
}
