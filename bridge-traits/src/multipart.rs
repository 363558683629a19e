//! Multipart Form Bodies
//!
//! An ordered, multi-valued form model with the lookup and replacement rules
//! browsers apply to form data, plus an RFC 7578 encoder.

use bytes::{BufMut, Bytes, BytesMut};

/// File attachment inside a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// A single form entry value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

impl FormValue {
    /// Text content, `None` for file entries.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(value) => Some(value),
            FormValue::File(_) => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FormValue::File(_))
    }
}

/// Ordered multipart form
///
/// Names may repeat. Entry order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<(String, FormValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style text append.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, FormValue::Text(value.into()));
        self
    }

    /// Builder-style file append.
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.append(name, FormValue::File(file));
        self
    }

    pub fn append(&mut self, name: impl Into<String>, value: FormValue) {
        self.parts.push((name.into(), value));
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.parts
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&FormValue> {
        self.parts
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(key, _)| key == name)
    }

    /// Remove every entry named `name`.
    pub fn remove(&mut self, name: &str) {
        self.parts.retain(|(key, _)| key != name);
    }

    /// Replace the first entry named `name` in place and drop the rest.
    /// Appends when no entry exists.
    pub fn set(&mut self, name: impl Into<String>, value: FormValue) {
        let name = name.into();
        match self.parts.iter().position(|(key, _)| *key == name) {
            Some(index) => {
                self.parts[index].1 = value;
                let mut seen = 0usize;
                self.parts.retain(|(key, _)| {
                    if *key != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.parts.push((name, value)),
        }
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Random boundary that will not collide with realistic payloads.
    pub fn generate_boundary() -> String {
        format!("----storefront-{}", uuid::Uuid::new_v4().simple())
    }

    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={}", boundary)
    }

    /// Encode the form as `multipart/form-data` using `boundary`.
    pub fn encode(&self, boundary: &str) -> Bytes {
        let mut buf = BytesMut::new();

        for (name, value) in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(boundary.as_bytes());
            buf.put_slice(b"\r\n");

            match value {
                FormValue::Text(text) => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_quoted(name)
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(text.as_bytes());
                }
                FormValue::File(file) => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            escape_quoted(name),
                            escape_quoted(&file.filename)
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(
                        format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes(),
                    );
                    buf.put_slice(&file.data);
                }
            }
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(b"--\r\n");
        buf.freeze()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
