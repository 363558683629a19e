use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a record, as used in resource paths.
///
/// Backends return numeric or string ids; both are kept as text and
/// percent-encoded when placed in a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a single path segment.
    pub fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }

    /// Id of a JSON record, read from its `id` field.
    pub fn from_record(record: &Value) -> Option<Self> {
        match record.get("id")? {
            Value::String(id) if !id.is_empty() => Some(Self::new(id.as_str())),
            Value::Number(id) => Some(Self::new(id.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&String> for EntityId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for EntityId {
                fn from(id: $ty) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);
