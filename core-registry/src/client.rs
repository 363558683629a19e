//! Typed resource clients derived from a descriptor.

use crate::descriptor::EntityDescriptor;
use crate::id::EntityId;
use core_gateway::{GatewayError, RequestBody, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// CRUD access to one entity, decoding records into `T`.
///
/// `T = Value` gives untyped records.
pub struct ResourceClient<T = Value> {
    descriptor: Arc<EntityDescriptor>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("entity", &self.descriptor.name())
            .finish()
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    pub fn new(descriptor: Arc<EntityDescriptor>) -> Self {
        Self {
            descriptor,
            _record: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    /// Every record, in server order.
    ///
    /// A body that is not an array is treated as an empty collection.
    pub async fn list(&self) -> Result<Vec<T>> {
        match self.descriptor.operations().list().await? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.decode(item, "list item"))
                .collect(),
            other => {
                warn!(
                    entity = self.descriptor.name(),
                    kind = json_kind(&other),
                    "List response is not an array, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    pub async fn get(&self, id: impl Into<EntityId>) -> Result<T> {
        let record = self.descriptor.operations().get(&id.into()).await?;
        self.decode(record, "record")
    }

    pub async fn create(&self, data: impl Into<RequestBody>) -> Result<T> {
        let created = self.descriptor.operations().create(data.into()).await?;
        self.decode(created, "created record")
    }

    pub async fn update(&self, id: impl Into<EntityId>, data: impl Into<RequestBody>) -> Result<T> {
        let updated = self
            .descriptor
            .operations()
            .update(&id.into(), data.into())
            .await?;
        self.decode(updated, "updated record")
    }

    /// Delete a record. The server's response body is returned as is.
    pub async fn remove(&self, id: impl Into<EntityId>) -> Result<Value> {
        self.descriptor.operations().remove(&id.into()).await
    }

    /// Flip the active flag; fails with `UnsupportedOperation` when the
    /// entity has no toggle binding.
    pub async fn toggle(&self, id: impl Into<EntityId>) -> Result<Value> {
        self.descriptor.operations().toggle(&id.into()).await
    }

    pub async fn set_status(&self, id: impl Into<EntityId>, status: &str) -> Result<Value> {
        self.descriptor
            .operations()
            .set_status(&id.into(), status)
            .await
    }

    fn decode(&self, value: Value, what: &str) -> Result<T> {
        serde_json::from_value(value).map_err(|e| GatewayError::Decode {
            context: format!("{} of '{}'", what, self.descriptor.name()),
            source: e,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
