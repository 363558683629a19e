//! Entity descriptors: one declaration per manageable resource.

use crate::field::FieldSpec;
use crate::operations::{Bindings, EntityOperations, RestOperations};
use core_gateway::{HttpGateway, PayloadPolicy};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A registered resource type: its fields and bound operations.
///
/// Immutable once built.
pub struct EntityDescriptor {
    name: String,
    label: String,
    base_path: String,
    fields: Vec<FieldSpec>,
    operations: Arc<dyn EntityOperations>,
}

impl EntityDescriptor {
    pub fn builder(name: impl Into<String>, label: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name, label)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resource path relative to the API base, e.g. `/brands`.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn operations(&self) -> &Arc<dyn EntityOperations> {
        &self.operations
    }

    pub fn supports_toggle(&self) -> bool {
        self.operations.supports_toggle()
    }

    pub fn supports_status_transition(&self) -> bool {
        self.operations.supports_status_transition()
    }

    /// Whether writes must be sent as multipart (any media field).
    pub fn requires_multipart(&self) -> bool {
        self.fields.iter().any(|field| field.kind.is_media())
    }

    /// A record holding each field's default value, for "new" forms.
    pub fn blank_record(&self) -> Value {
        let record: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| (field.key.clone(), field.kind.default_value()))
            .collect();
        Value::Object(record)
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("base_path", &self.base_path)
            .field("fields", &self.fields)
            .field("toggle", &self.supports_toggle())
            .finish()
    }
}

/// Builder for [`EntityDescriptor`].
///
/// The resource path defaults to `/<name>`.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    label: String,
    base_path: Option<String>,
    fields: Vec<FieldSpec>,
    policy: PayloadPolicy,
    bindings: Bindings,
}

impl DescriptorBuilder {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            base_path: None,
            fields: Vec::new(),
            policy: PayloadPolicy::Generic,
            bindings: Bindings::default(),
        }
    }

    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn policy(mut self, policy: PayloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bind `PATCH /<resource>/:id/toggle`.
    pub fn toggle(mut self) -> Self {
        self.bindings.toggle = true;
        self
    }

    /// Bind `PATCH /<resource>/:id/status`.
    pub fn status_transition(mut self) -> Self {
        self.bindings.status_transition = true;
        self
    }

    fn resolved_path(&self) -> String {
        let path = self
            .base_path
            .clone()
            .unwrap_or_else(|| self.name.clone());
        format!("/{}", path.trim_matches('/'))
    }

    /// Bind the REST operations over `gateway`.
    pub fn build(self, gateway: &HttpGateway) -> EntityDescriptor {
        let base_path = self.resolved_path();
        let operations = RestOperations::new(
            self.name.clone(),
            base_path.clone(),
            gateway.clone(),
            self.policy,
            self.bindings,
        );
        self.finish(base_path, Arc::new(operations))
    }

    /// Use custom operations instead of the REST ones.
    ///
    /// The policy and bindings set on the builder are ignored.
    pub fn build_with(self, operations: Arc<dyn EntityOperations>) -> EntityDescriptor {
        let base_path = self.resolved_path();
        self.finish(base_path, operations)
    }

    fn finish(self, base_path: String, operations: Arc<dyn EntityOperations>) -> EntityDescriptor {
        EntityDescriptor {
            name: self.name,
            label: self.label,
            base_path,
            fields: self.fields,
            operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::EntityId;
    use async_trait::async_trait;
    use core_gateway::{RequestBody, Result};
    use serde_json::json;

    struct NoOperations;

    #[async_trait]
    impl EntityOperations for NoOperations {
        fn entity(&self) -> &str {
            "widgets"
        }
        async fn list(&self) -> Result<Value> {
            Ok(json!([]))
        }
        async fn get(&self, _id: &EntityId) -> Result<Value> {
            Ok(Value::Null)
        }
        async fn create(&self, _data: RequestBody) -> Result<Value> {
            Ok(Value::Null)
        }
        async fn update(&self, _id: &EntityId, _data: RequestBody) -> Result<Value> {
            Ok(Value::Null)
        }
        async fn remove(&self, _id: &EntityId) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    fn widget() -> EntityDescriptor {
        EntityDescriptor::builder("widgets", "Widgets")
            .base_path("api-widgets/")
            .field(FieldSpec::text("name", "Name"))
            .field(FieldSpec::number("weight", "Weight"))
            .field(FieldSpec::select("size", "Size", ["S", "M"]))
            .field(FieldSpec::boolean("isActive", "Active"))
            .build_with(Arc::new(NoOperations))
    }

    #[test]
    fn test_blank_record() {
        assert_eq!(
            widget().blank_record(),
            json!({"name": "", "weight": 0, "size": "S", "isActive": false})
        );
    }

    #[test]
    fn test_paths_and_lookup() {
        let descriptor = widget();
        assert_eq!(descriptor.base_path(), "/api-widgets");
        assert_eq!(descriptor.field("weight").map(|f| f.label.as_str()), Some("Weight"));
        assert!(descriptor.field("missing").is_none());
        assert!(!descriptor.supports_toggle());
    }

    #[test]
    fn test_requires_multipart() {
        assert!(!widget().requires_multipart());

        let with_media = EntityDescriptor::builder("gallery", "Gallery")
            .field(FieldSpec::media("image", "Image"))
            .build_with(Arc::new(NoOperations));
        assert!(with_media.requires_multipart());
        assert_eq!(with_media.base_path(), "/gallery");
    }
}
